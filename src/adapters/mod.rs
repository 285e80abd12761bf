// Adapters layer: concrete collaborators for external systems
// (http resource, intermediate artifact, relational store).

pub mod api;
pub mod artifact;
pub mod db;
