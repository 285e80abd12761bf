// Domain layer: core models shared by every stage.

pub mod model;
