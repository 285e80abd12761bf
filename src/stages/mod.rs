pub mod extract;
pub mod poller;
pub mod store;
pub mod transform;
pub mod validate;

pub use extract::ExtractionStage;
pub use poller::ReadinessPoller;
pub use store::PersistenceStage;
pub use transform::TransformationStage;
pub use validate::ValidationStage;
