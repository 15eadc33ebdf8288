pub mod commands;
pub mod controller;
pub mod sampler;
pub mod visitor;

pub use controller::TrackingController;
pub use sampler::ScrollGeometry;
pub use visitor::VisitorIdStore;
