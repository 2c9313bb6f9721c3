pub mod acquisition;
pub mod camera;
pub mod errors;
pub mod event;
pub mod queue;
pub mod status;
