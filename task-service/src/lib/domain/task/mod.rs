pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::TaskError;
pub use models::Priority;
pub use models::Task;
pub use models::TaskId;
