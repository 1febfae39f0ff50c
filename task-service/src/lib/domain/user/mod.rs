pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::UserError;
pub use models::Role;
pub use models::User;
pub use models::UserId;
