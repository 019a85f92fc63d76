//! Infrastructure layer: filesystem and editor implementations, DI container

pub mod di;
pub mod error;
pub mod traits;

pub use di::ServiceContainer;
pub use error::InfraError;
