//! Port contracts for order lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by order services.

pub mod publisher;
pub mod repository;

pub use publisher::{OrderEventPublisher, OrderEventPublisherError, OrderEventPublisherResult};
pub use repository::{OrderRepository, OrderRepositoryError, OrderRepositoryResult};
