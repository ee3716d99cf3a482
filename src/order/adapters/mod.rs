//! Adapter implementations for order ports.
//!
//! - [`memory`]: in-memory repository and recording publisher
//! - [`postgres`]: Diesel-backed repository
//! - [`broadcast`]: real-time fan-out to subscribers
//! - [`queue`]: outbound queue with background delivery

pub mod broadcast;
pub mod memory;
pub mod postgres;
pub mod queue;

pub use broadcast::{CustomerStatusFeed, OrderStatusHub};
pub use queue::{DispatchStats, OrderEventDispatcher, QueuedOrderEventPublisher};
