//! Notification port for order status-change events.

use crate::order::domain::{OrderId, OrderStatusChanged};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publisher operations.
pub type OrderEventPublisherResult<T> = Result<T, OrderEventPublisherError>;

/// Outbound contract for delivering status changes to subscribers.
///
/// Delivery is best-effort: callers treat failures as non-fatal.
#[async_trait]
pub trait OrderEventPublisher: Send + Sync {
    /// Publishes a committed status change.
    async fn publish(&self, event: &OrderStatusChanged) -> OrderEventPublisherResult<()>;
}

/// Errors returned by event publisher adapters.
#[derive(Debug, Clone, Error)]
pub enum OrderEventPublisherError {
    /// The publisher has been shut down.
    #[error("order event publisher is closed")]
    Closed,

    /// The outbound queue has no room for the event.
    #[error("order event queue is full; dropped event for order {0}")]
    QueueFull(OrderId),

    /// Transport-level failure.
    #[error("order event transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrderEventPublisherError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
