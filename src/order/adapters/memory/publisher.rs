//! Recording event publisher for order lifecycle tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::order::{
    domain::OrderStatusChanged,
    ports::{OrderEventPublisher, OrderEventPublisherError, OrderEventPublisherResult},
};

/// Publisher that keeps every event in memory.
///
/// It can be switched into a failing mode to exercise best-effort delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingOrderEventPublisher {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    events: Vec<OrderStatusChanged>,
    failing: bool,
}

impl RecordingOrderEventPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publishes fail (`true`) or succeed (`false`).
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_failing(&self, failing: bool) -> OrderEventPublisherResult<()> {
        let mut state = self.state.write().map_err(|err| {
            OrderEventPublisherError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.failing = failing;
        Ok(())
    }

    /// Returns a snapshot of the events published so far.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn events(&self) -> OrderEventPublisherResult<Vec<OrderStatusChanged>> {
        let state = self.state.read().map_err(|err| {
            OrderEventPublisherError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.events.clone())
    }
}

#[async_trait]
impl OrderEventPublisher for RecordingOrderEventPublisher {
    async fn publish(&self, event: &OrderStatusChanged) -> OrderEventPublisherResult<()> {
        let mut state = self.state.write().map_err(|err| {
            OrderEventPublisherError::transport(std::io::Error::other(err.to_string()))
        })?;
        if state.failing {
            return Err(OrderEventPublisherError::transport(std::io::Error::other(
                "recording publisher set to fail",
            )));
        }
        state.events.push(event.clone());
        Ok(())
    }
}
