//! Outbound queue decoupling status writes from notification delivery.
//!
//! [`QueuedOrderEventPublisher`] accepts events without waiting on the
//! downstream transport. A single [`OrderEventDispatcher`] task drains the
//! queue in order and forwards each event with bounded retry.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::NotificationConfig;
use crate::order::{
    domain::OrderStatusChanged,
    ports::{OrderEventPublisher, OrderEventPublisherError, OrderEventPublisherResult},
};

/// Publisher that enqueues events for background delivery.
#[derive(Debug, Clone)]
pub struct QueuedOrderEventPublisher {
    sender: mpsc::Sender<OrderStatusChanged>,
}

impl QueuedOrderEventPublisher {
    /// Creates a queue feeding `downstream` and the dispatcher that drains it.
    ///
    /// The dispatcher does nothing until it is run or spawned.
    #[must_use]
    pub fn new<P>(downstream: Arc<P>, config: &NotificationConfig) -> (Self, OrderEventDispatcher<P>)
    where
        P: OrderEventPublisher + ?Sized,
    {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let dispatcher = OrderEventDispatcher {
            receiver,
            downstream,
            attempts: config.delivery_attempts.max(1),
            backoff: config.retry_backoff(),
        };
        (Self { sender }, dispatcher)
    }
}

#[async_trait]
impl OrderEventPublisher for QueuedOrderEventPublisher {
    async fn publish(&self, event: &OrderStatusChanged) -> OrderEventPublisherResult<()> {
        self.sender
            .try_send(event.clone())
            .map_err(|err| match err {
                TrySendError::Full(rejected) => {
                    OrderEventPublisherError::QueueFull(rejected.order_id)
                }
                TrySendError::Closed(_) => OrderEventPublisherError::Closed,
            })
    }
}

/// Delivery counters reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events accepted by the downstream publisher.
    pub delivered: u64,
    /// Events dropped after exhausting every attempt.
    pub dropped: u64,
}

/// Background task draining the outbound queue.
#[derive(Debug)]
pub struct OrderEventDispatcher<P: ?Sized> {
    receiver: mpsc::Receiver<OrderStatusChanged>,
    downstream: Arc<P>,
    attempts: u32,
    backoff: std::time::Duration,
}

impl<P> OrderEventDispatcher<P>
where
    P: OrderEventPublisher + ?Sized,
{
    /// Delivers queued events until every publisher handle is dropped.
    pub async fn run(mut self) -> DispatchStats {
        let mut stats = DispatchStats::default();
        while let Some(event) = self.receiver.recv().await {
            if self.deliver(&event).await {
                stats.delivered += 1;
            } else {
                stats.dropped += 1;
            }
        }
        debug!(
            delivered = stats.delivered,
            dropped = stats.dropped,
            "order event dispatcher stopped"
        );
        stats
    }

    async fn deliver(&self, event: &OrderStatusChanged) -> bool {
        for attempt in 1..=self.attempts {
            match self.downstream.publish(event).await {
                Ok(()) => return true,
                Err(err) => {
                    warn!(
                        order_id = %event.order_id,
                        attempt,
                        max_attempts = self.attempts,
                        error = %err,
                        "order status notification attempt failed"
                    );
                    if attempt < self.attempts && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }
        error!(
            order_id = %event.order_id,
            new_status = %event.new_status,
            "dropping order status notification after exhausting retries"
        );
        false
    }
}

impl<P> OrderEventDispatcher<P>
where
    P: OrderEventPublisher + ?Sized + 'static,
{
    /// Spawns [`Self::run`] on the current Tokio runtime.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<DispatchStats> {
        tokio::spawn(self.run())
    }
}
