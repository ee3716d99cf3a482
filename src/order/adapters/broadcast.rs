//! Broadcast hub delivering status changes to live subscribers.
//!
//! The hub fans each event out to every subscriber over a
//! `tokio::sync::broadcast` channel. Customers subscribe through a filtered
//! feed that yields only events for their own orders.

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::config::NotificationConfig;
use crate::order::{
    domain::{CustomerId, OrderStatusChanged},
    ports::{OrderEventPublisher, OrderEventPublisherResult},
};

/// Fan-out publisher for real-time status updates.
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct OrderStatusHub {
    sender: broadcast::Sender<OrderStatusChanged>,
}

impl OrderStatusHub {
    /// Creates a hub buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Creates a hub sized from configuration.
    #[must_use]
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.broadcast_capacity)
    }

    /// Subscribes to every future event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrderStatusChanged> {
        self.sender.subscribe()
    }

    /// Subscribes to future events for one customer's orders.
    #[must_use]
    pub fn subscribe_customer(&self, customer_id: CustomerId) -> CustomerStatusFeed {
        CustomerStatusFeed {
            customer_id,
            receiver: self.sender.subscribe(),
        }
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for OrderStatusHub {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

#[async_trait]
impl OrderEventPublisher for OrderStatusHub {
    async fn publish(&self, event: &OrderStatusChanged) -> OrderEventPublisherResult<()> {
        // No subscribers is not a failure: nobody is watching this order.
        match self.sender.send(event.clone()) {
            Ok(receivers) => debug!(order_id = %event.order_id, receivers, "status change broadcast"),
            Err(_) => debug!(order_id = %event.order_id, "status change broadcast without subscribers"),
        }
        Ok(())
    }
}

/// Status-change stream scoped to one customer.
#[derive(Debug)]
pub struct CustomerStatusFeed {
    customer_id: CustomerId,
    receiver: broadcast::Receiver<OrderStatusChanged>,
}

impl CustomerStatusFeed {
    /// Returns the customer this feed is scoped to.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Waits for the next event concerning this customer.
    ///
    /// Returns `None` once the hub and all its clones are dropped. Events
    /// lost to lag are logged and skipped.
    pub async fn next(&mut self) -> Option<OrderStatusChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.customer_id == self.customer_id => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(customer_id = %self.customer_id, skipped, "customer status feed lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
