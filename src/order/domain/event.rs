//! Status-change notification emitted after a committed transition.

use super::{
    CancellationParty, CustomerId, Order, OrderId, OrderNumber, OrderStatus, RestaurantId,
    StatusChange,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event describing a committed order status change.
///
/// Serialises in `camelCase` so that subscribers receive
/// `{orderId, previousStatusLabel, newStatusLabel, timestamp, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    /// Order that changed.
    pub order_id: OrderId,
    /// Human-facing order number.
    pub order_number: OrderNumber,
    /// Restaurant owning the order.
    pub restaurant_id: RestaurantId,
    /// Customer interested in the change.
    pub customer_id: CustomerId,
    /// Status before the change.
    pub previous_status: OrderStatus,
    /// Status after the change.
    pub new_status: OrderStatus,
    /// Human-readable label of the previous status.
    pub previous_status_label: String,
    /// Human-readable label of the new status.
    pub new_status_label: String,
    /// Restaurant note, present on restaurant cancellations.
    pub restaurant_note: Option<String>,
    /// Cancellation attribution, present on cancellations.
    pub cancelled_by: Option<CancellationParty>,
    /// Time the change was committed.
    pub timestamp: DateTime<Utc>,
}

impl OrderStatusChanged {
    /// Builds the event for a change already applied to `order`.
    #[must_use]
    pub fn from_change(order: &Order, change: StatusChange) -> Self {
        Self {
            order_id: order.id(),
            order_number: order.order_number(),
            restaurant_id: order.restaurant_id(),
            customer_id: order.customer_id(),
            previous_status: change.previous,
            new_status: change.current,
            previous_status_label: change.previous.label(),
            new_status_label: change.current.label(),
            restaurant_note: order.restaurant_note().map(str::to_owned),
            cancelled_by: order.cancelled_by(),
            timestamp: order.updated_at(),
        }
    }
}
