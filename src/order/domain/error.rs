//! Error types for order domain validation and parsing.

use super::{FulfillmentMode, OrderStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating order domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderDomainError {
    /// The requested status equals the order's current status.
    #[error("Order status is already '{0}'. Choose another status for update.")]
    AlreadyInStatus(OrderStatus),

    /// The requested status is not part of the fulfillment mode's status set.
    #[error("Invalid status '{requested}' for '{mode}' order")]
    InvalidStatusForMode {
        /// Fulfillment mode of the order.
        mode: FulfillmentMode,
        /// Raw status token that was requested.
        requested: String,
    },

    /// The order has reached a terminal status and only cancellation remains.
    #[error("Order status '{current}' is final and cannot be changed to '{requested}'")]
    TerminalStatus {
        /// Fulfillment mode of the order.
        mode: FulfillmentMode,
        /// Current terminal status.
        current: OrderStatus,
        /// Requested status.
        requested: OrderStatus,
    },

    /// A restaurant cancellation was requested without an explanatory note.
    #[error(
        "A note is required when cancelling an order. Please explain the reason for cancellation to notify the customer."
    )]
    MissingCancellationNote,

    /// Customers may only cancel orders the restaurant has not picked up yet.
    #[error("Order can no longer be cancelled by the customer (current status: {0})")]
    CustomerCancellationClosed(OrderStatus),

    /// The order number is zero or outside the persisted range.
    #[error("invalid order number {0}, expected a positive integer")]
    InvalidOrderNumber(u64),

    /// An order must contain at least one line item.
    #[error("order must contain at least one line item")]
    EmptyOrder,

    /// A line item name is empty after trimming.
    #[error("line item name must not be empty")]
    EmptyItemName,

    /// A line item quantity is zero.
    #[error("line item '{0}' must have a positive quantity")]
    InvalidQuantity(String),

    /// Delivery orders require a delivery address.
    #[error("delivery orders require a delivery address")]
    MissingDeliveryAddress,

    /// Pickup orders must not carry delivery-only data.
    #[error("pickup orders must not carry a delivery address or delivery fee")]
    DeliveryDataOnPickup,

    /// A required customer contact field is empty.
    #[error("customer {0} must not be empty")]
    EmptyCustomerField(&'static str),

    /// Monetary arithmetic exceeded the representable range.
    #[error("order amount overflow")]
    AmountOverflow,
}

impl OrderDomainError {
    /// Returns the status set relevant to the failure, when one applies.
    #[must_use]
    pub const fn valid_statuses(&self) -> Option<&'static [OrderStatus]> {
        match self {
            Self::InvalidStatusForMode { mode, .. } | Self::TerminalStatus { mode, .. } => {
                Some(mode.valid_statuses())
            }
            _ => None,
        }
    }
}

/// Error returned while parsing order statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

/// Error returned while parsing fulfillment modes from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown fulfillment mode: {0}")]
pub struct ParseFulfillmentModeError(pub String);

/// Error returned while parsing cancellation attribution from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown cancellation party: {0}")]
pub struct ParseCancellationPartyError(pub String);
