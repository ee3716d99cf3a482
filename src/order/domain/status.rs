//! Order status, fulfillment mode, and the status transition rules.
//!
//! Each fulfillment mode owns a fixed set of statuses. Within that set the
//! transition graph is permissive: any status other than the current one may
//! be requested, so restaurants can skip intermediate operational steps.
//! Terminal statuses stop forward progress, but a delivered or picked-up order
//! can still be cancelled. A cancelled order is final.

use super::{OrderDomainError, ParseFulfillmentModeError, ParseOrderStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and not yet acknowledged.
    New,
    /// Restaurant has acknowledged the order.
    Received,
    /// Food is being prepared.
    Preparing,
    /// Delivery is in transit.
    OnTheWay,
    /// Delivery has been handed to the customer.
    Delivered,
    /// Pickup order is waiting at the counter.
    PickupReady,
    /// Pickup order has been collected.
    PickedUp,
    /// Order has been cancelled by the customer or the restaurant.
    Cancelled,
}

/// Every status, in declaration order.
pub const ALL_STATUSES: [OrderStatus; 8] = [
    OrderStatus::New,
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::OnTheWay,
    OrderStatus::Delivered,
    OrderStatus::PickupReady,
    OrderStatus::PickedUp,
    OrderStatus::Cancelled,
];

const DELIVERY_STATUSES: [OrderStatus; 6] = [
    OrderStatus::New,
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::OnTheWay,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

const PICKUP_STATUSES: [OrderStatus; 6] = [
    OrderStatus::New,
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::PickupReady,
    OrderStatus::PickedUp,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Received => "received",
            Self::Preparing => "preparing",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::PickupReady => "pickup_ready",
            Self::PickedUp => "picked_up",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the human-readable label, e.g. `On The Way`.
    #[must_use]
    pub fn label(self) -> String {
        format_status_label(self.as_str())
    }

    /// Returns `true` when the order has finished its operational flow.
    ///
    /// Only cancellation may follow a terminal status, and never from
    /// [`OrderStatus::Cancelled`] itself.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::PickedUp | Self::Cancelled)
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = ParseOrderStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "received" => Ok(Self::Received),
            "preparing" => Ok(Self::Preparing),
            "on_the_way" => Ok(Self::OnTheWay),
            "delivered" => Ok(Self::Delivered),
            "pickup_ready" => Ok(Self::PickupReady),
            "picked_up" => Ok(Self::PickedUp),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order reaches the customer. Fixed when the order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMode {
    /// The restaurant delivers the order.
    Delivery,
    /// The customer collects the order.
    Pickup,
}

impl FulfillmentMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    /// Returns the statuses an order in this mode may hold.
    #[must_use]
    pub const fn valid_statuses(self) -> &'static [OrderStatus] {
        match self {
            Self::Delivery => &DELIVERY_STATUSES,
            Self::Pickup => &PICKUP_STATUSES,
        }
    }

    /// Returns `true` when `status` belongs to this mode's status set.
    #[must_use]
    pub fn permits(self, status: OrderStatus) -> bool {
        self.valid_statuses().contains(&status)
    }
}

impl TryFrom<&str> for FulfillmentMode {
    type Error = ParseFulfillmentModeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(ParseFulfillmentModeError(value.to_owned())),
        }
    }
}

impl fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a `snake_case` status token into a title-cased label.
///
/// ```
/// use orderflow::order::domain::format_status_label;
///
/// assert_eq!(format_status_label("on_the_way"), "On The Way");
/// assert_eq!(format_status_label("new"), "New");
/// ```
#[must_use]
pub fn format_status_label(token: &str) -> String {
    token
        .split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Resolves a raw status token against the statuses valid for `mode`.
///
/// # Errors
///
/// Returns [`OrderDomainError::AlreadyInStatus`] when the token names the
/// current status, and [`OrderDomainError::InvalidStatusForMode`] when the
/// token is unknown or outside the mode's status set.
pub fn resolve_requested_status(
    mode: FulfillmentMode,
    current: OrderStatus,
    requested: &str,
) -> Result<OrderStatus, OrderDomainError> {
    let status = OrderStatus::try_from(requested).map_err(|_| {
        OrderDomainError::InvalidStatusForMode {
            mode,
            requested: requested.to_owned(),
        }
    })?;
    validate_transition(mode, current, status)?;
    Ok(status)
}

/// Decides whether `current -> requested` is legal for an order in `mode`.
///
/// Checks run in a fixed order: a no-op request, then membership in the
/// mode's status set, then terminality of the current status. Cancellation
/// is exempt from the terminal check, so `cancelled` is reachable from every
/// other status.
///
/// # Errors
///
/// Returns [`OrderDomainError::AlreadyInStatus`],
/// [`OrderDomainError::InvalidStatusForMode`], or
/// [`OrderDomainError::TerminalStatus`].
pub fn validate_transition(
    mode: FulfillmentMode,
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<(), OrderDomainError> {
    if current == requested {
        return Err(OrderDomainError::AlreadyInStatus(current));
    }
    if !mode.permits(requested) {
        return Err(OrderDomainError::InvalidStatusForMode {
            mode,
            requested: requested.as_str().to_owned(),
        });
    }
    if current.is_terminal() && requested != OrderStatus::Cancelled {
        return Err(OrderDomainError::TerminalStatus {
            mode,
            current,
            requested,
        });
    }
    Ok(())
}
