//! Order aggregate root and status mutation rules.

use super::{
    CustomerDetails, CustomerId, DeliveryAddress, Financials, FulfillmentMode, LineItem, Money,
    OrderDomainError, OrderId, OrderNumber, OrderStatus, ParseCancellationPartyError, RestaurantId,
    TaxRate, validate_transition,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Party that initiated a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationParty {
    /// The ordering customer withdrew the order.
    Customer,
    /// The restaurant declined or abandoned the order.
    Restaurant,
}

impl CancellationParty {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Restaurant => "restaurant",
        }
    }
}

impl TryFrom<&str> for CancellationParty {
    type Error = ParseCancellationPartyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "restaurant" => Ok(Self::Restaurant),
            _ => Err(ParseCancellationPartyError(value.to_owned())),
        }
    }
}

/// Checkout output used to place a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Restaurant receiving the order.
    pub restaurant_id: RestaurantId,
    /// Customer placing the order.
    pub customer_id: CustomerId,
    /// Customer contact snapshot.
    pub customer: CustomerDetails,
    /// Delivery or pickup.
    pub mode: FulfillmentMode,
    /// Delivery address, required for delivery orders.
    pub delivery_address: Option<DeliveryAddress>,
    /// Ordered items.
    pub items: Vec<LineItem>,
    /// Tax rate applied to the subtotal.
    pub tax_rate: TaxRate,
    /// Delivery fee, delivery orders only.
    pub delivery_fee: Option<Money>,
    /// Free-text note from the customer.
    pub customer_note: Option<String>,
}

/// A status move applied to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the move.
    pub previous: OrderStatus,
    /// Status after the move.
    pub current: OrderStatus,
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order status updated from {} to {} successfully",
            self.previous, self.current
        )
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: OrderNumber,
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    customer: CustomerDetails,
    mode: FulfillmentMode,
    delivery_address: Option<DeliveryAddress>,
    items: Vec<LineItem>,
    financials: Financials,
    status: OrderStatus,
    customer_note: Option<String>,
    restaurant_note: Option<String>,
    cancelled_by: Option<CancellationParty>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted order aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrderData {
    /// Persisted order identifier.
    pub id: OrderId,
    /// Persisted order number.
    pub order_number: OrderNumber,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Ordering customer.
    pub customer_id: CustomerId,
    /// Customer contact snapshot.
    pub customer: CustomerDetails,
    /// Fulfillment mode.
    pub mode: FulfillmentMode,
    /// Delivery address, if any.
    pub delivery_address: Option<DeliveryAddress>,
    /// Ordered items.
    pub items: Vec<LineItem>,
    /// Financial summary.
    pub financials: Financials,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Customer note.
    pub customer_note: Option<String>,
    /// Restaurant note.
    pub restaurant_note: Option<String>,
    /// Cancellation attribution.
    pub cancelled_by: Option<CancellationParty>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Places a new order in status [`OrderStatus::New`].
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::EmptyOrder`] without line items,
    /// [`OrderDomainError::MissingDeliveryAddress`] for a delivery order
    /// without an address, [`OrderDomainError::DeliveryDataOnPickup`] for a
    /// pickup order carrying delivery data, or
    /// [`OrderDomainError::AmountOverflow`].
    pub fn place(
        draft: OrderDraft,
        order_number: OrderNumber,
        clock: &impl Clock,
    ) -> Result<Self, OrderDomainError> {
        if draft.items.is_empty() {
            return Err(OrderDomainError::EmptyOrder);
        }
        match (draft.mode, draft.delivery_address.is_some()) {
            (FulfillmentMode::Delivery, false) => {
                return Err(OrderDomainError::MissingDeliveryAddress);
            }
            (FulfillmentMode::Pickup, true) => return Err(OrderDomainError::DeliveryDataOnPickup),
            _ => {}
        }

        let financials =
            Financials::compute(&draft.items, draft.tax_rate, draft.mode, draft.delivery_fee)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: OrderId::new(),
            order_number,
            restaurant_id: draft.restaurant_id,
            customer_id: draft.customer_id,
            customer: draft.customer,
            mode: draft.mode,
            delivery_address: draft.delivery_address,
            items: draft.items,
            financials,
            status: OrderStatus::New,
            customer_note: non_blank(draft.customer_note.as_deref()),
            restaurant_note: None,
            cancelled_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an order from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOrderData) -> Self {
        Self {
            id: data.id,
            order_number: data.order_number,
            restaurant_id: data.restaurant_id,
            customer_id: data.customer_id,
            customer: data.customer,
            mode: data.mode,
            delivery_address: data.delivery_address,
            items: data.items,
            financials: data.financials,
            status: data.status,
            customer_note: data.customer_note,
            restaurant_note: data.restaurant_note,
            cancelled_by: data.cancelled_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the order identifier.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the human-facing order number.
    #[must_use]
    pub const fn order_number(&self) -> OrderNumber {
        self.order_number
    }

    /// Returns the owning restaurant.
    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Returns the ordering customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the customer contact snapshot.
    #[must_use]
    pub const fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    /// Returns the fulfillment mode.
    #[must_use]
    pub const fn mode(&self) -> FulfillmentMode {
        self.mode
    }

    /// Returns the delivery address, if any.
    #[must_use]
    pub const fn delivery_address(&self) -> Option<&DeliveryAddress> {
        self.delivery_address.as_ref()
    }

    /// Returns the ordered items.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the summed quantity over all line items.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Returns the financial summary.
    #[must_use]
    pub const fn financials(&self) -> &Financials {
        &self.financials
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the customer note, if any.
    #[must_use]
    pub fn customer_note(&self) -> Option<&str> {
        self.customer_note.as_deref()
    }

    /// Returns the restaurant note, if any.
    #[must_use]
    pub fn restaurant_note(&self) -> Option<&str> {
        self.restaurant_note.as_deref()
    }

    /// Returns who cancelled the order, if it was cancelled.
    #[must_use]
    pub const fn cancelled_by(&self) -> Option<CancellationParty> {
        self.cancelled_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a restaurant-requested status change.
    ///
    /// Cancelling requires a non-blank `note`, which is stored as the
    /// restaurant note. The order is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns the transition errors of [`validate_transition`] or
    /// [`OrderDomainError::MissingCancellationNote`].
    pub fn transition_status(
        &mut self,
        requested: OrderStatus,
        note: Option<&str>,
        clock: &impl Clock,
    ) -> Result<StatusChange, OrderDomainError> {
        validate_transition(self.mode, self.status, requested)?;

        if requested == OrderStatus::Cancelled {
            let restaurant_note =
                non_blank(note).ok_or(OrderDomainError::MissingCancellationNote)?;
            self.restaurant_note = Some(restaurant_note);
            self.cancelled_by = Some(CancellationParty::Restaurant);
        }

        Ok(self.apply_status(requested, clock))
    }

    /// Cancels the order on behalf of the customer.
    ///
    /// Only orders still in [`OrderStatus::New`] can be withdrawn.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::CustomerCancellationClosed`] otherwise.
    pub fn cancel_by_customer(
        &mut self,
        clock: &impl Clock,
    ) -> Result<StatusChange, OrderDomainError> {
        if self.status != OrderStatus::New {
            return Err(OrderDomainError::CustomerCancellationClosed(self.status));
        }
        self.cancelled_by = Some(CancellationParty::Customer);
        Ok(self.apply_status(OrderStatus::Cancelled, clock))
    }

    fn apply_status(&mut self, status: OrderStatus, clock: &impl Clock) -> StatusChange {
        let previous = self.status;
        self.status = status;
        self.touch(clock);
        StatusChange {
            previous,
            current: status,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
