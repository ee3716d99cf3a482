//! Read-side service for restaurant and customer order views.

use crate::order::{
    domain::{
        ALL_STATUSES, CancellationParty, CustomerDetails, CustomerId, DeliveryAddress,
        FulfillmentMode, LineItem, Money, Order, OrderDomainError, OrderId, OrderNumber,
        OrderStatus, ParseOrderStatusError, RestaurantId, TaxRate,
    },
    ports::{OrderRepository, OrderRepositoryError},
};
use super::response::{ErrorBody, FailureKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument};

const INTERNAL_FAILURE_MESSAGE: &str = "Error fetching orders";

/// Presentation of one line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSummary {
    /// Item name.
    pub name: String,
    /// Optional size or variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Unit price.
    pub unit_price: Money,
    /// Ordered quantity.
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub line_total: Money,
}

impl LineItemSummary {
    fn from_item(item: &LineItem) -> Result<Self, OrderDomainError> {
        Ok(Self {
            name: item.name().to_owned(),
            size: item.size().map(str::to_owned),
            unit_price: item.unit_price(),
            quantity: item.quantity(),
            line_total: item.line_total()?,
        })
    }
}

/// Presentation of an order for listings and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier.
    pub id: OrderId,
    /// Human-facing order number.
    pub order_number: OrderNumber,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Ordering customer.
    pub customer_id: CustomerId,
    /// Customer contact snapshot.
    pub customer: CustomerDetails,
    /// Fulfillment mode.
    pub fulfillment_mode: FulfillmentMode,
    /// Delivery destination, for delivery orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    /// Current status token.
    pub status: OrderStatus,
    /// Current status in display form.
    pub status_label: String,
    /// Lines with their totals.
    pub items: Vec<LineItemSummary>,
    /// Sum of line quantities.
    pub total_items: u64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Applied tax rate.
    pub tax_rate: TaxRate,
    /// Tax charged.
    pub tax_amount: Money,
    /// Delivery fee, for delivery orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<Money>,
    /// Grand total.
    pub total: Money,
    /// Customer note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    /// Restaurant note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_note: Option<String>,
    /// Who cancelled the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<CancellationParty>,
    /// Placement time.
    pub created_at: DateTime<Utc>,
    /// Last change time.
    pub updated_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Builds the view of `order`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::AmountOverflow`] when a line total does
    /// not fit in [`Money`].
    pub fn from_order(order: &Order) -> Result<Self, OrderDomainError> {
        let items = order
            .items()
            .iter()
            .map(LineItemSummary::from_item)
            .collect::<Result<Vec<_>, _>>()?;
        let financials = order.financials();
        Ok(Self {
            id: order.id(),
            order_number: order.order_number(),
            restaurant_id: order.restaurant_id(),
            customer_id: order.customer_id(),
            customer: order.customer().clone(),
            fulfillment_mode: order.mode(),
            delivery_address: order.delivery_address().cloned(),
            status: order.status(),
            status_label: order.status().label(),
            items,
            total_items: order.total_items(),
            subtotal: financials.subtotal(),
            tax_rate: financials.tax_rate(),
            tax_amount: financials.tax_amount(),
            delivery_fee: financials.delivery_fee(),
            total: financials.total(),
            customer_note: order.customer_note().map(str::to_owned),
            restaurant_note: order.restaurant_note().map(str::to_owned),
            cancelled_by: order.cancelled_by(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        })
    }
}

/// A newest-first page of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListing {
    /// Orders sorted by creation time, newest first.
    pub orders: Vec<OrderSummary>,
    /// Number of orders returned.
    pub count: usize,
}

/// Errors returned by [`OrderQueryService`].
#[derive(Debug, Error)]
pub enum OrderQueryError {
    /// The order does not exist or is not visible to the caller.
    #[error("Order not found")]
    NotFound(OrderId),
    /// The status filter is not a known status.
    #[error("Invalid status filter ({0})")]
    InvalidStatusFilter(#[from] ParseOrderStatusError),
    /// Building the view failed.
    #[error(transparent)]
    Domain(#[from] OrderDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] OrderRepositoryError),
}

impl OrderQueryError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::InvalidStatusFilter(_) => FailureKind::Validation,
            Self::Domain(_) | Self::Repository(_) => FailureKind::Internal,
        }
    }

    /// Builds the caller-facing error body.
    #[must_use]
    pub fn response_body(&self) -> ErrorBody {
        match self.kind() {
            FailureKind::Internal => ErrorBody::message(INTERNAL_FAILURE_MESSAGE),
            FailureKind::Validation => {
                ErrorBody::message(self.to_string()).with_valid_statuses(&ALL_STATUSES)
            }
            FailureKind::NotFound | FailureKind::Conflict => ErrorBody::message(self.to_string()),
        }
    }
}

/// Result type for order query operations.
pub type OrderQueryResult<T> = Result<T, OrderQueryError>;

/// Read-only order views. Never mutates orders.
#[derive(Clone)]
pub struct OrderQueryService<R>
where
    R: OrderRepository,
{
    repository: Arc<R>,
}

impl<R> OrderQueryService<R>
where
    R: OrderRepository,
{
    /// Creates a query service over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists a restaurant's orders, newest first.
    ///
    /// An absent or blank `status_filter` returns every order; otherwise only
    /// orders in that status are returned.
    ///
    /// # Errors
    ///
    /// Returns [`OrderQueryError::InvalidStatusFilter`] for an unknown status
    /// token and [`OrderQueryError::Repository`] for storage failures.
    #[instrument(skip(self))]
    pub async fn list_restaurant_orders(
        &self,
        restaurant_id: RestaurantId,
        status_filter: Option<&str>,
    ) -> OrderQueryResult<OrderListing> {
        let status = status_filter
            .filter(|raw| !raw.trim().is_empty())
            .map(OrderStatus::try_from)
            .transpose()?;
        let orders = self
            .repository
            .list_for_restaurant(restaurant_id, status)
            .await
            .inspect_err(|err| error!(error = %err, "failed to list restaurant orders"))?;
        Self::listing(orders)
    }

    /// Lists a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderQueryError::Repository`] for storage failures.
    #[instrument(skip(self))]
    pub async fn list_customer_orders(
        &self,
        customer_id: CustomerId,
    ) -> OrderQueryResult<OrderListing> {
        let orders = self
            .repository
            .list_for_customer(customer_id)
            .await
            .inspect_err(|err| error!(error = %err, "failed to list customer orders"))?;
        Self::listing(orders)
    }

    /// Returns one order as seen by its restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`OrderQueryError::NotFound`] when the restaurant has no such
    /// order.
    #[instrument(skip(self))]
    pub async fn order_details(
        &self,
        order_id: OrderId,
        restaurant_id: RestaurantId,
    ) -> OrderQueryResult<OrderSummary> {
        let order = self
            .repository
            .find_for_restaurant(order_id, restaurant_id)
            .await?
            .ok_or(OrderQueryError::NotFound(order_id))?;
        Ok(OrderSummary::from_order(&order)?)
    }

    fn listing(mut orders: Vec<Order>) -> OrderQueryResult<OrderListing> {
        orders.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        let summaries = orders
            .iter()
            .map(OrderSummary::from_order)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = summaries.len(), "orders listed");
        Ok(OrderListing {
            count: summaries.len(),
            orders: summaries,
        })
    }
}
