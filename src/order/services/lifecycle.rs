//! Service layer for order intake and status transitions.

use crate::order::{
    domain::{
        CustomerDetails, CustomerId, DeliveryAddress, FulfillmentMode, LineItem, Money, Order,
        OrderDomainError, OrderDraft, OrderId, OrderStatus, OrderStatusChanged, RestaurantId,
        StatusChange, TaxRate, resolve_requested_status,
    },
    ports::{OrderEventPublisher, OrderRepository, OrderRepositoryError},
};
use super::response::{ErrorBody, FailureKind};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Generic message returned when storage fails during a status change.
const STATUS_UPDATE_FAILURE_MESSAGE: &str = "Error updating order status";

/// Generic message returned when a new order cannot be recorded.
const PLACEMENT_FAILURE_MESSAGE: &str = "Error placing order";

/// Request payload for recording an order produced by checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderRequest {
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    customer: CustomerDetails,
    mode: FulfillmentMode,
    items: Vec<LineItem>,
    delivery_address: Option<DeliveryAddress>,
    tax_rate: TaxRate,
    delivery_fee: Option<Money>,
    customer_note: Option<String>,
}

impl PlaceOrderRequest {
    /// Creates a request with required order fields and no tax.
    #[must_use]
    pub fn new(
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        customer: CustomerDetails,
        mode: FulfillmentMode,
        items: impl IntoIterator<Item = LineItem>,
    ) -> Self {
        Self {
            restaurant_id,
            customer_id,
            customer,
            mode,
            items: items.into_iter().collect(),
            delivery_address: None,
            tax_rate: TaxRate::default(),
            delivery_fee: None,
            customer_note: None,
        }
    }

    /// Sets the delivery address.
    #[must_use]
    pub fn with_delivery_address(mut self, address: DeliveryAddress) -> Self {
        self.delivery_address = Some(address);
        self
    }

    /// Sets the tax rate.
    #[must_use]
    pub const fn with_tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Sets the delivery fee.
    #[must_use]
    pub const fn with_delivery_fee(mut self, fee: Money) -> Self {
        self.delivery_fee = Some(fee);
        self
    }

    /// Sets the customer note.
    #[must_use]
    pub fn with_customer_note(mut self, note: impl Into<String>) -> Self {
        self.customer_note = Some(note.into());
        self
    }

    fn into_draft(self) -> OrderDraft {
        OrderDraft {
            restaurant_id: self.restaurant_id,
            customer_id: self.customer_id,
            customer: self.customer,
            mode: self.mode,
            delivery_address: self.delivery_address,
            items: self.items,
            tax_rate: self.tax_rate,
            delivery_fee: self.delivery_fee,
            customer_note: self.customer_note,
        }
    }
}

/// Request payload for a restaurant-initiated status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOrderStatusRequest {
    order_id: OrderId,
    restaurant_id: RestaurantId,
    status: String,
    note: Option<String>,
}

impl TransitionOrderStatusRequest {
    /// Creates a request moving `order_id` to the raw `status` token.
    #[must_use]
    pub fn new(order_id: OrderId, restaurant_id: RestaurantId, status: impl Into<String>) -> Self {
        Self {
            order_id,
            restaurant_id,
            status: status.into(),
            note: None,
        }
    }

    /// Sets the restaurant note; required when cancelling.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns the target order.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the raw requested status token.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Result of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransitionOutcome {
    /// The order as persisted after the change.
    pub order: Order,
    /// The applied status move.
    pub change: StatusChange,
}

impl StatusTransitionOutcome {
    /// Returns `"Order status updated from <old> to <new> successfully"`.
    #[must_use]
    pub fn message(&self) -> String {
        self.change.to_string()
    }
}

/// Service-level errors for order lifecycle operations.
#[derive(Debug, Error)]
pub enum OrderLifecycleError {
    /// The order does not exist or belongs to someone else.
    #[error("Order not found")]
    NotFound(OrderId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] OrderDomainError),
    /// The order status changed between read and write.
    #[error("Order status was changed by another request (now '{actual}'); reload and retry")]
    StatusConflict {
        /// Order being updated.
        order_id: OrderId,
        /// Status this request was based on.
        expected: OrderStatus,
        /// Status currently stored.
        actual: OrderStatus,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] OrderRepositoryError),
    /// Storage failed while recording a new order.
    #[error("failed to record order: {0}")]
    Placement(OrderRepositoryError),
}

impl OrderLifecycleError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Domain(OrderDomainError::AmountOverflow)
            | Self::Repository(_)
            | Self::Placement(_) => FailureKind::Internal,
            Self::Domain(_) => FailureKind::Validation,
            Self::StatusConflict { .. } => FailureKind::Conflict,
        }
    }

    /// Builds the caller-facing error body.
    ///
    /// Internal failures get a generic message; their detail is only logged.
    #[must_use]
    pub fn response_body(&self) -> ErrorBody {
        match self {
            Self::Domain(domain) if self.kind() == FailureKind::Validation => {
                let body = ErrorBody::message(domain.to_string());
                match domain.valid_statuses() {
                    Some(statuses) => body.with_valid_statuses(statuses),
                    None => body,
                }
            }
            Self::Placement(_) | Self::Domain(OrderDomainError::AmountOverflow) => {
                ErrorBody::message(PLACEMENT_FAILURE_MESSAGE)
            }
            Self::Repository(_) => ErrorBody::message(STATUS_UPDATE_FAILURE_MESSAGE),
            _ => ErrorBody::message(self.to_string()),
        }
    }

    fn from_update(err: OrderRepositoryError) -> Self {
        match err {
            OrderRepositoryError::NotFound(order_id) => Self::NotFound(order_id),
            OrderRepositoryError::StatusConflict {
                order_id,
                expected,
                actual,
            } => Self::StatusConflict {
                order_id,
                expected,
                actual,
            },
            other => Self::Repository(other),
        }
    }
}

/// Result type for order lifecycle service operations.
pub type OrderLifecycleResult<T> = Result<T, OrderLifecycleError>;

/// Order lifecycle orchestration service.
///
/// This is the only component that changes an order's status. Every change
/// is validated, persisted with a compare-and-swap on the previous status,
/// and then announced through the publisher on a best-effort basis.
#[derive(Clone)]
pub struct OrderLifecycleService<R, P, C>
where
    R: OrderRepository,
    P: OrderEventPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> OrderLifecycleService<R, P, C>
where
    R: OrderRepository,
    P: OrderEventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new order lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// Records a checkout-produced order in status `new`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::Domain`] when the order is malformed
    /// or [`OrderLifecycleError::Placement`] when persistence fails.
    #[instrument(skip_all, fields(restaurant_id = %request.restaurant_id))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> OrderLifecycleResult<Order> {
        let order_number = self
            .repository
            .next_order_number()
            .await
            .map_err(OrderLifecycleError::Placement)?;
        let order = Order::place(request.into_draft(), order_number, &*self.clock)?;
        if let Err(err) = self.repository.store(&order).await {
            error!(order_id = %order.id(), error = %err, "failed to record order");
            return Err(OrderLifecycleError::Placement(err));
        }
        info!(order_id = %order.id(), %order_number, "order placed");
        Ok(order)
    }

    /// Moves an order to the requested status on behalf of its restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the restaurant does not
    /// own such an order, [`OrderLifecycleError::Domain`] for rejected
    /// transitions or a missing cancellation note,
    /// [`OrderLifecycleError::StatusConflict`] when a concurrent change won,
    /// and [`OrderLifecycleError::Repository`] for storage failures.
    #[instrument(
        skip_all,
        fields(
            order_id = %request.order_id,
            restaurant_id = %request.restaurant_id,
            requested = %request.status
        )
    )]
    pub async fn transition_status(
        &self,
        request: TransitionOrderStatusRequest,
    ) -> OrderLifecycleResult<StatusTransitionOutcome> {
        let mut order = self
            .repository
            .find_for_restaurant(request.order_id, request.restaurant_id)
            .await?
            .ok_or(OrderLifecycleError::NotFound(request.order_id))?;

        let read_status = order.status();
        let requested = resolve_requested_status(order.mode(), read_status, &request.status)?;
        let change = order.transition_status(requested, request.note.as_deref(), &*self.clock)?;

        self.commit(order, read_status, change).await
    }

    /// Withdraws a customer's own order while it is still `new`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderLifecycleError::NotFound`] when the customer has no such
    /// order, [`OrderLifecycleError::Domain`] when the order has progressed,
    /// and the same persistence errors as [`Self::transition_status`].
    #[instrument(skip_all, fields(%order_id, %customer_id))]
    pub async fn cancel_for_customer(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
    ) -> OrderLifecycleResult<StatusTransitionOutcome> {
        let mut order = self
            .repository
            .find_by_id(order_id)
            .await?
            .filter(|order| order.customer_id() == customer_id)
            .ok_or(OrderLifecycleError::NotFound(order_id))?;

        let read_status = order.status();
        let change = order.cancel_by_customer(&*self.clock)?;

        self.commit(order, read_status, change).await
    }

    async fn commit(
        &self,
        order: Order,
        read_status: OrderStatus,
        change: StatusChange,
    ) -> OrderLifecycleResult<StatusTransitionOutcome> {
        if let Err(err) = self.repository.update_status(&order, read_status).await {
            if matches!(err, OrderRepositoryError::Persistence(_)) {
                error!(order_id = %order.id(), error = %err, "failed to persist order status");
            }
            return Err(OrderLifecycleError::from_update(err));
        }

        info!(
            order_id = %order.id(),
            previous = %change.previous,
            current = %change.current,
            "order status updated"
        );
        self.notify(&order, change).await;

        Ok(StatusTransitionOutcome { order, change })
    }

    async fn notify(&self, order: &Order, change: StatusChange) {
        let event = OrderStatusChanged::from_change(order, change);
        if let Err(err) = self.publisher.publish(&event).await {
            warn!(
                order_id = %order.id(),
                new_status = %change.current,
                error = %err,
                "order status notification failed; committed status is kept"
            );
        }
    }
}
