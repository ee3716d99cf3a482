//! Repository port for order persistence, lookup, and status updates.

use crate::order::domain::{CustomerId, Order, OrderId, OrderNumber, OrderStatus, RestaurantId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for order repository operations.
pub type OrderRepositoryResult<T> = Result<T, OrderRepositoryError>;

/// Order persistence contract.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Reserves the next human-facing order number.
    ///
    /// Numbers are unique and strictly increasing per store.
    async fn next_order_number(&self) -> OrderRepositoryResult<OrderNumber>;

    /// Stores a newly placed order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::DuplicateOrder`] when the order ID
    /// already exists or [`OrderRepositoryError::DuplicateOrderNumber`] when
    /// the order number is taken.
    async fn store(&self, order: &Order) -> OrderRepositoryResult<()>;

    /// Persists the status, restaurant note, cancellation attribution, and
    /// updated timestamp of `order`, provided the stored status still equals
    /// `expected_status`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRepositoryError::NotFound`] when the order does not
    /// exist or [`OrderRepositoryError::StatusConflict`] when another writer
    /// changed the status first.
    async fn update_status(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> OrderRepositoryResult<()>;

    /// Finds an order by identifier.
    ///
    /// Returns `None` when the order does not exist.
    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>>;

    /// Finds an order by identifier, scoped to its owning restaurant.
    ///
    /// Returns `None` when the order does not exist or belongs to another
    /// restaurant.
    async fn find_for_restaurant(
        &self,
        id: OrderId,
        restaurant_id: RestaurantId,
    ) -> OrderRepositoryResult<Option<Order>>;

    /// Returns the restaurant's orders, optionally restricted to one status.
    ///
    /// No ordering is guaranteed.
    async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        status: Option<OrderStatus>,
    ) -> OrderRepositoryResult<Vec<Order>>;

    /// Returns the customer's orders. No ordering is guaranteed.
    async fn list_for_customer(&self, customer_id: CustomerId)
    -> OrderRepositoryResult<Vec<Order>>;
}

/// Errors returned by order repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OrderRepositoryError {
    /// An order with the same identifier already exists.
    #[error("duplicate order identifier: {0}")]
    DuplicateOrder(OrderId),

    /// An order with the same order number already exists.
    #[error("duplicate order number: {0}")]
    DuplicateOrderNumber(OrderNumber),

    /// The order was not found.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// The stored status no longer matches the status the update was based on.
    #[error("order {order_id} status changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        /// Order being updated.
        order_id: OrderId,
        /// Status the caller read before updating.
        expected: OrderStatus,
        /// Status currently stored.
        actual: OrderStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
