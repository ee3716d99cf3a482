//! In-memory repository for order lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::order::{
    domain::{CustomerId, Order, OrderId, OrderNumber, OrderStatus, RestaurantId},
    ports::{OrderRepository, OrderRepositoryError, OrderRepositoryResult},
};

/// Thread-safe in-memory order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<InMemoryOrderState>>,
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    number_index: HashMap<OrderNumber, OrderId>,
    last_order_number: u64,
}

impl InMemoryOrderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> OrderRepositoryResult<RwLockReadGuard<'_, InMemoryOrderState>> {
        self.state.read().map_err(|err| {
            OrderRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> OrderRepositoryResult<RwLockWriteGuard<'_, InMemoryOrderState>> {
        self.state.write().map_err(|err| {
            OrderRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn collect_matching(state: &InMemoryOrderState, predicate: impl Fn(&Order) -> bool) -> Vec<Order> {
    state
        .orders
        .values()
        .filter(|order| predicate(order))
        .cloned()
        .collect()
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn next_order_number(&self) -> OrderRepositoryResult<OrderNumber> {
        let mut state = self.write()?;
        let candidate = state.last_order_number.saturating_add(1);
        let number = OrderNumber::new(candidate).map_err(OrderRepositoryError::persistence)?;
        state.last_order_number = candidate;
        Ok(number)
    }

    async fn store(&self, order: &Order) -> OrderRepositoryResult<()> {
        let mut state = self.write()?;
        if state.orders.contains_key(&order.id()) {
            return Err(OrderRepositoryError::DuplicateOrder(order.id()));
        }
        if state.number_index.contains_key(&order.order_number()) {
            return Err(OrderRepositoryError::DuplicateOrderNumber(
                order.order_number(),
            ));
        }

        // Keep the counter ahead of numbers assigned elsewhere.
        state.last_order_number = state.last_order_number.max(order.order_number().value());
        state.number_index.insert(order.order_number(), order.id());
        state.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> OrderRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .orders
            .get(&order.id())
            .ok_or(OrderRepositoryError::NotFound(order.id()))?;

        if stored.status() != expected_status {
            return Err(OrderRepositoryError::StatusConflict {
                order_id: order.id(),
                expected: expected_status,
                actual: stored.status(),
            });
        }

        state.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>> {
        let state = self.read()?;
        Ok(state.orders.get(&id).cloned())
    }

    async fn find_for_restaurant(
        &self,
        id: OrderId,
        restaurant_id: RestaurantId,
    ) -> OrderRepositoryResult<Option<Order>> {
        let state = self.read()?;
        Ok(state
            .orders
            .get(&id)
            .filter(|order| order.restaurant_id() == restaurant_id)
            .cloned())
    }

    async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        status: Option<OrderStatus>,
    ) -> OrderRepositoryResult<Vec<Order>> {
        let state = self.read()?;
        Ok(collect_matching(&state, |order| {
            order.restaurant_id() == restaurant_id
                && status.is_none_or(|wanted| order.status() == wanted)
        }))
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> OrderRepositoryResult<Vec<Order>> {
        let state = self.read()?;
        Ok(collect_matching(&state, |order| {
            order.customer_id() == customer_id
        }))
    }
}
