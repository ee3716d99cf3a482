//! `PostgreSQL` repository implementation for order storage.

use super::{
    models::{NewOrderRow, OrderRow, OrderStatusChangeset, SequenceValue},
    schema::orders,
};
use crate::order::{
    domain::{
        CancellationParty, CustomerId, FulfillmentMode, Order, OrderId, OrderNumber, OrderStatus,
        PersistedOrderData, RestaurantId,
    },
    ports::{OrderRepository, OrderRepositoryError, OrderRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by order adapters.
pub type OrderPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed order repository.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: OrderPgPool,
}

impl PostgresOrderRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: OrderPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> OrderRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> OrderRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(OrderRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(OrderRepositoryError::persistence)?
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn next_order_number(&self) -> OrderRepositoryResult<OrderNumber> {
        self.run_blocking(|connection| {
            let next = diesel::sql_query("SELECT nextval('order_number_seq') AS value")
                .get_result::<SequenceValue>(connection)
                .map_err(OrderRepositoryError::persistence)?;
            let value = u64::try_from(next.value).map_err(OrderRepositoryError::persistence)?;
            OrderNumber::new(value).map_err(OrderRepositoryError::persistence)
        })
        .await
    }

    async fn store(&self, order: &Order) -> OrderRepositoryResult<()> {
        let order_id = order.id();
        let order_number = order.order_number();
        let new_row = to_new_row(order)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(orders::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_order_number_unique_violation(info.as_ref()) =>
                    {
                        OrderRepositoryError::DuplicateOrderNumber(order_number)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        OrderRepositoryError::DuplicateOrder(order_id)
                    }
                    _ => OrderRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_status(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> OrderRepositoryResult<()> {
        let order_id = order.id();
        let changeset = OrderStatusChangeset {
            status: order.status().as_str().to_owned(),
            restaurant_note: order.restaurant_note().map(str::to_owned),
            cancelled_by: order.cancelled_by().map(|party| party.as_str().to_owned()),
            updated_at: order.updated_at(),
        };

        self.run_blocking(move |connection| {
            // The status predicate turns the write into a compare-and-swap.
            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(order_id.into_inner()))
                    .filter(orders::status.eq(expected_status.as_str())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(OrderRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }

            let stored_status = orders::table
                .filter(orders::id.eq(order_id.into_inner()))
                .select(orders::status)
                .first::<String>(connection)
                .optional()
                .map_err(OrderRepositoryError::persistence)?;

            match stored_status {
                None => Err(OrderRepositoryError::NotFound(order_id)),
                Some(raw) => {
                    let actual = OrderStatus::try_from(raw.as_str())
                        .map_err(OrderRepositoryError::persistence)?;
                    Err(OrderRepositoryError::StatusConflict {
                        order_id,
                        expected: expected_status,
                        actual,
                    })
                }
            }
        })
        .await
    }

    async fn find_by_id(&self, id: OrderId) -> OrderRepositoryResult<Option<Order>> {
        self.run_blocking(move |connection| {
            let row = orders::table
                .filter(orders::id.eq(id.into_inner()))
                .select(OrderRow::as_select())
                .first::<OrderRow>(connection)
                .optional()
                .map_err(OrderRepositoryError::persistence)?;
            row.map(row_to_order).transpose()
        })
        .await
    }

    async fn find_for_restaurant(
        &self,
        id: OrderId,
        restaurant_id: RestaurantId,
    ) -> OrderRepositoryResult<Option<Order>> {
        self.run_blocking(move |connection| {
            let row = orders::table
                .filter(orders::id.eq(id.into_inner()))
                .filter(orders::restaurant_id.eq(restaurant_id.into_inner()))
                .select(OrderRow::as_select())
                .first::<OrderRow>(connection)
                .optional()
                .map_err(OrderRepositoryError::persistence)?;
            row.map(row_to_order).transpose()
        })
        .await
    }

    async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        status: Option<OrderStatus>,
    ) -> OrderRepositoryResult<Vec<Order>> {
        self.run_blocking(move |connection| {
            let mut query = orders::table
                .filter(orders::restaurant_id.eq(restaurant_id.into_inner()))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(orders::status.eq(wanted.as_str()));
            }
            let rows = query
                .load::<OrderRow>(connection)
                .map_err(OrderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_order).collect()
        })
        .await
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> OrderRepositoryResult<Vec<Order>> {
        self.run_blocking(move |connection| {
            let rows = orders::table
                .filter(orders::customer_id.eq(customer_id.into_inner()))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .load::<OrderRow>(connection)
                .map_err(OrderRepositoryError::persistence)?;
            rows.into_iter().map(row_to_order).collect()
        })
        .await
    }
}

fn to_new_row(order: &Order) -> OrderRepositoryResult<NewOrderRow> {
    let order_number = i64::try_from(order.order_number().value())
        .map_err(OrderRepositoryError::persistence)?;
    let customer =
        serde_json::to_value(order.customer()).map_err(OrderRepositoryError::persistence)?;
    let delivery_address = order
        .delivery_address()
        .map(serde_json::to_value)
        .transpose()
        .map_err(OrderRepositoryError::persistence)?;
    let items = serde_json::to_value(order.items()).map_err(OrderRepositoryError::persistence)?;
    let financials =
        serde_json::to_value(order.financials()).map_err(OrderRepositoryError::persistence)?;

    Ok(NewOrderRow {
        id: order.id().into_inner(),
        order_number,
        restaurant_id: order.restaurant_id().into_inner(),
        customer_id: order.customer_id().into_inner(),
        customer,
        fulfillment_mode: order.mode().as_str().to_owned(),
        delivery_address,
        items,
        financials,
        status: order.status().as_str().to_owned(),
        customer_note: order.customer_note().map(str::to_owned),
        restaurant_note: order.restaurant_note().map(str::to_owned),
        cancelled_by: order.cancelled_by().map(|party| party.as_str().to_owned()),
        created_at: order.created_at(),
        updated_at: order.updated_at(),
    })
}

fn row_to_order(row: OrderRow) -> OrderRepositoryResult<Order> {
    let OrderRow {
        id,
        order_number,
        restaurant_id,
        customer_id,
        customer,
        fulfillment_mode,
        delivery_address,
        items,
        financials,
        status,
        customer_note,
        restaurant_note,
        cancelled_by,
        created_at,
        updated_at,
    } = row;

    let number = u64::try_from(order_number).map_err(OrderRepositoryError::persistence)?;
    let data = PersistedOrderData {
        id: OrderId::from_uuid(id),
        order_number: OrderNumber::new(number).map_err(OrderRepositoryError::persistence)?,
        restaurant_id: RestaurantId::from_uuid(restaurant_id),
        customer_id: CustomerId::from_uuid(customer_id),
        customer: serde_json::from_value(customer).map_err(OrderRepositoryError::persistence)?,
        mode: FulfillmentMode::try_from(fulfillment_mode.as_str())
            .map_err(OrderRepositoryError::persistence)?,
        delivery_address: delivery_address
            .map(serde_json::from_value)
            .transpose()
            .map_err(OrderRepositoryError::persistence)?,
        items: serde_json::from_value(items).map_err(OrderRepositoryError::persistence)?,
        financials: serde_json::from_value(financials)
            .map_err(OrderRepositoryError::persistence)?,
        status: OrderStatus::try_from(status.as_str())
            .map_err(OrderRepositoryError::persistence)?,
        customer_note,
        restaurant_note,
        cancelled_by: cancelled_by
            .as_deref()
            .map(CancellationParty::try_from)
            .transpose()
            .map_err(OrderRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Order::from_persisted(data))
}

fn is_order_number_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_orders_order_number_unique")
}
