//! Diesel row models for order persistence.

use super::schema::orders;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for order records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    /// Internal order identifier.
    pub id: uuid::Uuid,
    /// Human-facing order number.
    pub order_number: i64,
    /// Owning restaurant.
    pub restaurant_id: uuid::Uuid,
    /// Ordering customer.
    pub customer_id: uuid::Uuid,
    /// Customer contact JSON payload.
    pub customer: Value,
    /// Fulfillment mode.
    pub fulfillment_mode: String,
    /// Delivery address JSON payload.
    pub delivery_address: Option<Value>,
    /// Line items JSON payload.
    pub items: Value,
    /// Financial summary JSON payload.
    pub financials: Value,
    /// Lifecycle status.
    pub status: String,
    /// Customer note.
    pub customer_note: Option<String>,
    /// Restaurant note.
    pub restaurant_note: Option<String>,
    /// Cancellation attribution.
    pub cancelled_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for order records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    /// Internal order identifier.
    pub id: uuid::Uuid,
    /// Human-facing order number.
    pub order_number: i64,
    /// Owning restaurant.
    pub restaurant_id: uuid::Uuid,
    /// Ordering customer.
    pub customer_id: uuid::Uuid,
    /// Customer contact JSON payload.
    pub customer: Value,
    /// Fulfillment mode.
    pub fulfillment_mode: String,
    /// Delivery address JSON payload.
    pub delivery_address: Option<Value>,
    /// Line items JSON payload.
    pub items: Value,
    /// Financial summary JSON payload.
    pub financials: Value,
    /// Lifecycle status.
    pub status: String,
    /// Customer note.
    pub customer_note: Option<String>,
    /// Restaurant note.
    pub restaurant_note: Option<String>,
    /// Cancellation attribution.
    pub cancelled_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by a status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderStatusChangeset {
    /// New lifecycle status.
    pub status: String,
    /// Restaurant note after the transition.
    pub restaurant_note: Option<String>,
    /// Cancellation attribution after the transition.
    pub cancelled_by: Option<String>,
    /// Transition timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Single-column result of a sequence query.
#[derive(Debug, Clone, QueryableByName)]
pub struct SequenceValue {
    /// Value returned by `nextval`.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub value: i64,
}
