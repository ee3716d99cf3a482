//! Diesel schema for order persistence.

diesel::table! {
    /// Placed orders with their lifecycle status.
    orders (id) {
        /// Internal order identifier.
        id -> Uuid,
        /// Human-facing order number drawn from `order_number_seq`.
        order_number -> Int8,
        /// Owning restaurant.
        restaurant_id -> Uuid,
        /// Ordering customer.
        customer_id -> Uuid,
        /// Customer contact snapshot.
        customer -> Jsonb,
        /// Fulfillment mode (`delivery` or `pickup`).
        #[max_length = 20]
        fulfillment_mode -> Varchar,
        /// Delivery address for delivery orders.
        delivery_address -> Nullable<Jsonb>,
        /// Line items captured at checkout.
        items -> Jsonb,
        /// Financial summary captured at checkout.
        financials -> Jsonb,
        /// Order lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Note from the customer.
        customer_note -> Nullable<Text>,
        /// Note from the restaurant, set on cancellation.
        restaurant_note -> Nullable<Text>,
        /// Party that cancelled the order.
        #[max_length = 20]
        cancelled_by -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
