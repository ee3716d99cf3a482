//! Shared test helpers for in-memory order integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use orderflow::order::{
    adapters::{OrderStatusHub, memory::InMemoryOrderRepository},
    domain::{
        CustomerDetails, CustomerId, DeliveryAddress, FulfillmentMode, LineItem, Money, Order,
        RestaurantId, TaxRate,
    },
    ports::OrderEventPublisher,
    services::{OrderLifecycleService, OrderQueryService, PlaceOrderRequest},
};

/// Lifecycle service publishing to an arbitrary publisher.
pub type LifecycleService<P> = OrderLifecycleService<InMemoryOrderRepository, P, DefaultClock>;

/// Services sharing one repository, publishing through a broadcast hub.
pub struct Marketplace {
    pub repository: Arc<InMemoryOrderRepository>,
    pub hub: Arc<OrderStatusHub>,
    pub lifecycle: LifecycleService<OrderStatusHub>,
    pub queries: OrderQueryService<InMemoryOrderRepository>,
}

impl Marketplace {
    /// Creates an empty marketplace with a small broadcast buffer.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryOrderRepository::new());
        let hub = Arc::new(OrderStatusHub::new(16));
        Self {
            lifecycle: lifecycle_with(Arc::clone(&repository), Arc::clone(&hub)),
            queries: OrderQueryService::new(Arc::clone(&repository)),
            repository,
            hub,
        }
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a lifecycle service over `repository` and `publisher`.
pub fn lifecycle_with<P: OrderEventPublisher>(
    repository: Arc<InMemoryOrderRepository>,
    publisher: Arc<P>,
) -> LifecycleService<P> {
    OrderLifecycleService::new(repository, publisher, Arc::new(DefaultClock))
}

/// Builds a checkout request for `mode` with two lines totalling 28.00.
///
/// # Errors
///
/// Returns an error if the fixed customer or line item data is rejected.
pub fn checkout(
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    mode: FulfillmentMode,
) -> Result<PlaceOrderRequest, eyre::Report> {
    let customer = CustomerDetails::new("Grace", "Hopper", "grace@example.com")?
        .with_phone("+1 555 0100");
    let items = [
        LineItem::new("Pad Thai", Money::from_cents(1_100), 2)?,
        LineItem::new("Spring Rolls", Money::from_cents(600), 1)?,
    ];
    let request = PlaceOrderRequest::new(restaurant_id, customer_id, customer, mode, items)
        .with_tax_rate(TaxRate::from_basis_points(1_000));

    Ok(match mode {
        FulfillmentMode::Delivery => request
            .with_delivery_address(DeliveryAddress {
                street: "1 Harbour Way".to_owned(),
                city: "Arlington".to_owned(),
                state: "VA".to_owned(),
                country: "US".to_owned(),
                zip_code: "22201".to_owned(),
            })
            .with_delivery_fee(Money::from_cents(350)),
        FulfillmentMode::Pickup => request,
    })
}

/// Places an order through `service`.
///
/// # Errors
///
/// Returns an error if the request cannot be built or placement fails.
pub async fn place<P: OrderEventPublisher>(
    service: &LifecycleService<P>,
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    mode: FulfillmentMode,
) -> Result<Order, eyre::Report> {
    let request = checkout(restaurant_id, customer_id, mode)?;
    Ok(service.place_order(request).await?)
}
