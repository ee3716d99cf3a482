//! In-memory integration tests for order listings.

use super::helpers::{Marketplace, place};
use orderflow::order::{
    domain::{CustomerId, FulfillmentMode, Money, OrderStatus, RestaurantId},
    services::TransitionOrderStatusRequest,
};
use rstest::{fixture, rstest};

#[fixture]
fn marketplace() -> Marketplace {
    Marketplace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restaurant_dashboard_filters_and_summarises(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let preparing = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Delivery,
    )
    .await?;
    place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;
    place(
        &marketplace.lifecycle,
        RestaurantId::new(),
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;
    marketplace
        .lifecycle
        .transition_status(TransitionOrderStatusRequest::new(
            preparing.id(),
            restaurant_id,
            "preparing",
        ))
        .await?;

    let all = marketplace
        .queries
        .list_restaurant_orders(restaurant_id, None)
        .await?;
    assert_eq!(all.count, 2);

    let filtered = marketplace
        .queries
        .list_restaurant_orders(restaurant_id, Some("preparing"))
        .await?;
    assert_eq!(filtered.count, 1);
    let summary = filtered
        .orders
        .first()
        .ok_or_else(|| eyre::eyre!("expected one preparing order"))?;
    assert_eq!(summary.id, preparing.id());
    assert_eq!(summary.status, OrderStatus::Preparing);
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.subtotal, Money::from_cents(2_800));
    assert_eq!(summary.tax_amount, Money::from_cents(280));
    assert_eq!(summary.total, Money::from_cents(3_430));
    assert_eq!(
        summary.items.iter().map(|line| line.line_total).collect::<Vec<_>>(),
        vec![Money::from_cents(2_200), Money::from_cents(600)]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_history_lists_only_their_orders(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let customer_id = CustomerId::new();
    for _ in 0..3 {
        place(
            &marketplace.lifecycle,
            RestaurantId::new(),
            customer_id,
            FulfillmentMode::Pickup,
        )
        .await?;
    }
    place(
        &marketplace.lifecycle,
        RestaurantId::new(),
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;

    let history = marketplace.queries.list_customer_orders(customer_id).await?;

    assert_eq!(history.count, 3);
    assert!(
        history
            .orders
            .windows(2)
            .all(|pair| match pair {
                [newer, older] => newer.created_at >= older.created_at,
                _ => true,
            })
    );
    assert!(history.orders.iter().all(|order| order.customer_id == customer_id));
    Ok(())
}
