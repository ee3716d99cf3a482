//! In-memory integration tests for order placement and status transitions.

use super::helpers::{Marketplace, place};
use orderflow::order::{
    domain::{CustomerId, FulfillmentMode, Money, OrderStatus, RestaurantId},
    services::{FailureKind, OrderLifecycleError, TransitionOrderStatusRequest},
};
use rstest::{fixture, rstest};

#[fixture]
fn marketplace() -> Marketplace {
    Marketplace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_order_walks_the_full_lifecycle(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Delivery,
    )
    .await?;
    eyre::ensure!(
        order.financials().total() == Money::from_cents(3_430),
        "unexpected total {}",
        order.financials().total()
    );

    let mut messages = Vec::new();
    for status in ["received", "preparing", "on_the_way", "delivered"] {
        let outcome = marketplace
            .lifecycle
            .transition_status(TransitionOrderStatusRequest::new(
                order.id(),
                restaurant_id,
                status,
            ))
            .await?;
        messages.push(outcome.message());
    }

    assert_eq!(
        messages.last().map(String::as_str),
        Some("Order status updated from on_the_way to delivered successfully")
    );

    let late = marketplace
        .lifecycle
        .transition_status(TransitionOrderStatusRequest::new(
            order.id(),
            restaurant_id,
            "preparing",
        ))
        .await;
    let Err(err) = late else {
        eyre::bail!("delivered orders must not move back");
    };
    assert_eq!(err.kind(), FailureKind::Validation);

    let refund = marketplace
        .lifecycle
        .transition_status(
            TransitionOrderStatusRequest::new(order.id(), restaurant_id, "cancelled")
                .with_note("Cold on arrival"),
        )
        .await?;
    assert_eq!(refund.order.status(), OrderStatus::Cancelled);
    assert_eq!(refund.order.restaurant_note(), Some("Cold on arrival"));
    Ok(())
}

#[rstest]
#[case("received")]
#[case("preparing")]
#[case("pickup_ready")]
#[tokio::test(flavor = "multi_thread")]
async fn pickup_orders_may_skip_ahead(
    marketplace: Marketplace,
    #[case] target: &str,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;

    let outcome = marketplace
        .lifecycle
        .transition_status(TransitionOrderStatusRequest::new(
            order.id(),
            restaurant_id,
            target,
        ))
        .await?;

    assert_eq!(outcome.order.status().as_str(), target);
    assert_eq!(outcome.change.previous, OrderStatus::New);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_only_status_is_rejected_for_pickup(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;

    let result = marketplace
        .lifecycle
        .transition_status(TransitionOrderStatusRequest::new(
            order.id(),
            restaurant_id,
            "delivered",
        ))
        .await;
    let Err(err) = result else {
        eyre::bail!("pickup orders cannot be delivered");
    };

    let body = serde_json::to_value(err.response_body())?;
    assert_eq!(
        body["validStatuses"],
        serde_json::json!([
            "new",
            "received",
            "preparing",
            "pickup_ready",
            "picked_up",
            "cancelled"
        ])
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_request_loses_to_the_first_writer(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Delivery,
    )
    .await?;

    let first = marketplace.lifecycle.transition_status(TransitionOrderStatusRequest::new(
        order.id(),
        restaurant_id,
        "received",
    ));
    let second = marketplace.lifecycle.transition_status(
        TransitionOrderStatusRequest::new(order.id(), restaurant_id, "cancelled")
            .with_note("Closing early"),
    );
    let (first_result, second_result) = tokio::join!(first, second);

    let successes = [first_result.is_ok(), second_result.is_ok()]
        .into_iter()
        .filter(|ok| *ok)
        .count();
    eyre::ensure!(successes >= 1, "at least one writer must succeed");
    for result in [first_result, second_result] {
        if let Err(err) = result {
            eyre::ensure!(
                matches!(
                    err,
                    OrderLifecycleError::StatusConflict { .. } | OrderLifecycleError::Domain(_)
                ),
                "unexpected failure {err}"
            );
        }
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_withdrawal_is_visible_to_the_restaurant(
    marketplace: Marketplace,
) -> Result<(), eyre::Report> {
    let restaurant_id = RestaurantId::new();
    let customer_id = CustomerId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        customer_id,
        FulfillmentMode::Pickup,
    )
    .await?;

    marketplace
        .lifecycle
        .cancel_for_customer(order.id(), customer_id)
        .await?;

    let summary = marketplace
        .queries
        .order_details(order.id(), restaurant_id)
        .await?;
    assert_eq!(summary.status, OrderStatus::Cancelled);
    assert_eq!(summary.status_label, "Cancelled");
    Ok(())
}
