//! In-memory integration tests for status-change notifications.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Marketplace, lifecycle_with, place};
use orderflow::{
    config::NotificationConfig,
    order::{
        adapters::{
            OrderStatusHub, QueuedOrderEventPublisher,
            memory::{InMemoryOrderRepository, RecordingOrderEventPublisher},
        },
        domain::{CustomerId, FulfillmentMode, OrderStatus, RestaurantId},
        ports::{OrderEventPublisher, OrderEventPublisherError},
        services::TransitionOrderStatusRequest,
    },
};
use rstest::rstest;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_feed_receives_only_own_updates() -> Result<(), eyre::Report> {
    let marketplace = Marketplace::new();
    let restaurant_id = RestaurantId::new();
    let watcher = CustomerId::new();
    let mine = place(
        &marketplace.lifecycle,
        restaurant_id,
        watcher,
        FulfillmentMode::Delivery,
    )
    .await?;
    let theirs = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Delivery,
    )
    .await?;
    let mut feed = marketplace.hub.subscribe_customer(watcher);

    for order in [&theirs, &mine] {
        marketplace
            .lifecycle
            .transition_status(TransitionOrderStatusRequest::new(
                order.id(),
                restaurant_id,
                "received",
            ))
            .await?;
    }

    let event = timeout(WAIT, feed.next())
        .await?
        .ok_or_else(|| eyre::eyre!("feed closed before any event"))?;
    assert_eq!(event.order_id, mine.id());
    assert_eq!(event.previous_status_label, "New");
    assert_eq!(event.new_status_label, "Received");
    assert_eq!(event.new_status, OrderStatus::Received);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hub_without_subscribers_does_not_fail_transitions() -> Result<(), eyre::Report> {
    let marketplace = Marketplace::new();
    eyre::ensure!(marketplace.hub.subscriber_count() == 0, "no subscribers");
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
            "pickup_ready",
        ))
        .await?;

    assert_eq!(outcome.order.status(), OrderStatus::PickupReady);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_events_reach_the_downstream_in_order() -> Result<(), eyre::Report> {
    let downstream = Arc::new(RecordingOrderEventPublisher::new());
    let (queue, dispatcher) =
        QueuedOrderEventPublisher::new(Arc::clone(&downstream), &NotificationConfig::immediate());
    let worker = dispatcher.spawn();
    let repository = Arc::new(InMemoryOrderRepository::new());
    let service = lifecycle_with(repository, Arc::new(queue));
    let restaurant_id = RestaurantId::new();
    let order = place(&service, restaurant_id, CustomerId::new(), FulfillmentMode::Pickup).await?;

    for status in ["received", "pickup_ready", "picked_up"] {
        service
            .transition_status(TransitionOrderStatusRequest::new(
                order.id(),
                restaurant_id,
                status,
            ))
            .await?;
    }
    drop(service);
    let stats = timeout(WAIT, worker).await??;

    assert_eq!(stats.delivered, 3);
    assert_eq!(stats.dropped, 0);
    let delivered: Vec<_> = downstream
        .events()?
        .into_iter()
        .map(|event| event.new_status)
        .collect();
    assert_eq!(
        delivered,
        vec![
            OrderStatus::Received,
            OrderStatus::PickupReady,
            OrderStatus::PickedUp
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undeliverable_events_are_dropped_after_retries() -> Result<(), eyre::Report> {
    let downstream = Arc::new(RecordingOrderEventPublisher::new());
    downstream.set_failing(true)?;
    let (queue, dispatcher) =
        QueuedOrderEventPublisher::new(Arc::clone(&downstream), &NotificationConfig::immediate());
    let worker = dispatcher.spawn();
    let repository = Arc::new(InMemoryOrderRepository::new());
    let service = lifecycle_with(Arc::clone(&repository), Arc::new(queue));
    let restaurant_id = RestaurantId::new();
    let order = place(&service, restaurant_id, CustomerId::new(), FulfillmentMode::Delivery).await?;

    service
        .transition_status(TransitionOrderStatusRequest::new(
            order.id(),
            restaurant_id,
            "received",
        ))
        .await?;
    drop(service);
    let stats = timeout(WAIT, worker).await??;

    assert_eq!(stats.delivered, 0);
    assert_eq!(stats.dropped, 1);
    let queries = orderflow::order::services::OrderQueryService::new(repository);
    let summary = queries.order_details(order.id(), restaurant_id).await?;
    assert_eq!(summary.status, OrderStatus::Received);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_queue_rejects_without_blocking() -> Result<(), eyre::Report> {
    let config = NotificationConfig {
        queue_capacity: 1,
        ..NotificationConfig::immediate()
    };
    let (queue, _dispatcher) =
        QueuedOrderEventPublisher::new(Arc::new(OrderStatusHub::default()), &config);
    let marketplace = Marketplace::new();
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Delivery,
    )
    .await?;
    let mut feed = marketplace.hub.subscribe();
    marketplace
        .lifecycle
        .transition_status(TransitionOrderStatusRequest::new(
            order.id(),
            restaurant_id,
            "received",
        ))
        .await?;
    let event = timeout(WAIT, feed.recv()).await??;

    queue.publish(&event).await?;
    let second = queue.publish(&event).await;

    assert!(matches!(
        second,
        Err(OrderEventPublisherError::QueueFull(order_id)) if order_id == order.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publishing_after_dispatcher_shutdown_reports_closed() -> Result<(), eyre::Report> {
    let (queue, dispatcher) = QueuedOrderEventPublisher::new(
        Arc::new(RecordingOrderEventPublisher::new()),
        &NotificationConfig::immediate(),
    );
    drop(dispatcher);
    let marketplace = Marketplace::new();
    let restaurant_id = RestaurantId::new();
    let order = place(
        &marketplace.lifecycle,
        restaurant_id,
        CustomerId::new(),
        FulfillmentMode::Pickup,
    )
    .await?;
    let mut feed = marketplace.hub.subscribe();
    marketplace
        .lifecycle
        .cancel_for_customer(order.id(), order.customer_id())
        .await?;
    let event = timeout(WAIT, feed.recv()).await??;

    let result = queue.publish(&event).await;

    assert!(matches!(result, Err(OrderEventPublisherError::Closed)));
    Ok(())
}
