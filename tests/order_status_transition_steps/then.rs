//! Then steps for order status transition BDD scenarios.

use super::world::{OrderTransitionWorld, run_async};
use orderflow::order::{
    domain::OrderStatus,
    ports::OrderRepository,
    services::{FailureKind, OrderLifecycleError},
};
use rstest_bdd_macros::then;

fn last_error(world: &OrderTransitionWorld) -> Result<&OrderLifecycleError, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(outcome)) => Err(eyre::eyre!(
            "expected a rejection, got success: {}",
            outcome.message()
        )),
        None => Err(eyre::eyre!("missing transition result")),
    }
}

#[then(r#"the order status is "{status}""#)]
fn order_status_is(world: &OrderTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = OrderStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let order_id = world.placed_order()?.id();
    let stored = run_async(world.repository.find_by_id(order_id))?
        .ok_or_else(|| eyre::eyre!("order {order_id} missing from repository"))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the request is rejected as "{kind}""#)]
fn request_rejected_as(world: &OrderTransitionWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = match kind.as_str() {
        "validation" => FailureKind::Validation,
        "not_found" => FailureKind::NotFound,
        "conflict" => FailureKind::Conflict,
        "internal" => FailureKind::Internal,
        other => return Err(eyre::eyre!("unknown failure kind in scenario: {other}")),
    };
    let err = last_error(world)?;
    eyre::ensure!(
        err.kind() == expected,
        "expected {expected:?} failure, got {:?}: {err}",
        err.kind()
    );
    Ok(())
}

#[then(r#"the response lists the valid statuses "{statuses}""#)]
fn response_lists_valid_statuses(
    world: &OrderTransitionWorld,
    statuses: String,
) -> Result<(), eyre::Report> {
    let expected = statuses
        .split(',')
        .map(|token| {
            OrderStatus::try_from(token)
                .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let body = last_error(world)?.response_body();

    eyre::ensure!(
        body.valid_statuses.as_deref() == Some(expected.as_slice()),
        "unexpected valid statuses {:?}",
        body.valid_statuses
    );
    Ok(())
}

#[then(r#"the response message is "{message}""#)]
fn response_message_is(world: &OrderTransitionWorld, message: String) -> Result<(), eyre::Report> {
    let body = last_error(world)?.response_body();
    eyre::ensure!(
        body.message == message,
        "expected message {message:?}, got {:?}",
        body.message
    );
    Ok(())
}

#[then(r#"the customer is notified of "{label}""#)]
fn customer_notified_of(world: &OrderTransitionWorld, label: String) -> Result<(), eyre::Report> {
    let order = world.placed_order()?;
    let events = world.publisher.events()?;
    let last = events
        .last()
        .ok_or_else(|| eyre::eyre!("no notification was published"))?;

    eyre::ensure!(last.order_id == order.id(), "notification for another order");
    eyre::ensure!(last.customer_id == order.customer_id(), "wrong customer");
    eyre::ensure!(
        last.new_status_label == label,
        "expected label {label:?}, got {:?}",
        last.new_status_label
    );
    Ok(())
}

#[then("no notification is sent")]
fn no_notification_sent(world: &OrderTransitionWorld) -> Result<(), eyre::Report> {
    let events = world.publisher.events()?;
    eyre::ensure!(events.is_empty(), "expected no notifications, found {}", events.len());
    Ok(())
}
