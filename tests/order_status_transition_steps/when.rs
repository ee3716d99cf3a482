//! When steps for order status transition BDD scenarios.

use super::world::{OrderTransitionWorld, run_async};
use orderflow::order::services::TransitionOrderStatusRequest;
use rstest_bdd_macros::when;

fn submit(
    world: &mut OrderTransitionWorld,
    request: TransitionOrderStatusRequest,
) {
    let result = run_async(world.service.transition_status(request));
    if let Ok(ref outcome) = result {
        world.order = Some(outcome.order.clone());
    }
    world.last_result = Some(result);
}

#[when(r#"the restaurant requests status "{status}""#)]
fn restaurant_requests_status(
    world: &mut OrderTransitionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let order_id = world.placed_order()?.id();
    let request = TransitionOrderStatusRequest::new(order_id, world.restaurant_id, status);
    submit(world, request);
    Ok(())
}

#[when(r#"the restaurant cancels with note "{note}""#)]
fn restaurant_cancels_with_note(
    world: &mut OrderTransitionWorld,
    note: String,
) -> Result<(), eyre::Report> {
    let order_id = world.placed_order()?.id();
    let request =
        TransitionOrderStatusRequest::new(order_id, world.restaurant_id, "cancelled").with_note(note);
    submit(world, request);
    Ok(())
}
