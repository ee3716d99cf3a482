//! Given steps for order status transition BDD scenarios.

use super::world::{OrderTransitionWorld, run_async};
use eyre::WrapErr;
use orderflow::order::{
    domain::{
        CustomerDetails, CustomerId, DeliveryAddress, FulfillmentMode, LineItem, Money,
    },
    services::{PlaceOrderRequest, TransitionOrderStatusRequest},
};
use rstest_bdd_macros::given;

#[given(r#"a placed "{mode}" order"#)]
fn placed_order(world: &mut OrderTransitionWorld, mode: String) -> Result<(), eyre::Report> {
    let fulfillment = FulfillmentMode::try_from(mode.as_str())
        .map_err(|err| eyre::eyre!("invalid fulfillment mode in scenario: {err}"))?;
    let customer = CustomerDetails::new("Linus", "Pauling", "linus@example.com")?;
    let items = [LineItem::new("Ramen", Money::from_cents(1_400), 1)?];
    let mut request = PlaceOrderRequest::new(
        world.restaurant_id,
        CustomerId::new(),
        customer,
        fulfillment,
        items,
    );
    if fulfillment == FulfillmentMode::Delivery {
        request = request.with_delivery_address(DeliveryAddress {
            street: "9 Lab Lane".to_owned(),
            city: "Pasadena".to_owned(),
            state: "CA".to_owned(),
            country: "US".to_owned(),
            zip_code: "91125".to_owned(),
        });
    }

    let order = run_async(world.service.place_order(request))
        .wrap_err("place order for transition scenario")?;
    world.order = Some(order);
    Ok(())
}

#[given(r#"the order has been moved to "{status}""#)]
fn order_moved_to(world: &mut OrderTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let order_id = world.placed_order()?.id();
    let outcome = run_async(world.service.transition_status(
        TransitionOrderStatusRequest::new(order_id, world.restaurant_id, status),
    ))
    .wrap_err("transition order in scenario setup")?;
    world.order = Some(outcome.order);
    Ok(())
}
