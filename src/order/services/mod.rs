//! Orchestration services for order lifecycle and order views.

mod lifecycle;
mod query;
mod response;

pub use lifecycle::{
    OrderLifecycleError, OrderLifecycleResult, OrderLifecycleService, PlaceOrderRequest,
    StatusTransitionOutcome, TransitionOrderStatusRequest,
};
pub use query::{
    LineItemSummary, OrderListing, OrderQueryError, OrderQueryResult, OrderQueryService,
    OrderSummary,
};
pub use response::{ErrorBody, FailureKind};
