//! Domain model for order lifecycle management.
//!
//! The order domain models placed orders, their fulfillment-specific status
//! sets, and the rules for moving between statuses while keeping all
//! infrastructure concerns outside of the domain boundary.

mod customer;
mod error;
mod event;
mod ids;
mod order;
mod pricing;
mod status;

pub use customer::{CustomerDetails, DeliveryAddress};
pub use error::{
    OrderDomainError, ParseCancellationPartyError, ParseFulfillmentModeError,
    ParseOrderStatusError,
};
pub use event::OrderStatusChanged;
pub use ids::{CustomerId, OrderId, OrderNumber, RestaurantId};
pub use order::{CancellationParty, Order, OrderDraft, PersistedOrderData, StatusChange};
pub use pricing::{Financials, LineItem, Money, TaxRate};
pub use status::{
    ALL_STATUSES, FulfillmentMode, OrderStatus, format_status_label, resolve_requested_status,
    validate_transition,
};
