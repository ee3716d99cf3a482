//! Orderflow: order status management for a food-ordering marketplace.
//!
//! This crate owns the lifecycle of restaurant orders after checkout: placing
//! them, moving them through the status set of their fulfillment mode, and
//! announcing every committed change to interested customers.
//!
//! # Architecture
//!
//! Orderflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, channels, etc.)
//!
//! # Modules
//!
//! - [`order`]: Order status transitions, listings, and notifications
//! - [`config`]: Runtime configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod order;
pub mod telemetry;
