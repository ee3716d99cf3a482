//! Order status management for restaurant orders.
//!
//! Orders are placed in status `new` and then moved through the status set
//! of their fulfillment mode by the owning restaurant. Every committed change
//! is announced to subscribers so the customer sees progress in real time.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
