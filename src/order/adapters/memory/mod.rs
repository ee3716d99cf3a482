//! In-memory adapters for order persistence and notification.

mod publisher;
mod repository;

pub use publisher::RecordingOrderEventPublisher;
pub use repository::InMemoryOrderRepository;
