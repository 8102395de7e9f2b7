pub mod memory;
pub mod repository;
pub mod service;

pub use memory::InMemoryStore;
pub use service::{BookingCreated, BookingService, BookingSummary, BookingUpdateMode, RoomSummary};

/// Boxed failure coming out of a repository implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Business rule violated: {0}")]
    BusinessRule(String),
    #[error("Store failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        BookingError::Store(err)
    }
}

pub type CoreResult<T> = Result<T, BookingError>;
