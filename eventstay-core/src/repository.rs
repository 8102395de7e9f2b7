use async_trait::async_trait;
use eventstay_shared::{Booking, BookingWithRoom, Enrollment, Room, Session, TicketWithType};

use crate::StoreError;

/// Data access for bookings and the rooms they reference.
///
/// Lookups return `Ok(None)` when nothing matches; only store faults are errors.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_booking_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, StoreError>;

    async fn find_booking_by_room_id(&self, room_id: i32) -> Result<Option<Booking>, StoreError>;

    async fn create_booking(&self, user_id: i32, room_id: i32)
        -> Result<Option<Booking>, StoreError>;

    /// Moves an existing booking owned by `user_id` to another room.
    async fn update_booking_room(
        &self,
        booking_id: i32,
        user_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, StoreError>;

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<Room>, StoreError>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, StoreError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_ticket_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, StoreError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;
}
