use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::repository::{BookingRepository, EnrollmentRepository, TicketRepository};
use crate::{BookingError, CoreResult};

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub id: i32,
    #[serde(rename = "Room")]
    pub room: RoomSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: i32,
}

/// How a room change is written.
///
/// `Insert` adds a fresh booking row and ignores the booking id from the path.
/// `Replace` moves the caller's booking identified by that id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingUpdateMode {
    #[default]
    Insert,
    Replace,
}

// ============================================================================
// Service
// ============================================================================

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
    update_mode: BookingUpdateMode,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self {
            bookings,
            enrollments,
            tickets,
            update_mode: BookingUpdateMode::default(),
        }
    }

    pub fn with_update_mode(mut self, mode: BookingUpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub async fn get_booking(&self, user_id: i32) -> CoreResult<BookingSummary> {
        let found = self
            .bookings
            .find_booking_by_user_id(user_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("no booking for user {}", user_id)))?;

        Ok(BookingSummary {
            id: found.booking.id,
            room: RoomSummary {
                id: found.booking.room_id,
                name: found.room.name,
                capacity: found.room.capacity,
                hotel_id: found.room.hotel_id,
                created_at: found.room.created_at,
                updated_at: found.room.updated_at,
            },
        })
    }

    pub async fn post_booking(&self, user_id: i32, room_id: i32) -> CoreResult<BookingCreated> {
        self.check_eligibility(user_id, room_id).await?;

        let booking = self
            .bookings
            .create_booking(user_id, room_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("booking was not created".to_string()))?;

        info!("Booking {} created: user {} -> room {}", booking.id, user_id, room_id);
        Ok(BookingCreated { booking_id: booking.id })
    }

    pub async fn put_booking(
        &self,
        user_id: i32,
        room_id: i32,
        booking_id: &str,
    ) -> CoreResult<BookingCreated> {
        self.check_room(room_id).await?;
        // The occupancy rule runs again here, so a user can never move into a taken room.
        self.check_eligibility(user_id, room_id).await?;

        let booking = match self.update_mode {
            BookingUpdateMode::Insert => self.bookings.create_booking(user_id, room_id).await?,
            BookingUpdateMode::Replace => match booking_id.parse::<i32>() {
                Ok(id) => self.bookings.update_booking_room(id, user_id, room_id).await?,
                Err(_) => None,
            },
        }
        .ok_or_else(|| BookingError::NotFound(format!("booking {} not found", booking_id)))?;

        info!(
            "Booking {} moved to room {} for user {} ({:?})",
            booking.id, room_id, user_id, self.update_mode
        );
        Ok(BookingCreated { booking_id: booking.id })
    }

    /// Guards shared by booking creation and room changes.
    ///
    /// The order is observable: an occupied room reports a rule violation
    /// before a missing room reports not found.
    pub async fn check_eligibility(&self, user_id: i32, room_id: i32) -> CoreResult<()> {
        ensure_valid_room_id(room_id)?;

        let enrollment = self
            .enrollments
            .find_with_address_by_user_id(user_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("no enrollment for user {}", user_id)))?;

        let ticket = self
            .tickets
            .find_ticket_by_enrollment_id(enrollment.id)
            .await?;
        match ticket {
            Some(ticket) if ticket.grants_hotel() => {}
            Some(ticket) => {
                warn!(
                    "User {} ticket {} does not grant a hotel room (status {}, remote {}, hotel {})",
                    user_id,
                    ticket.ticket.id,
                    ticket.ticket.status,
                    ticket.ticket_type.is_remote,
                    ticket.ticket_type.includes_hotel
                );
                return Err(BookingError::BusinessRule(
                    "ticket does not include hotel accommodation".to_string(),
                ));
            }
            None => {
                return Err(BookingError::BusinessRule(format!(
                    "no ticket for enrollment {}",
                    enrollment.id
                )));
            }
        }

        if self.bookings.find_booking_by_room_id(room_id).await?.is_some() {
            warn!("Room {} is already booked", room_id);
            return Err(BookingError::BusinessRule(format!("room {} is already booked", room_id)));
        }

        self.bookings
            .find_room_by_id(room_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("room {} not found", room_id)))?;

        Ok(())
    }

    async fn check_room(&self, room_id: i32) -> CoreResult<()> {
        ensure_valid_room_id(room_id)?;
        self.bookings
            .find_room_by_id(room_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("room {} not found", room_id)))?;
        Ok(())
    }
}

fn ensure_valid_room_id(room_id: i32) -> CoreResult<()> {
    if room_id < 1 {
        return Err(BookingError::BusinessRule(format!("invalid room id {}", room_id)));
    }
    Ok(())
}
