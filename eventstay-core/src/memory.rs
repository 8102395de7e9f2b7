use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use eventstay_shared::{
    Address, Booking, BookingWithRoom, Enrollment, Masked, Room, Session, Ticket, TicketStatus,
    TicketType, TicketWithType,
};
use tokio::sync::RwLock;

use crate::repository::{
    BookingRepository, EnrollmentRepository, SessionRepository, TicketRepository,
};
use crate::StoreError;

#[derive(Default)]
struct Tables {
    next_id: i32,
    bookings: Vec<Booking>,
    rooms: Vec<Room>,
    enrollments: Vec<Enrollment>,
    tickets: Vec<TicketWithType>,
    sessions: Vec<Session>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store implementing every repository trait.
///
/// Ids come from one shared sequence, so ids of different kinds never collide.
/// The `add_*` helpers seed data the service only ever reads.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh hotel id; hotels carry no data of their own here.
    pub async fn add_hotel(&self) -> i32 {
        self.tables.write().await.next_id()
    }

    pub async fn add_room(&self, hotel_id: i32, capacity: i32) -> Room {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let now = Utc::now();
        let room = Room {
            id,
            name: format!("Room {}", id),
            capacity,
            hotel_id,
            created_at: now,
            updated_at: now,
        };
        tables.rooms.push(room.clone());
        room
    }

    pub async fn add_enrollment(&self, user_id: i32) -> Enrollment {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let address_id = tables.next_id();
        let enrollment = Enrollment {
            id,
            name: format!("Attendee {}", user_id),
            cpf: Masked("00000000191".to_string()),
            birthday: Utc
                .with_ymd_and_hms(1990, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            phone: Masked("(21) 98999-9999".to_string()),
            user_id,
            address: Some(Address {
                id: address_id,
                cep: "20000-000".to_string(),
                street: "Rua Principal".to_string(),
                city: "Rio de Janeiro".to_string(),
                state: "RJ".to_string(),
                number: "100".to_string(),
                neighborhood: "Centro".to_string(),
                address_detail: None,
                enrollment_id: id,
            }),
        };
        tables.enrollments.push(enrollment.clone());
        enrollment
    }

    pub async fn add_ticket_type(&self, is_remote: bool, includes_hotel: bool) -> TicketType {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        TicketType {
            id,
            name: format!("Ticket type {}", id),
            price: if includes_hotel { 600 } else { 250 },
            is_remote,
            includes_hotel,
        }
    }

    pub async fn add_ticket(
        &self,
        enrollment_id: i32,
        ticket_type: &TicketType,
        status: TicketStatus,
    ) -> TicketWithType {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let ticket = TicketWithType {
            ticket: Ticket {
                id,
                ticket_type_id: ticket_type.id,
                enrollment_id,
                status,
            },
            ticket_type: ticket_type.clone(),
        };
        tables.tickets.push(ticket.clone());
        ticket
    }

    /// Inserts a booking directly, skipping every eligibility rule.
    pub async fn add_booking(&self, user_id: i32, room_id: i32) -> Booking {
        let mut tables = self.tables.write().await;
        insert_booking(&mut tables, user_id, room_id)
    }

    pub async fn add_session(&self, user_id: i32, token: &str) -> Session {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let session = Session {
            id,
            user_id,
            token: token.to_string(),
        };
        tables.sessions.push(session.clone());
        session
    }

    pub async fn booking_count(&self) -> usize {
        self.tables.read().await.bookings.len()
    }
}

fn insert_booking(tables: &mut Tables, user_id: i32, room_id: i32) -> Booking {
    let id = tables.next_id();
    let now = Utc::now();
    let booking = Booking {
        id,
        user_id,
        room_id,
        created_at: now,
        updated_at: now,
    };
    tables.bookings.push(booking.clone());
    booking
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_booking_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, StoreError> {
        let tables = self.tables.read().await;
        let found = tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .find_map(|b| {
                tables
                    .rooms
                    .iter()
                    .find(|r| r.id == b.room_id)
                    .map(|room| BookingWithRoom {
                        booking: b.clone(),
                        room: room.clone(),
                    })
            });
        Ok(found)
    }

    async fn find_booking_by_room_id(&self, room_id: i32) -> Result<Option<Booking>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.iter().find(|b| b.room_id == room_id).cloned())
    }

    async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(Some(insert_booking(&mut tables, user_id, room_id)))
    }

    async fn update_booking_room(
        &self,
        booking_id: i32,
        user_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, StoreError> {
        let mut tables = self.tables.write().await;
        let updated = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.user_id == user_id)
            .map(|b| {
                b.room_id = room_id;
                b.updated_at = Utc::now();
                b.clone()
            });
        Ok(updated)
    }

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<Room>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.rooms.iter().find(|r| r.id == room_id).cloned())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_ticket_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .iter()
            .find(|t| t.ticket.enrollment_id == enrollment_id)
            .cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.iter().find(|s| s.token == token).cloned())
    }
}
