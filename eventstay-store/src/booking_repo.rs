use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventstay_core::repository::BookingRepository;
use eventstay_core::StoreError;
use eventstay_shared::{Booking, BookingWithRoom, Room};
use sqlx::PgPool;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: i32,
    name: String,
    capacity: i32,
    hotel_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
            hotel_id: row.hotel_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingWithRoomRow {
    #[sqlx(flatten)]
    booking: BookingRow,
    room_name: String,
    room_capacity: i32,
    room_hotel_id: i32,
    room_created_at: DateTime<Utc>,
    room_updated_at: DateTime<Utc>,
}

const BOOKING_COLUMNS: &str = "id, user_id, room_id, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_booking_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<BookingWithRoom>, StoreError> {
        let row = sqlx::query_as::<_, BookingWithRoomRow>(
            r#"
            SELECT b.id, b.user_id, b.room_id, b.created_at, b.updated_at,
                   r.name AS room_name, r.capacity AS room_capacity, r.hotel_id AS room_hotel_id,
                   r.created_at AS room_created_at, r.updated_at AS room_updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE b.user_id = $1
            ORDER BY b.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let room = Room {
                id: row.booking.room_id,
                name: row.room_name,
                capacity: row.room_capacity,
                hotel_id: row.room_hotel_id,
                created_at: row.room_created_at,
                updated_at: row.room_updated_at,
            };
            BookingWithRoom {
                booking: row.booking.into(),
                room,
            }
        }))
    }

    async fn find_booking_by_room_id(&self, room_id: i32) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE room_id = $1 ORDER BY id LIMIT 1",
            BOOKING_COLUMNS
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings (user_id, room_id) VALUES ($1, $2) RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn update_booking_room(
        &self,
        booking_id: i32,
        user_id: i32,
        room_id: i32,
    ) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET room_id = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(room_id)
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, capacity, hotel_id, created_at, updated_at FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Room::from))
    }
}
