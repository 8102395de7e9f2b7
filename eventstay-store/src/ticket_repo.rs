use async_trait::async_trait;
use eventstay_core::repository::TicketRepository;
use eventstay_core::StoreError;
use eventstay_shared::{Ticket, TicketStatus, TicketType, TicketWithType};
use sqlx::PgPool;

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i32,
    ticket_type_id: i32,
    enrollment_id: i32,
    status: String,
    type_name: String,
    price: i32,
    is_remote: bool,
    includes_hotel: bool,
}

impl TryFrom<TicketRow> for TicketWithType {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = row.status.parse()?;
        Ok(TicketWithType {
            ticket: Ticket {
                id: row.id,
                ticket_type_id: row.ticket_type_id,
                enrollment_id: row.enrollment_id,
                status,
            },
            ticket_type: TicketType {
                id: row.ticket_type_id,
                name: row.type_name,
                price: row.price,
                is_remote: row.is_remote,
                includes_hotel: row.includes_hotel,
            },
        })
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_ticket_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, StoreError> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT t.id, t.ticket_type_id, t.enrollment_id, t.status,
                   tt.name AS type_name, tt.price, tt.is_remote, tt.includes_hotel
            FROM tickets t
            JOIN ticket_types tt ON tt.id = t.ticket_type_id
            WHERE t.enrollment_id = $1
            "#,
        )
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TicketWithType::try_from).transpose()
    }
}
