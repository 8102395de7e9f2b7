use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventstay_core::repository::EnrollmentRepository;
use eventstay_core::StoreError;
use eventstay_shared::{Address, Enrollment, Masked};
use sqlx::PgPool;

pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Address columns are nullable because of the LEFT JOIN.
#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i32,
    name: String,
    cpf: String,
    birthday: DateTime<Utc>,
    phone: String,
    user_id: i32,
    address_id: Option<i32>,
    cep: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    number: Option<String>,
    neighborhood: Option<String>,
    address_detail: Option<String>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        let address = row.address_id.map(|address_id| Address {
            id: address_id,
            cep: row.cep.unwrap_or_default(),
            street: row.street.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            number: row.number.unwrap_or_default(),
            neighborhood: row.neighborhood.unwrap_or_default(),
            address_detail: row.address_detail,
            enrollment_id: row.id,
        });

        Enrollment {
            id: row.id,
            name: row.name,
            cpf: Masked(row.cpf),
            birthday: row.birthday,
            phone: Masked(row.phone),
            user_id: row.user_id,
            address,
        }
    }
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, StoreError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT e.id, e.name, e.cpf, e.birthday, e.phone, e.user_id,
                   a.id AS address_id, a.cep, a.street, a.city, a.state, a.number,
                   a.neighborhood, a.address_detail
            FROM enrollments e
            LEFT JOIN addresses a ON a.enrollment_id = e.id
            WHERE e.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Enrollment::from))
    }
}
