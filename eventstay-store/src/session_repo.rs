use async_trait::async_trait;
use eventstay_core::repository::SessionRepository;
use eventstay_core::StoreError;
use eventstay_shared::Session;
use sqlx::PgPool;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i32,
    user_id: i32,
    token: String,
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, token FROM sessions WHERE token = $1 LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Session {
            id: row.id,
            user_id: row.user_id,
            token: row.token,
        }))
    }
}
