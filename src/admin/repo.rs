use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// One row per account with its lifetime spending, for the admin list.
/// The count and total come from a grouped join, not per-user queries.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserOverview {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub expense_count: i64,
    pub total_spent: Decimal,
}

pub async fn list_users(db: &PgPool) -> Result<Vec<UserOverview>, StoreError> {
    let rows = sqlx::query_as::<_, UserOverview>(
        r#"
        SELECT u.id, u.username, u.email, u.role, u.created_at,
               COUNT(e.id) AS expense_count,
               COALESCE(SUM(e.amount), 0) AS total_spent
        FROM users u
        LEFT JOIN expenses e ON e.user_id = u.id
        GROUP BY u.id
        ORDER BY u.created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Delete an account. Its expenses go with it via the FK cascade.
pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
