use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::StoreError;

/// Expense record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Default)]
pub struct ExpenseChanges {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Expense>, StoreError> {
    let rows = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, amount, category, date, description, created_at, updated_at
        FROM expenses
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    new: NewExpense,
) -> Result<Expense, StoreError> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (user_id, amount, category, date, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, amount, category, date, description, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(new.amount)
    .bind(&new.category)
    .bind(new.date)
    .bind(&new.description)
    .fetch_one(db)
    .await?;
    Ok(expense)
}

/// Fetch an expense the caller must own. A row owned by someone else is
/// rejected, not silently filtered out.
pub async fn get_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Expense, StoreError> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, amount, category, date, description, created_at, updated_at
        FROM expenses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::NotFound)?;

    if expense.user_id != user_id {
        return Err(StoreError::NotOwner);
    }
    Ok(expense)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: ExpenseChanges,
) -> Result<Expense, StoreError> {
    // Ownership first, so a cross-user update is a 403 and not a no-op.
    get_owned(db, user_id, id).await?;

    let expense = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET amount      = COALESCE($3, amount),
            category    = COALESCE($4, category),
            date        = COALESCE($5, date),
            description = COALESCE($6, description),
            updated_at  = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, amount, category, date, description, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(changes.amount)
    .bind(changes.category)
    .bind(changes.date)
    .bind(changes.description)
    .fetch_one(db)
    .await?;
    Ok(expense)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
    get_owned(db, user_id, id).await?;

    sqlx::query(r#"DELETE FROM expenses WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
