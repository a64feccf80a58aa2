use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, error, state::AppState};

use super::dto::{CreateExpenseRequest, ExpenseResponse, Pagination, UpdateExpenseRequest};
use super::repo::{self, ExpenseChanges, NewExpense};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses/:id", get(get_expense))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route(
            "/expenses/:id",
            axum::routing::put(update_expense).delete(delete_expense),
        )
}

// Negative and zero amounts are rejected; the tracker records spending,
// refunds are out of scope.
fn validate_amount(amount: Decimal) -> Result<(), (StatusCode, String)> {
    if amount <= Decimal::ZERO {
        return Err((
            StatusCode::BAD_REQUEST,
            "Amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<String, (StatusCode, String)> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Category is required".into()));
    }
    if trimmed.chars().count() > 50 {
        return Err((StatusCode::BAD_REQUEST, "Category too long".into()));
    }
    Ok(trimmed.to_string())
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ExpenseResponse>>, (StatusCode, String)> {
    let limit = p
        .limit
        .unwrap_or(state.config.expenses_per_page)
        .clamp(1, 100);
    let offset = p.offset.max(0);

    let expenses = repo::list_by_user(&state.db, user_id, limit, offset)
        .await
        .map_err(error::http)?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseResponse>, (StatusCode, String)> {
    let expense = repo::get_owned(&state.db, user_id, id)
        .await
        .map_err(error::http)?;
    Ok(Json(expense.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ExpenseResponse>), (StatusCode, String)> {
    validate_amount(payload.amount)?;
    let category = validate_category(&payload.category)?;

    let expense = repo::create(
        &state.db,
        user_id,
        NewExpense {
            amount: payload.amount,
            category,
            date: payload.date,
            description: payload.description,
        },
    )
    .await
    .map_err(error::http)?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/expenses/{}", expense.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(expense.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, (StatusCode, String)> {
    if let Some(amount) = payload.amount {
        validate_amount(amount)?;
    }
    let category = match payload.category.as_deref() {
        Some(c) => Some(validate_category(c)?),
        None => None,
    };

    let expense = repo::update(
        &state.db,
        user_id,
        id,
        ExpenseChanges {
            amount: payload.amount,
            category,
            date: payload.date,
            description: payload.description,
        },
    )
    .await
    .map_err(error::http)?;

    info!(user_id = %user_id, expense_id = %id, "expense updated");
    Ok(Json(expense.into()))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    repo::delete(&state.db, user_id, id)
        .await
        .map_err(error::http)?;

    info!(user_id = %user_id, expense_id = %id, "expense deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_strictly_positive() {
        assert!(validate_amount(Decimal::from(1)).is_ok());
        assert!(validate_amount(Decimal::new(1, 2)).is_ok()); // 0.01
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::from(-5)).is_err());
    }

    #[test]
    fn category_is_trimmed_and_bounded() {
        assert_eq!(validate_category("  Food ").unwrap(), "Food");
        assert!(validate_category("   ").is_err());
        assert!(validate_category(&"c".repeat(51)).is_err());
    }

    #[test]
    fn category_case_is_preserved() {
        // "Food" and "food" stay distinct labels; grouping is case-sensitive.
        assert_eq!(validate_category("Food").unwrap(), "Food");
        assert_eq!(validate_category("food").unwrap(), "food");
    }
}
