use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    error,
    expenses::dto::{ExpenseResponse, Pagination},
    expenses::repo as expenses_repo,
    state::AppState,
};

use super::repo::{self, UserOverview};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route(
            "/admin/users/:id",
            axum::routing::delete(delete_user),
        )
        .route("/admin/users/:id/expenses", get(list_user_expenses))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<UserOverview>>, (StatusCode, String)> {
    let users = repo::list_users(&state.db).await.map_err(error::http)?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn list_user_expenses(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ExpenseResponse>>, (StatusCode, String)> {
    let limit = p
        .limit
        .unwrap_or(state.config.expenses_per_page)
        .clamp(1, 100);
    let offset = p.offset.max(0);

    let expenses = expenses_repo::list_by_user(&state.db, id, limit, offset)
        .await
        .map_err(error::http)?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if id == admin_id {
        warn!(user_id = %admin_id, "admin tried to delete own account");
        return Err((
            StatusCode::BAD_REQUEST,
            "Cannot delete your own account".into(),
        ));
    }

    repo::delete_user(&state.db, id).await.map_err(error::http)?;

    info!(deleted_user = %id, admin = %admin_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
