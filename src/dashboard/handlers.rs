use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{auth::extractors::AuthUser, error, state::AppState};

use super::dto::{CategoryFilter, ChartData, DashboardSummary, StatsResponse, MONTH_LABELS};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stats", get(get_stats))
        .route("/dashboard/categories", get(get_category_breakdown))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardSummary>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();

    let total_expenses = repo::total_all(&state.db, user_id)
        .await
        .map_err(error::http)?;
    let monthly_expenses =
        repo::total_in_range(&state.db, user_id, repo::first_of_month(today), None)
            .await
            .map_err(error::http)?;
    let categories = repo::totals_by_category(&state.db, user_id)
        .await
        .map_err(error::http)?;
    let trend = repo::monthly_trend(&state.db, user_id, repo::trend_window_start(today))
        .await
        .map_err(error::http)?;
    let yearly_data = repo::yearly_series(&state.db, user_id, today.year())
        .await
        .map_err(error::http)?;
    let recent = repo::recent_expenses(&state.db, user_id, state.config.dashboard_recent_limit)
        .await
        .map_err(error::http)?;

    let chart_data = ChartData {
        categories: categories.iter().map(|c| c.category.clone()).collect(),
        category_totals: categories.iter().map(|c| c.total).collect(),
        months: MONTH_LABELS,
        yearly_data,
        trend_months: trend.iter().map(|m| m.month.clone()).collect(),
        trend_totals: trend.iter().map(|m| m.total).collect(),
    };

    Ok(Json(DashboardSummary {
        total_expenses,
        monthly_expenses,
        categories,
        recent_expenses: recent.into_iter().map(Into::into).collect(),
        chart_data,
    }))
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();

    let total_expenses = repo::total_all(&state.db, user_id)
        .await
        .map_err(error::http)?;
    let monthly_expenses =
        repo::total_in_range(&state.db, user_id, repo::first_of_month(today), None)
            .await
            .map_err(error::http)?;
    let categories = repo::totals_by_category(&state.db, user_id)
        .await
        .map_err(error::http)?;

    Ok(Json(StatsResponse {
        total_expenses,
        monthly_expenses,
        categories,
    }))
}

#[instrument(skip(state))]
pub async fn get_category_breakdown(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<repo::CategoryTotal>>, (StatusCode, String)> {
    if let Some(month) = filter.month {
        if !(1..=12).contains(&month) {
            return Err((StatusCode::BAD_REQUEST, "Month must be 1-12".into()));
        }
    }

    let rows =
        repo::totals_by_category_filtered(&state.db, user_id, filter.year, filter.month)
            .await
            .map_err(error::http)?;
    Ok(Json(rows))
}
