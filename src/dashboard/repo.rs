//! Aggregation over a single user's expenses.
//!
//! Every aggregate is one SQL statement with grouping and summing pushed
//! to Postgres; no function here folds over expense rows in memory. All
//! queries are read-only and an empty result set is a valid answer —
//! totals come back as zero, breakdowns as empty lists.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, Duration, Month};
use uuid::Uuid;

use crate::error::StoreError;
use crate::expenses::repo::{self as expenses_repo, Expense};

/// One category's summed spending.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Summed spending for one `YYYY-MM` bucket.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthTotal {
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, FromRow)]
struct MonthBucket {
    month: i32,
    total: Decimal,
}

/// Lifetime total. Zero when the user has no expenses.
pub async fn total_all(db: &PgPool, user_id: Uuid) -> Result<Decimal, StoreError> {
    let total: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM expenses
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(total)
}

/// Total over `[start, end)`; an absent `end` leaves the window open.
pub async fn total_in_range(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Option<Date>,
) -> Result<Decimal, StoreError> {
    let total: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM expenses
        WHERE user_id = $1
          AND date >= $2
          AND ($3::date IS NULL OR date < $3)
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await?;
    Ok(total)
}

/// Per-category totals over all of the user's expenses. Sorted by total
/// descending for presentation; callers must not rely on the order.
/// Category labels are compared as-is, so "Food" and "food" are distinct.
pub async fn totals_by_category(
    db: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CategoryTotal>, StoreError> {
    let rows = sqlx::query_as::<_, CategoryTotal>(
        r#"
        SELECT category, SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1
        GROUP BY category
        ORDER BY total DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Per-category totals restricted to a calendar year and/or 1-based month.
/// Matching is by date component, not by string comparison.
pub async fn totals_by_category_filtered(
    db: &PgPool,
    user_id: Uuid,
    year: Option<i32>,
    month: Option<i32>,
) -> Result<Vec<CategoryTotal>, StoreError> {
    let rows = sqlx::query_as::<_, CategoryTotal>(
        r#"
        SELECT category, SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1
          AND ($2::int IS NULL OR EXTRACT(YEAR FROM date)::int = $2)
          AND ($3::int IS NULL OR EXTRACT(MONTH FROM date)::int = $3)
        GROUP BY category
        ORDER BY total DESC
        "#,
    )
    .bind(user_id)
    .bind(year)
    .bind(month)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Monthly totals since `since`, bucketed by `YYYY-MM` label, ascending.
/// Bucket labels are unique by construction of the GROUP BY.
pub async fn monthly_trend(
    db: &PgPool,
    user_id: Uuid,
    since: Date,
) -> Result<Vec<MonthTotal>, StoreError> {
    let rows = sqlx::query_as::<_, MonthTotal>(
        r#"
        SELECT to_char(date, 'YYYY-MM') AS month, SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1 AND date >= $2
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// One total per calendar month of `year`, always exactly 12 entries
/// (index 0 = January). Months without expenses are zero, not absent,
/// so chart rendering never special-cases missing data.
pub async fn yearly_series(
    db: &PgPool,
    user_id: Uuid,
    year: i32,
) -> Result<[Decimal; 12], StoreError> {
    let Some((start, end)) = year_bounds(year) else {
        // Year outside the calendar's range has no expenses by definition.
        return Ok([Decimal::ZERO; 12]);
    };

    let buckets = sqlx::query_as::<_, MonthBucket>(
        r#"
        SELECT EXTRACT(MONTH FROM date)::int AS month, SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1 AND date >= $2 AND date < $3
        GROUP BY 1
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;

    Ok(fill_yearly_series(
        buckets.into_iter().map(|b| (b.month, b.total)),
    ))
}

/// The `limit` most recent expenses: date descending, ties broken by
/// creation order (newest first), then id, so the result is deterministic.
pub async fn recent_expenses(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Expense>, StoreError> {
    expenses_repo::list_by_user(db, user_id, limit, 0).await
}

// --- pure helpers ---

pub fn first_of_month(today: Date) -> Date {
    Date::from_calendar_date(today.year(), today.month(), 1).unwrap_or(today)
}

pub fn year_bounds(year: i32) -> Option<(Date, Date)> {
    let start = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let end = Date::from_calendar_date(year + 1, Month::January, 1).ok()?;
    Some((start, end))
}

/// Dashboard trend window: the last 180 days.
pub fn trend_window_start(today: Date) -> Date {
    today - Duration::days(180)
}

/// Scatter sparse (1-based month, total) buckets into a dense 12-slot
/// series. Out-of-range months are ignored rather than panicking.
pub fn fill_yearly_series(buckets: impl IntoIterator<Item = (i32, Decimal)>) -> [Decimal; 12] {
    let mut series = [Decimal::ZERO; 12];
    for (month, total) in buckets {
        if (1..=12).contains(&month) {
            series[(month - 1) as usize] = total;
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn fill_yearly_series_zero_fills_absent_months() {
        // The worked example: $80 of Food in January, $100 Transport in
        // February, nothing else all year.
        let series = fill_yearly_series(vec![
            (1, Decimal::from(80)),
            (2, Decimal::from(100)),
        ]);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0], Decimal::from(80));
        assert_eq!(series[1], Decimal::from(100));
        assert!(series[2..].iter().all(|t| *t == Decimal::ZERO));
    }

    #[test]
    fn fill_yearly_series_empty_input_is_twelve_zeros() {
        let series = fill_yearly_series(vec![]);
        assert_eq!(series, [Decimal::ZERO; 12]);
    }

    #[test]
    fn fill_yearly_series_ignores_out_of_range_months() {
        let series = fill_yearly_series(vec![(0, Decimal::from(5)), (13, Decimal::from(7))]);
        assert_eq!(series, [Decimal::ZERO; 12]);
    }

    #[test]
    fn fill_yearly_series_december_lands_at_index_eleven() {
        let series = fill_yearly_series(vec![(12, Decimal::from(42))]);
        assert_eq!(series[11], Decimal::from(42));
        assert!(series[..11].iter().all(|t| *t == Decimal::ZERO));
    }

    #[test]
    fn first_of_month_clamps_day() {
        assert_eq!(first_of_month(date!(2024 - 02 - 29)), date!(2024 - 02 - 01));
        assert_eq!(first_of_month(date!(2024 - 12 - 01)), date!(2024 - 12 - 01));
    }

    #[test]
    fn year_bounds_are_half_open() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(start, date!(2024 - 01 - 01));
        assert_eq!(end, date!(2025 - 01 - 01));
        // 2024-12-31 is inside, 2025-01-01 is not.
        assert!(date!(2024 - 12 - 31) >= start && date!(2024 - 12 - 31) < end);
        assert!(!(date!(2025 - 01 - 01) < end));
    }

    #[test]
    fn trend_window_is_180_days() {
        let start = trend_window_start(date!(2024 - 07 - 01));
        assert_eq!(date!(2024 - 07 - 01) - start, Duration::days(180));
    }
}
