use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo::CategoryTotal;
use crate::expenses::dto::ExpenseResponse;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Everything the dashboard page needs in one response.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_expenses: Decimal,
    pub monthly_expenses: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub recent_expenses: Vec<ExpenseResponse>,
    pub chart_data: ChartData,
}

/// Chart-shaped slices of the same aggregates: parallel label/value
/// arrays, and a yearly series that is always exactly 12 entries.
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub category_totals: Vec<Decimal>,
    pub months: [&'static str; 12],
    pub yearly_data: [Decimal; 12],
    pub trend_months: Vec<String>,
    pub trend_totals: Vec<Decimal>,
}

/// Lightweight stats for polling clients.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_expenses: Decimal,
    pub monthly_expenses: Decimal,
    pub categories: Vec<CategoryTotal>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub year: Option<i32>,
    pub month: Option<i32>,
}
