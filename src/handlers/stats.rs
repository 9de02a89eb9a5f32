use axum::{extract::State, Json};
use serde_json::json;

use crate::stats::{HabitChartData, PieChartData};
use crate::AppState;

/// Per-habit chart records for every habit under the current view state.
pub async fn get_chart(State(state): State<AppState>) -> Json<Vec<HabitChartData>> {
    let store = state.store.read().await;
    Json(store.chart_data(state.config.week_start))
}

/// Aggregate pie summary for the current selection and view state.
pub async fn get_pie(State(state): State<AppState>) -> Json<PieChartData> {
    let store = state.store.read().await;
    Json(store.pie_data(state.config.week_start))
}

/// Fraction of all habits completed today.
pub async fn get_today(State(state): State<AppState>) -> Json<serde_json::Value> {
    let today = state.config.day_convention.today();
    let store = state.store.read().await;
    Json(json!({
        "date": today,
        "completion_rate": store.today_completion_rate(today),
    }))
}
