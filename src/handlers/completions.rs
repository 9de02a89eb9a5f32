use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub habit_id: Uuid,
    /// Defaults to today under the configured day convention.
    pub date: Option<NaiveDate>,
}

/// Toggle one completion day. Applies in memory first, then persists;
/// the retained prior value is swapped back if the write fails.
pub async fn toggle_completion(
    State(state): State<AppState>,
    Json(body): Json<ToggleRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let date = body
        .date
        .unwrap_or_else(|| state.config.day_convention.today());

    let mut store = state.store.write().await;
    let prior = store
        .toggle_completion(body.habit_id, date)
        .ok_or_else(|| AppError::NotFound("Habit not found".into()))?;

    if let Err(e) = state.snapshot.save(store.habits()).await {
        store.restore_habit(prior);
        return Err(e.into());
    }

    let completed = store
        .habit(body.habit_id)
        .is_some_and(|h| h.is_completed_on(date));

    tracing::info!(habit_id = %body.habit_id, date = %date, completed, "Completion toggled");
    super::broadcast(
        &state,
        serde_json::json!({
            "type": "completion_changed",
            "habit_id": body.habit_id,
            "date": date,
            "completed": completed,
        }),
    );

    Ok(Json(serde_json::json!({
        "habit_id": body.habit_id,
        "date": date,
        "completed": completed,
    })))
}
