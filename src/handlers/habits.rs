use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::habit::{CreateHabitRequest, Habit, HabitWithToday};
use crate::AppState;

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitWithToday>> {
    let today = state.config.day_convention.today();
    let store = state.store.read().await;

    let result = store
        .habits()
        .iter()
        .map(|habit| HabitWithToday {
            completed_today: habit.is_completed_on(today),
            habit: habit.clone(),
        })
        .collect();

    Json(result)
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut store = state.store.write().await;
    let habit = store
        .add_habit(&body.name, body.color.clone())
        .ok_or_else(|| AppError::Validation("Habit name is required".into()))?;

    if let Err(e) = state.snapshot.save(store.habits()).await {
        store.remove_habit(habit.id);
        return Err(e.into());
    }

    tracing::info!(habit_id = %habit.id, name = %habit.name, "Habit created");
    super::broadcast(
        &state,
        serde_json::json!({
            "type": "habit_changed",
            "action": "created",
            "habit_id": habit.id,
        }),
    );

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let mut store = state.store.write().await;
    let prior_selection = store.selection().clone();
    let removed = store
        .remove_habit(habit_id)
        .ok_or_else(|| AppError::NotFound("Habit not found".into()))?;

    if let Err(e) = state.snapshot.save(store.habits()).await {
        store.reinsert_habit(removed);
        store.restore_selection(prior_selection);
        return Err(e.into());
    }

    tracing::info!(habit_id = %habit_id, "Habit deleted");
    super::broadcast(
        &state,
        serde_json::json!({
            "type": "habit_changed",
            "action": "deleted",
            "habit_id": habit_id,
        }),
    );

    Ok(Json(serde_json::json!({ "deleted": true })))
}
