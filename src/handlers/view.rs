use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::TimePeriod;
use crate::error::{AppError, AppResult};
use crate::models::selection::HabitSelection;
use crate::store::NavigateDirection;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub period: TimePeriod,
    pub reference: NaiveDate,
    pub selection: HabitSelection,
}

#[derive(Debug, Deserialize)]
pub struct SetPeriodRequest {
    pub period: TimePeriod,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: NavigateDirection,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub habit_id: Uuid,
}

fn view_response(store: &crate::store::HabitStore) -> ViewResponse {
    ViewResponse {
        period: store.period(),
        reference: store.reference(),
        selection: store.selection().clone(),
    }
}

fn broadcast_view_changed(state: &AppState) {
    super::broadcast(state, serde_json::json!({ "type": "view_changed" }));
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let store = state.store.read().await;
    Json(view_response(&store))
}

pub async fn set_period(
    State(state): State<AppState>,
    Json(body): Json<SetPeriodRequest>,
) -> Json<ViewResponse> {
    let mut store = state.store.write().await;
    store.set_period(body.period);
    broadcast_view_changed(&state);
    Json(view_response(&store))
}

/// Moves the reference date by ±1 unit of the current period, or resets
/// it to today.
pub async fn navigate(
    State(state): State<AppState>,
    Json(body): Json<NavigateRequest>,
) -> Json<ViewResponse> {
    let today = state.config.day_convention.today();
    let mut store = state.store.write().await;
    store.navigate(body.direction, today);
    broadcast_view_changed(&state);
    Json(view_response(&store))
}

pub async fn toggle_selection(
    State(state): State<AppState>,
    Json(body): Json<SelectionRequest>,
) -> AppResult<Json<ViewResponse>> {
    let mut store = state.store.write().await;
    if !store.toggle_selection(body.habit_id) {
        return Err(AppError::NotFound("Habit not found".into()));
    }
    broadcast_view_changed(&state);
    Ok(Json(view_response(&store)))
}

pub async fn select_all(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut store = state.store.write().await;
    store.select_all();
    broadcast_view_changed(&state);
    Json(view_response(&store))
}

pub async fn select_only(
    State(state): State<AppState>,
    Json(body): Json<SelectionRequest>,
) -> AppResult<Json<ViewResponse>> {
    let mut store = state.store.write().await;
    if !store.select_only(body.habit_id) {
        return Err(AppError::NotFound("Habit not found".into()));
    }
    broadcast_view_changed(&state);
    Ok(Json(view_response(&store)))
}
