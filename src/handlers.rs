use crate::errors::AppError;
use crate::models::{
    DailyRecord, HistoryQuery, HistoryResponse, HomeResponse, InsightsResponse, MealEntry,
    MedToggleRequest, MedicationRequest, MedicationsResponse, RecordPatch, RecordsMap,
    SaveResponse, SelectRequest, StateResponse,
};
use crate::state::AppState;
use crate::stats::{build_history, build_home, build_insights};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Datelike, Local};
use serde_json::{json, Value};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    let home = build_home(
        Local::now().date_naive(),
        tracker.records(),
        tracker.draft(),
        tracker.medications(),
    );
    Html(render_index(&home))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.snapshot())
}

pub async fn select_date(
    State(state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<StateResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.select_date(&payload.date)?;
    Ok(Json(tracker.snapshot()))
}

pub async fn update_draft(
    State(state): State<AppState>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<StateResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.update(patch)?;
    Ok(Json(tracker.snapshot()))
}

pub async fn add_meal(
    State(state): State<AppState>,
    Json(meal): Json<MealEntry>,
) -> Result<Json<DailyRecord>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let draft = tracker.add_meal(meal)?;
    Ok(Json(draft.clone()))
}

pub async fn remove_meal(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<MealEntry>, AppError> {
    let mut tracker = state.tracker.lock().await;
    Ok(Json(tracker.remove_meal(index)?))
}

pub async fn set_med_taken(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MedToggleRequest>,
) -> Result<Json<Value>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let taken = tracker.set_med_taken(&id, payload.taken)?;
    Ok(Json(json!({ "id": id, "taken": taken })))
}

pub async fn save(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    Ok(Json(state.save_draft().await?))
}

pub async fn get_records(State(state): State<AppState>) -> Json<RecordsMap> {
    let tracker = state.tracker.lock().await;
    Json(tracker.records().clone())
}

pub async fn list_medications(State(state): State<AppState>) -> Json<MedicationsResponse> {
    let tracker = state.tracker.lock().await;
    Json(MedicationsResponse {
        medications: tracker.medications().to_vec(),
        persisted: true,
    })
}

pub async fn add_medication(
    State(state): State<AppState>,
    Json(payload): Json<MedicationRequest>,
) -> Result<Json<MedicationsResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.add_medication(&payload.name, payload.dosage.as_deref())?;
    let persisted = state
        .gateway
        .save_medications(tracker.medications())
        .await
        .is_ok();
    Ok(Json(MedicationsResponse {
        medications: tracker.medications().to_vec(),
        persisted,
    }))
}

pub async fn edit_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MedicationRequest>,
) -> Result<Json<MedicationsResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.edit_medication(&id, &payload.name, payload.dosage.as_deref())?;
    let persisted = state
        .gateway
        .save_medications(tracker.medications())
        .await
        .is_ok();
    Ok(Json(MedicationsResponse {
        medications: tracker.medications().to_vec(),
        persisted,
    }))
}

pub async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MedicationsResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.delete_medication(&id)?;
    let persisted = state
        .gateway
        .save_medications(tracker.medications())
        .await
        .is_ok();
    Ok(Json(MedicationsResponse {
        medications: tracker.medications().to_vec(),
        persisted,
    }))
}

pub async fn get_home(State(state): State<AppState>) -> Json<HomeResponse> {
    let tracker = state.tracker.lock().await;
    Json(build_home(
        Local::now().date_naive(),
        tracker.records(),
        tracker.draft(),
        tracker.medications(),
    ))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let tracker = state.tracker.lock().await;
    Ok(Json(build_history(today, tracker.records(), year, month)?))
}

pub async fn get_insights(State(state): State<AppState>) -> Json<InsightsResponse> {
    let tracker = state.tracker.lock().await;
    Json(build_insights(tracker.records()))
}
