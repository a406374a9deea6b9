use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::audit::{ConflictRecord, ScheduleConflict};
use crate::error::ScheduleError;
use crate::model::{Pilot, StaffMember, TrainRecord, TrainSet, Trip, TripUpdate};
use crate::ranker::{AssignmentResult, TripRequest};
use crate::service::{PublishReceipt, ScheduleService};

type SharedService = Arc<ScheduleService>;

pub fn create_router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_schedule))
        .route("/schedule/trip", post(add_trip))
        .route("/schedule/trip/{id}", put(update_trip))
        .route("/schedule/reset", post(reset_schedule))
        .route("/schedule/publish", post(publish_schedule))
        .route("/schedule/conflicts", get(get_conflicts))
        .route("/conflicts", get(get_conflict_log))
        .route("/conflicts/run-check", post(run_conflict_check))
        .route("/conflicts/{id}/resolve", post(resolve_conflict))
        .route("/conflicts/{id}/override", post(override_conflict))
        .route("/schedule/resources/pilots", get(get_pilots))
        .route("/schedule/resources/trains", get(get_trains))
        .route("/assign-trains", post(assign_trains))
        .route("/fleet", get(get_fleet))
        .route("/staff/list", get(get_staff))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct Detail {
    detail: String,
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
    trips: usize,
}

#[derive(Debug, Deserialize)]
struct AssignmentRequest {
    trips: Vec<TripRequest>,
}

#[derive(Debug, Deserialize)]
struct OverrideRequest {
    comment: String,
}

enum ApiError {
    Schedule(ScheduleError),
    Internal(String),
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        ApiError::Schedule(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Schedule(err) => {
                let status = match &err {
                    ScheduleError::Conflict(_) | ScheduleError::DuplicateTrip(_) => {
                        StatusCode::CONFLICT
                    }
                    ScheduleError::NotFound(_) | ScheduleError::ConflictNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    ScheduleError::InvalidTime(_) => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.to_string())
            }
            ApiError::Internal(detail) => {
                error!(%detail, "Request handler failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(Detail { detail })).into_response()
    }
}

/// Run a service call off the async workers; catalogs may block on I/O.
async fn run<T, F>(service: SharedService, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&ScheduleService) -> Result<T, ScheduleError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || call(&service)).await?;
    Ok(result?)
}

async fn health() -> &'static str {
    "OK"
}

async fn get_schedule(State(service): State<SharedService>) -> Result<Json<Vec<Trip>>, ApiError> {
    let trips = run(service, |service| Ok(service.schedule())).await?;
    Ok(Json(trips))
}

async fn add_trip(
    State(service): State<SharedService>,
    Json(trip): Json<Trip>,
) -> Result<Json<Trip>, ApiError> {
    let trip = run(service, move |service| service.add_trip(trip)).await?;
    Ok(Json(trip))
}

async fn update_trip(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    Json(update): Json<TripUpdate>,
) -> Result<Json<Trip>, ApiError> {
    let trip = run(service, move |service| service.update_trip(&id, update)).await?;
    Ok(Json(trip))
}

async fn reset_schedule(State(service): State<SharedService>) -> Result<Json<Message>, ApiError> {
    let trips = run(service, |service| Ok(service.reset())).await?;
    Ok(Json(Message {
        message: "Schedule reset to default.".to_string(),
        trips,
    }))
}

async fn publish_schedule(
    State(service): State<SharedService>,
) -> Result<Json<PublishReceipt>, ApiError> {
    let receipt = run(service, |service| Ok(service.publish())).await?;
    Ok(Json(receipt))
}

async fn get_conflicts(
    State(service): State<SharedService>,
) -> Result<Json<Vec<ScheduleConflict>>, ApiError> {
    let conflicts = run(service, |service| Ok(service.conflicts())).await?;
    Ok(Json(conflicts))
}

async fn get_conflict_log(
    State(service): State<SharedService>,
) -> Result<Json<Vec<ConflictRecord>>, ApiError> {
    let records = run(service, |service| Ok(service.logged_conflicts())).await?;
    Ok(Json(records))
}

async fn run_conflict_check(
    State(service): State<SharedService>,
) -> Result<Json<Vec<ConflictRecord>>, ApiError> {
    let records = run(service, |service| Ok(service.run_conflict_check())).await?;
    Ok(Json(records))
}

async fn resolve_conflict(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<ConflictRecord>, ApiError> {
    let record = run(service, move |service| service.resolve_conflict(&id)).await?;
    Ok(Json(record))
}

async fn override_conflict(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    Json(request): Json<OverrideRequest>,
) -> Result<Json<ConflictRecord>, ApiError> {
    let record =
        run(service, move |service| service.override_conflict(&id, &request.comment)).await?;
    Ok(Json(record))
}

async fn get_pilots(State(service): State<SharedService>) -> Result<Json<Vec<Pilot>>, ApiError> {
    let pilots = run(service, |service| Ok(service.pilots())).await?;
    Ok(Json(pilots))
}

async fn get_trains(State(service): State<SharedService>) -> Result<Json<Vec<TrainSet>>, ApiError> {
    let trains = run(service, |service| Ok(service.trains())).await?;
    Ok(Json(trains))
}

async fn assign_trains(
    State(service): State<SharedService>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<Vec<AssignmentResult>>, ApiError> {
    let assignments = run(service, move |service| Ok(service.assign_trains(&request.trips))).await?;
    Ok(Json(assignments))
}

async fn get_fleet(
    State(service): State<SharedService>,
) -> Result<Json<Vec<TrainRecord>>, ApiError> {
    let fleet = run(service, |service| Ok(service.fleet())).await?;
    Ok(Json(fleet))
}

async fn get_staff(
    State(service): State<SharedService>,
) -> Result<Json<Vec<StaffMember>>, ApiError> {
    let staff = run(service, |service| Ok(service.staff())).await?;
    Ok(Json(staff))
}
