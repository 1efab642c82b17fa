pub mod users;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use nominatim_client::NominatimError;
use streetwatch_common::{
    nearest_record, radius_alerts, validate_submission, CrimeRecord, StreetWatchError,
    VoteDirection,
};
use streetwatch_graph::VoteUpdate;

use crate::AppState;

/// Alert radius requests are capped so a single query cannot sweep a city.
const MAX_ALERT_RADIUS_M: f64 = 5000.0;

// --- Request structs ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCrimeRequest {
    #[serde(rename = "type")]
    crime_type: String,
    location: String,
    details: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    user_email: String,
}

#[derive(Deserialize)]
pub struct PositionQuery {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
pub struct AlertsQuery {
    lat: f64,
    lng: f64,
    radius: Option<f64>,
}

// --- Error mapping ---

/// Map the error taxonomy onto HTTP statuses at the request boundary.
/// Nothing is retried; server-side failures are logged here.
pub fn error_response(err: &StreetWatchError) -> Response {
    let status = match err {
        StreetWatchError::Validation(_) | StreetWatchError::Geocode(_) => StatusCode::BAD_REQUEST,
        StreetWatchError::NotFound(_) => StatusCode::NOT_FOUND,
        StreetWatchError::Auth(_) => StatusCode::UNAUTHORIZED,
        StreetWatchError::Store(_) | StreetWatchError::Anyhow(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(error = %err, "Request failed");
    }
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

fn store_err(e: neo4rs::Error) -> StreetWatchError {
    StreetWatchError::Store(e.to_string())
}

// --- Handlers ---

pub async fn api_submit_crime(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitCrimeRequest>,
) -> Response {
    match submit_crime(&state, body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn submit_crime(
    state: &AppState,
    body: SubmitCrimeRequest,
) -> Result<CrimeRecord, StreetWatchError> {
    validate_submission(&body.crime_type, &body.location, &body.address)
        .map_err(|field| StreetWatchError::Validation(format!("Missing required field: {field}")))?;

    // Coordinates come from the browser when it geocoded the address itself;
    // otherwise resolve them here, before anything is persisted.
    let (latitude, longitude) = match (body.latitude, body.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            let point = state.geocoder.search(&body.address).await.map_err(|e| match e {
                NominatimError::NotFound(_) => StreetWatchError::Geocode(
                    "Address not found. Try a more specific address.".to_string(),
                ),
                other => StreetWatchError::Anyhow(anyhow::Error::new(other)),
            })?;
            (point.lat, point.lng)
        }
    };

    let record = CrimeRecord {
        id: Uuid::new_v4(),
        severity: state.severity.classify(&body.crime_type),
        crime_type: body.crime_type,
        location: body.location,
        address: body.address,
        latitude,
        longitude,
        details: body.details.filter(|d| !d.trim().is_empty()),
        upvotes: 0,
        downvotes: 0,
        upvoted_by: Vec::new(),
        downvoted_by: Vec::new(),
        created_at: Utc::now(),
    };

    state.writer.create_crime(&record).await.map_err(store_err)?;
    Ok(record)
}

pub async fn api_list_crimes(State(state): State<Arc<AppState>>) -> Response {
    match state.reader.list_by_upvotes().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(&store_err(e)),
    }
}

pub async fn api_upvote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Response {
    match vote(&state, &id, &body.user_email, VoteDirection::Up).await {
        Ok(update) => vote_response(update, VoteDirection::Up),
        Err(e) => error_response(&e),
    }
}

pub async fn api_downvote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Response {
    match vote(&state, &id, &body.user_email, VoteDirection::Down).await {
        Ok(update) => vote_response(update, VoteDirection::Down),
        Err(e) => error_response(&e),
    }
}

async fn vote(
    state: &AppState,
    id: &str,
    voter: &str,
    direction: VoteDirection,
) -> Result<VoteUpdate, StreetWatchError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|_| StreetWatchError::Validation(format!("Invalid crime id: {id}")))?;

    if voter.trim().is_empty() {
        return Err(StreetWatchError::Validation(
            "userEmail is required".to_string(),
        ));
    }

    state
        .writer
        .apply_vote(uuid, voter, direction)
        .await
        .map_err(store_err)?
        .ok_or_else(|| StreetWatchError::NotFound(format!("crime {uuid}")))
}

fn vote_response(update: VoteUpdate, direction: VoteDirection) -> Response {
    if update.applied {
        Json(update.record).into_response()
    } else {
        // Same-direction repeat is an informational no-op, not an error.
        let verb = match direction {
            VoteDirection::Up => "upvoted",
            VoteDirection::Down => "downvoted",
        };
        Json(serde_json::json!({
            "message": format!("You have already {verb} this crime"),
            "crime": update.record,
        }))
        .into_response()
    }
}

pub async fn api_nearest_crime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PositionQuery>,
) -> Response {
    match state.reader.list_by_upvotes().await {
        Ok(records) => match nearest_record(params.lat, params.lng, &records) {
            Some(nearest) => Json(nearest).into_response(),
            None => Json(serde_json::json!({"message": "No crime reports yet"})).into_response(),
        },
        Err(e) => error_response(&store_err(e)),
    }
}

pub async fn api_proximity_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlertsQuery>,
) -> Response {
    let radius = params
        .radius
        .unwrap_or(state.alert_radius_m)
        .min(MAX_ALERT_RADIUS_M);

    match state.reader.list_by_upvotes().await {
        Ok(records) => {
            let alerts = radius_alerts(params.lat, params.lng, &records, radius);
            Json(serde_json::json!({ "alerts": alerts })).into_response()
        }
        Err(e) => error_response(&store_err(e)),
    }
}
