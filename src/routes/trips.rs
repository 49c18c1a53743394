use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    auth::CurrentUser,
    error::AppError,
    matching::{paginate, CandidateCursor, CandidatePage},
    models::{
        decision::{DecisionOutcome, DecisionRequest},
        trip::{MatchReference, NewTrip, Trip},
    },
    routes::extract::{AppJson, AppQuery},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(trip_detail))
        .route("/:id/candidates", get(trip_candidates))
        .route("/:id/decision", post(decide))
}

/// `?cursor=&limit=` on candidate listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

impl PageParams {
    pub fn cursor(&self) -> Result<Option<CandidateCursor>, AppError> {
        self.cursor
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::parse::<CandidateCursor>)
            .transpose()
    }
}

async fn create_trip(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(new_trip): AppJson<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let user = current.require_user()?;
    let trip = state.trips.create_trip(&user.id, new_trip).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_trips(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Trip>>, AppError> {
    let user = current.require_user()?;
    Ok(Json(state.trips.list_owner_trips(&user.id).await?))
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.trips.find_trip_by_id(&trip_id).await?))
}

/// Swipe deck for one of the caller's own trips. Trips the caller already
/// decided on are left out so the deck only shows fresh cards.
async fn trip_candidates(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<String>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<CandidatePage>, AppError> {
    let user = current.require_user()?;
    let cursor = params.cursor()?;
    let limit = state.config.page_size(params.limit);

    let trip = state.trips.find_trip_by_id(&trip_id).await?;
    if trip.owner_id != user.id {
        return Err(AppError::Forbidden(format!(
            "trip {trip_id} belongs to another user"
        )));
    }
    let candidates = state
        .matches
        .candidates_for(&MatchReference::from(&trip))
        .await?;
    let decided = state.decisions.decided_trip_ids(&user.id).await?;
    let deck: Vec<_> = candidates
        .into_iter()
        .filter(|candidate| !decided.contains(&candidate.trip.id))
        .collect();
    debug!(trip_id = %trip_id, user_id = %user.id, deck = deck.len(), "serving swipe deck");

    Ok(Json(paginate(deck, cursor.as_ref(), limit)))
}

async fn decide(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<String>,
    AppJson(request): AppJson<DecisionRequest>,
) -> Result<(StatusCode, Json<DecisionOutcome>), AppError> {
    let user = current.require_user()?;
    let outcome = state
        .decisions
        .record(&user.id, &trip_id, request.decision)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
