use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::{
    auth::CurrentUser,
    error::AppError,
    matching::{paginate, CandidatePage},
    models::{
        decision::MutualMatch,
        trip::{MatchReference, TripDescriptor},
    },
    routes::{
        extract::{AppJson, AppQuery},
        trips::PageParams,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggested", post(suggested))
        .route("/mutual", get(mutual))
}

async fn suggested(
    State(state): State<AppState>,
    current: CurrentUser,
    AppQuery(params): AppQuery<PageParams>,
    AppJson(descriptor): AppJson<TripDescriptor>,
) -> Result<Json<CandidatePage>, AppError> {
    let reference = MatchReference::from_descriptor(descriptor, current.id())?;
    let cursor = params.cursor()?;
    let limit = state.config.page_size(params.limit);

    let candidates = state.matches.candidates_for(&reference).await?;
    Ok(Json(paginate(candidates, cursor.as_ref(), limit)))
}

async fn mutual(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<MutualMatch>>, AppError> {
    let user = current.require_user()?;
    Ok(Json(state.decisions.mutual_matches(&user.id).await?))
}
