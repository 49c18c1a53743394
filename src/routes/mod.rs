pub mod auth;
pub mod extract;
pub mod matches;
pub mod public;
pub mod trips;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .nest("/auth", auth::router())
        .nest("/trips", trips::router())
        .nest("/matches", matches::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::identify_caller,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
