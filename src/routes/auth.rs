use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::{
    auth::{
        jwt::issue_token,
        wallet::{verify_siwe, SiweLogin},
    },
    error::AppError,
    models::user::SessionToken,
    routes::extract::AppJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/siwe", post(siwe_login))
}

async fn siwe_login(
    State(state): State<AppState>,
    AppJson(login): AppJson<SiweLogin>,
) -> Result<Json<SessionToken>, AppError> {
    let wallet = verify_siwe(&login)?;
    let user = state.users.upsert_wallet(&wallet).await?;
    let token = issue_token(&user.id, &user.wallet, &state.config.jwt)?;
    info!(user_id = %user.id, "wallet signed in");
    Ok(Json(SessionToken { token, user }))
}
