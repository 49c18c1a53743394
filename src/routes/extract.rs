use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    Json,
};

use crate::error::AppError;

/// `Json` whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection is an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
