use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{database::StoreError, session::SessionError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not enough people to vote on. Seed the store with at least two people.")]
    NotEnoughPeople,

    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotEnoughPeople => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UnknownGender { .. } => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Session { .. } => {
                error!("{self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
