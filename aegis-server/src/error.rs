use aegis_registry::RegistryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Registry(e) => match e {
                RegistryError::AlreadyRegistered(_)
                | RegistryError::AlreadyExists(_)
                | RegistryError::AlreadyGranted { .. }
                | RegistryError::NotGranted { .. } => StatusCode::CONFLICT,
                RegistryError::InvalidOwner(_)
                | RegistryError::ZeroGrantee
                | RegistryError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::NotOwner(_) | RegistryError::NotAdministrator(_) => {
                    StatusCode::FORBIDDEN
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Registry(e) => e.kind(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({ "error": message, "kind": self.kind() })),
        )
            .into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
