use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RosterError {
    // Configuration errors
    #[error("Missing required configuration: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    // Discord errors
    #[error("Discord {resource} request failed with status {status}")]
    Upstream {
        resource: &'static str,
        status: reqwest::StatusCode,
    },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        RosterError::Internal {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

/// JSON body returned for every failed API request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RosterError {
    /// Client-facing summary plus optional detail string
    fn to_body(&self) -> ErrorBody {
        match self {
            RosterError::Configuration { missing } => ErrorBody {
                error: "Environment variables are not defined".to_string(),
                details: Some(missing.join(", ")),
            },
            RosterError::Upstream { .. } => ErrorBody {
                error: "Failed to fetch data from Discord".to_string(),
                details: Some(self.to_string()),
            },
            RosterError::Internal { message } => ErrorBody {
                error: "Internal Server Error".to_string(),
                details: Some(message.clone()),
            },
        }
    }
}

/// All roster failures are server-side faults
impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        error!("Roster request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_body())).into_response()
    }
}
