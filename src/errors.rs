use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("invalid date key: {0}")]
    InvalidDate(String),

    #[error("unknown medication: {0}")]
    UnknownMedication(String),

    #[error("no meal at index {0}")]
    MealIndex(usize),

    #[error("records are still loading")]
    NotReady,

    #[error("save task aborted: {0}")]
    SaveAborted(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let status = match err {
            TrackerError::Invalid(_) | TrackerError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            TrackerError::UnknownMedication(_) | TrackerError::MealIndex(_) => StatusCode::NOT_FOUND,
            TrackerError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            TrackerError::SaveAborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
