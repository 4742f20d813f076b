use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

/// Every way an allocation command can fail. Each variant carries a stable
/// machine-readable kind (see [`AllocationError::kind`]) alongside the human
/// message rendered by `Display`.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("the selection window for this gig has closed")]
    SelectionWindowClosed,
    #[error("the direct offer for this gig has expired")]
    OfferExpired,
    #[error("this gig has already been broadcast")]
    AlreadyBroadcast,
    #[error("a provider has already been selected for this gig")]
    AlreadySelected,
    #[error("provider is not the selected provider for this gig")]
    NotSelectedProvider,
    #[error("this gig is no longer open")]
    NotOpen,
    #[error("another provider already accepted this gig")]
    ConcurrencyConflict,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl AllocationError {
    /// Stable kind string reported in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Validation(_) => "ValidationError",
            Self::SelectionWindowClosed => "SelectionWindowClosed",
            Self::OfferExpired => "OfferExpired",
            Self::AlreadyBroadcast => "AlreadyBroadcast",
            Self::AlreadySelected => "AlreadySelected",
            Self::NotSelectedProvider => "NotSelectedProvider",
            Self::NotOpen => "NotOpen",
            Self::ConcurrencyConflict => "ConcurrencyConflict",
            Self::Database(_) => "Internal",
        }
    }
}

impl ResponseError for AllocationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotSelectedProvider => StatusCode::FORBIDDEN,
            Self::ConcurrencyConflict => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
