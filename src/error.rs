use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Recipient matched more than one account")]
    AmbiguousRecipient,

    #[error("Transfers to your own wallet are not allowed")]
    SelfTransferNotAllowed,

    #[error("Voucher not found")]
    VoucherNotFound,

    #[error("Voucher has already been redeemed")]
    VoucherAlreadyRedeemed,

    #[error("Request has already been resolved")]
    AlreadyResolved,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::AccountNotFound => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
            AppError::InsufficientFunds => (StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS"),
            AppError::RecipientNotFound => (StatusCode::NOT_FOUND, "RECIPIENT_NOT_FOUND"),
            AppError::AmbiguousRecipient => (StatusCode::CONFLICT, "AMBIGUOUS_RECIPIENT"),
            AppError::SelfTransferNotAllowed => (StatusCode::BAD_REQUEST, "SELF_TRANSFER_NOT_ALLOWED"),
            AppError::VoucherNotFound => (StatusCode::NOT_FOUND, "VOUCHER_NOT_FOUND"),
            AppError::VoucherAlreadyRedeemed => (StatusCode::CONFLICT, "VOUCHER_ALREADY_REDEEMED"),
            AppError::AlreadyResolved => (StatusCode::CONFLICT, "ALREADY_RESOLVED"),
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::AuthError(_) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::OperationFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "OPERATION_FAILED"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::MigrateError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MIGRATION_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        // Store-level failures get logged with detail; the client only sees the code.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{self}");
            "Internal server error".to_string()
        } else {
            log::warn!("{self}");
            self.to_string()
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
