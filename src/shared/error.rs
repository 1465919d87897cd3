use sqlx::error::ErrorKind;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    NotFound(String),
    Unauthorized(String),
    InvalidInput(String),
    Conflict(String),
    Notification(String),
    Serialization(String),
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound(format!("Could not find {entity} of ID: {id}"))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    /// Stable kind tag, suitable for mapping to a transport status code.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Conflict(_) => "conflict",
            AppError::Notification(_) => "notification",
            AppError::Serialization(_) => "serialization",
            AppError::Internal(_) => "internal",
        }
    }

    /// A conflict means the store aborted the transaction; nothing was
    /// applied and the caller may retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Notification(msg) => write!(f, "Notification error: {}", msg),
            AppError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// SQLITE_BUSY and SQLITE_LOCKED extended result codes.
const SQLITE_CONTENTION_CODES: [&str; 4] = ["5", "6", "261", "517"];

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if matches!(db.kind(), ErrorKind::UniqueViolation) {
                return AppError::Conflict(format!("Uniqueness violated: {}", db.message()));
            }
            let busy = db
                .code()
                .map(|code| SQLITE_CONTENTION_CODES.contains(&code.as_ref()))
                .unwrap_or(false);
            if busy || db.message().contains("database is locked") {
                return AppError::Conflict(
                    "Concurrent update detected, transaction aborted".to_string(),
                );
            }
        }
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
