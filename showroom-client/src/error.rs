//! Client error types
//!
//! [`ClientError`] is the transport layer (one HTTP call), [`SyncError`]
//! the operation layer (load, submit, delete). Both convert into
//! [`AppError`] for display.

use crate::coordinator::MutationKind;
use shared::catalog::ProductFamily;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Transport error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error body returned by the server
    #[error("API error {code}: {message}")]
    Api {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map to the shared error code space
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Http(e) if e.is_decode() => ErrorCode::InvalidResponse,
            ClientError::Http(_) => ErrorCode::NetworkError,
            ClientError::Api { code, .. } => {
                ErrorCode::try_from(*code).unwrap_or(ErrorCode::MutationRejected)
            }
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InvalidResponse
            }
            ClientError::Unauthorized(_) => ErrorCode::NotAuthenticated,
            ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Validation(_) => ErrorCode::ValidationFailed,
            ClientError::Internal(_) | ClientError::Io(_) => ErrorCode::InternalError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::with_message(self.code(), self.to_string());
        match self {
            ClientError::Api {
                details: Some(details),
                ..
            } => err.with_detail("server", details.clone()),
            _ => err,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Catalog synchronization error, recovered at the operation boundary
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetch failed; the previous snapshot is kept
    #[error("Failed to load {family}: {source}")]
    Load {
        family: ProductFamily,
        #[source]
        source: ClientError,
    },

    /// Missing fields, missing media or a rejected file; nothing was sent
    #[error("{0}")]
    Validation(AppError),

    /// At least one media upload failed; the session is unchanged
    #[error("Error uploading images ({failed} of {total} failed, first: {file}): {source}")]
    Upload {
        file: String,
        failed: usize,
        total: usize,
        #[source]
        source: ClientError,
    },

    /// The server rejected a create/update/delete; the store is unchanged
    #[error("Failed to {action} {family}: {source}")]
    Mutation {
        action: MutationKind,
        family: ProductFamily,
        #[source]
        source: ClientError,
    },

    #[error("A submission for {key} is already in progress")]
    SubmitInProgress { key: String },

    #[error("Administrator access required")]
    AdminRequired,

    #[error("Administrator credential missing")]
    MissingCredential,

    #[error("Operation cancelled")]
    Cancelled,
}

impl SyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::Load { .. } => ErrorCode::CatalogLoadFailed,
            SyncError::Validation(e) => e.code,
            SyncError::Upload { .. } => ErrorCode::UploadFailed,
            SyncError::Mutation { .. } => ErrorCode::MutationRejected,
            SyncError::SubmitInProgress { .. } => ErrorCode::SubmitInProgress,
            SyncError::AdminRequired => ErrorCode::AdminRequired,
            SyncError::MissingCredential => ErrorCode::CredentialMissing,
            SyncError::Cancelled => ErrorCode::OperationCancelled,
        }
    }

    /// Whether the UI should keep a retry affordance
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            SyncError::Validation(e) => e.clone(),
            SyncError::Load { family, source } => {
                AppError::with_message(self.code(), self.to_string())
                    .with_detail("family", family.as_str())
                    .with_detail("cause", source.code().code())
            }
            SyncError::Upload {
                file,
                failed,
                total,
                source,
            } => AppError::with_message(self.code(), self.to_string())
                .with_detail("file", file.clone())
                .with_detail("failed", *failed)
                .with_detail("total", *total)
                .with_detail("cause", source.code().code()),
            SyncError::Mutation {
                action,
                family,
                source,
            } => AppError::with_message(self.code(), self.to_string())
                .with_detail("action", action.as_str())
                .with_detail("family", family.as_str())
                .with_detail("cause", source.code().code()),
            SyncError::SubmitInProgress { key } => {
                AppError::new(self.code()).with_detail("key", key.clone())
            }
            _ => AppError::new(self.code()),
        }
    }
}

impl From<AppError> for SyncError {
    fn from(err: AppError) -> Self {
        SyncError::Validation(err)
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        err.to_app_error()
    }
}

/// Result type for catalog synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_codes() {
        assert_eq!(
            ClientError::Unauthorized("expired".into()).code(),
            ErrorCode::NotAuthenticated
        );
        assert_eq!(
            ClientError::Api {
                code: 6001,
                message: "gone".into(),
                details: None
            }
            .code(),
            ErrorCode::ProductNotFound
        );
        assert_eq!(
            ClientError::Api {
                code: 4242,
                message: "?".into(),
                details: None
            }
            .code(),
            ErrorCode::MutationRejected
        );
    }

    #[test]
    fn test_sync_error_to_app_error() {
        let err = SyncError::Upload {
            file: "front.jpg".into(),
            failed: 1,
            total: 3,
            source: ClientError::Internal("502".into()),
        };
        let app = err.to_app_error();
        assert_eq!(app.code, ErrorCode::UploadFailed);
        assert!(app.is_retryable());
        let details = app.details.unwrap();
        assert_eq!(details["file"], "front.jpg");
        assert_eq!(details["failed"], 1);
    }

    #[test]
    fn test_validation_passes_through() {
        let err: SyncError = AppError::required("name").into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RequiredField);
        assert_eq!(app.message, "name is required");
    }

    #[test]
    fn test_latch_errors_are_not_retryable() {
        assert!(!SyncError::SubmitInProgress { key: "x".into() }.is_retryable());
        assert!(!SyncError::AdminRequired.is_retryable());
        assert_eq!(SyncError::MissingCredential.code(), ErrorCode::CredentialMissing);
    }
}
