//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::ProductNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::SubmitInProgress => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::CredentialMissing => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ProductIncomplete
            | Self::MediaRequired
            | Self::MediaIndexOutOfRange => StatusCode::BAD_REQUEST,

            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::CatalogLoadFailed
            | Self::MutationRejected
            | Self::UploadFailed
            | Self::NetworkError
            | Self::InvalidResponse => StatusCode::BAD_GATEWAY,

            Self::OperationCancelled
            | Self::Unknown
            | Self::InternalError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::ProductNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::SubmitInProgress.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::CredentialMissing.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::FileTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ErrorCode::UploadFailed.http_status(), StatusCode::BAD_GATEWAY);
    }
}
