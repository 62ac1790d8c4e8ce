//! Unified error codes for the showroom catalog
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors
//! - 7xxx: Media errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers and can be matched by any consumer of the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Admin flag is set but no credential is available
    CredentialMissing = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 6xxx: Catalog ====================
    /// Catalog record not found
    ProductNotFound = 6001,
    /// Catalog could not be fetched
    CatalogLoadFailed = 6002,
    /// Remote service rejected a create/update/delete
    MutationRejected = 6003,
    /// A mutation for the same record is already in flight
    SubmitInProgress = 6004,
    /// Operation was cancelled before completion
    OperationCancelled = 6005,
    /// Edit session is missing required fields
    ProductIncomplete = 6006,

    // ==================== 7xxx: Media ====================
    /// Media upload failed
    UploadFailed = 7001,
    /// At least one media entry is required
    MediaRequired = 7002,
    /// File is not a supported image type
    UnsupportedMediaType = 7003,
    /// File exceeds the upload size limit
    FileTooLarge = 7004,
    /// Media index out of range
    MediaIndexOutOfRange = 7005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error reaching a remote service
    NetworkError = 9003,
    /// Remote service returned an unexpected payload
    InvalidResponse = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::CredentialMissing => "Admin credential is not available",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CatalogLoadFailed => "Failed to load catalog",
            ErrorCode::MutationRejected => "Failed to save changes",
            ErrorCode::SubmitInProgress => "A save for this item is already in progress",
            ErrorCode::OperationCancelled => "Operation was cancelled",
            ErrorCode::ProductIncomplete => "Please fill in all required fields",

            // Media
            ErrorCode::UploadFailed => "Error uploading images",
            ErrorCode::MediaRequired => "At least one image is required",
            ErrorCode::UnsupportedMediaType => "File is not an image",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::MediaIndexOutOfRange => "Image index is out of range",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::InvalidResponse => "Invalid response from server",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::CredentialMissing),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::CatalogLoadFailed),
            6003 => Ok(ErrorCode::MutationRejected),
            6004 => Ok(ErrorCode::SubmitInProgress),
            6005 => Ok(ErrorCode::OperationCancelled),
            6006 => Ok(ErrorCode::ProductIncomplete),

            // Media
            7001 => Ok(ErrorCode::UploadFailed),
            7002 => Ok(ErrorCode::MediaRequired),
            7003 => Ok(ErrorCode::UnsupportedMediaType),
            7004 => Ok(ErrorCode::FileTooLarge),
            7005 => Ok(ErrorCode::MediaIndexOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::InvalidResponse),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::CredentialMissing.code(), 1008);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::CatalogLoadFailed.code(), 6002);
        assert_eq!(ErrorCode::SubmitInProgress.code(), 6004);
        assert_eq!(ErrorCode::UploadFailed.code(), 7001);
        assert_eq!(ErrorCode::FileTooLarge.code(), 7004);
        assert_eq!(ErrorCode::NetworkError.code(), 9003);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::ProductNotFound,
            ErrorCode::ProductIncomplete,
            ErrorCode::MediaRequired,
            ErrorCode::MediaIndexOutOfRange,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::UploadFailed).unwrap(),
            "7001"
        );

        let code: ErrorCode = serde_json::from_str("6003").unwrap();
        assert_eq!(code, ErrorCode::MutationRejected);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::SubmitInProgress), "6004");
        assert_eq!(ErrorCode::UploadFailed.message(), "Error uploading images");
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
