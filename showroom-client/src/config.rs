//! Client configuration

use crate::auth::{AuthorizationGate, SessionGate, StaticGate};
use shared::catalog::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use std::sync::Arc;

/// Default upload size cap (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Client configuration for the remote catalog and upload services
///
/// | env | default |
/// |-----|---------|
/// | `SHOWROOM_API_URL` | `http://localhost:5000` |
/// | `SHOWROOM_UPLOAD_PATH` | `/upload-cloudinary-image` |
/// | `SHOWROOM_TIMEOUT_SECS` | 30 |
/// | `SHOWROOM_PAGE_SIZE` | 8 |
/// | `SHOWROOM_MAX_UPLOAD_BYTES` | 10 MiB |
/// | `SHOWROOM_SESSION_FILE` | unset |
/// | `SHOWROOM_LOG_LEVEL` | `info` |
/// | `SHOWROOM_LOG_JSON` | false |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Path of the media upload endpoint, relative to `base_url`
    pub upload_path: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Records shown before "show more"
    pub page_size: usize,

    /// Largest file accepted at media selection
    pub max_upload_bytes: u64,

    /// Persisted admin session (see [`crate::auth::SessionGate`])
    pub session_file: Option<PathBuf>,

    pub log_level: String,
    pub log_json: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            upload_path: "/upload-cloudinary-image".to_string(),
            timeout: 30,
            page_size: DEFAULT_PAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_file: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }

    /// Load from environment variables (after `.env`), falling back to defaults
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Self {
            base_url: std::env::var("SHOWROOM_API_URL").unwrap_or(defaults.base_url),
            upload_path: std::env::var("SHOWROOM_UPLOAD_PATH").unwrap_or(defaults.upload_path),
            timeout: std::env::var("SHOWROOM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            page_size: std::env::var("SHOWROOM_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            max_upload_bytes: std::env::var("SHOWROOM_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            session_file: std::env::var("SHOWROOM_SESSION_FILE").ok().map(PathBuf::from),
            log_level: std::env::var("SHOWROOM_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("SHOWROOM_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_json(mut self, json: bool) -> Self {
        self.log_json = json;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }

    /// Authorization gate: the stored session when `session_file` is set,
    /// otherwise a read-only visitor
    pub fn gate(&self) -> Arc<dyn AuthorizationGate> {
        match &self.session_file {
            Some(path) => Arc::new(SessionGate::open(path)),
            None => Arc::new(StaticGate::visitor()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.upload_path, "/upload-cloudinary-image");
        assert_eq!(config.page_size, 8);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://127.0.0.1:9000")
            .with_timeout(5)
            .with_page_size(0)
            .with_upload_path("/upload")
            .with_session_file("/tmp/session.json");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_gate_without_session_file_is_visitor() {
        let gate = ClientConfig::default().gate();
        assert!(!gate.is_admin());
        assert!(gate.credential().is_none());
    }

    #[test]
    fn test_gate_reads_session_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        std::fs::write(
            &path,
            r#"{ "user": { "name": "admin" }, "token": "tok-1", "isAdmin": "true" }"#,
        )
        .unwrap();

        let gate = ClientConfig::default().with_session_file(&path).gate();
        assert!(gate.is_admin());
        assert_eq!(gate.credential().unwrap().token(), "tok-1");

        // 文件缺失时降级为非管理员
        let missing = ClientConfig::default()
            .with_session_file(temp.path().join("absent.json"))
            .gate();
        assert!(!missing.is_admin());
    }
}
