// showroom-client/src/auth.rs
// 授权门 - 管理员状态与凭证

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Supplier of admin status and the credential attached to mutating requests
///
/// Injected into the mutation coordinator; nothing in this crate reads
/// authorization state ambiently.
pub trait AuthorizationGate: Send + Sync {
    fn is_admin(&self) -> bool;
    fn credential(&self) -> Option<Credential>;
}

/// Credential for an admin operation, or the reason it cannot run
pub fn require_admin(gate: &dyn AuthorizationGate) -> SyncResult<Credential> {
    if !gate.is_admin() {
        return Err(SyncError::AdminRequired);
    }
    gate.credential().ok_or(SyncError::MissingCredential)
}

/// Fixed authorization state
#[derive(Debug, Clone, Default)]
pub struct StaticGate {
    is_admin: bool,
    credential: Option<Credential>,
}

impl StaticGate {
    pub fn new(is_admin: bool, credential: Option<Credential>) -> Self {
        Self {
            is_admin,
            credential,
        }
    }

    pub fn admin(token: impl Into<String>) -> Self {
        Self::new(true, Some(Credential::new(token)))
    }

    /// Public visitor: read-only access
    pub fn visitor() -> Self {
        Self::default()
    }
}

impl AuthorizationGate for StaticGate {
    fn is_admin(&self) -> bool {
        self.is_admin
    }

    fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s == "true",
        None => false,
    })
}

/// 持久化会话
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub user: serde_json::Value,
    #[serde(default)]
    pub token: String,
    #[serde(default, alias = "isAdmin", deserialize_with = "flag")]
    pub is_admin: bool,
}

impl StoredSession {
    /// A session counts only when both a user and a token were stored
    fn is_valid(&self) -> bool {
        !self.user.is_null() && !self.token.is_empty()
    }
}

/// Gate backed by a JSON session file
///
/// A missing or unreadable file means "not admin".
#[derive(Debug)]
pub struct SessionGate {
    path: PathBuf,
    session: RwLock<Option<StoredSession>>,
}

impl SessionGate {
    /// Open the session file (if any) at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = Self::read(&path);
        Self {
            path,
            session: RwLock::new(session),
        }
    }

    fn read(path: &Path) -> Option<StoredSession> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No stored session");
                return None;
            }
        };
        match serde_json::from_str::<StoredSession>(&json) {
            Ok(session) if session.is_valid() => Some(session),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    /// 重新加载会话文件
    pub fn reload(&self) {
        let session = Self::read(&self.path);
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// 保存会话
    pub fn login(
        &self,
        user: serde_json::Value,
        token: impl Into<String>,
        is_admin: bool,
    ) -> std::io::Result<()> {
        let session = StoredSession {
            user,
            token: token.into(),
            is_admin,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        tracing::info!(is_admin, "Session stored");
        *self.session.write().unwrap_or_else(|e| e.into_inner()) =
            session.is_valid().then_some(session);
        Ok(())
    }

    /// 删除会话
    pub fn logout(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current(&self) -> Option<StoredSession> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AuthorizationGate for SessionGate {
    fn is_admin(&self) -> bool {
        self.current().is_some_and(|s| s.is_admin)
    }

    fn credential(&self) -> Option<Credential> {
        self.current().map(|s| Credential::new(s.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("secret-token");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.bearer(), "Bearer secret-token");
    }

    #[test]
    fn test_require_admin() {
        assert!(matches!(
            require_admin(&StaticGate::visitor()),
            Err(SyncError::AdminRequired)
        ));
        assert!(matches!(
            require_admin(&StaticGate::new(true, None)),
            Err(SyncError::MissingCredential)
        ));
        let credential = require_admin(&StaticGate::admin("t")).unwrap();
        assert_eq!(credential.token(), "t");
    }

    #[test]
    fn test_session_gate_missing_file_is_not_admin() {
        let dir = tempfile::tempdir().unwrap();
        let gate = SessionGate::open(dir.path().join("session.json"));
        assert!(!gate.is_admin());
        assert!(gate.credential().is_none());
    }

    #[test]
    fn test_session_gate_reads_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            json!({ "user": { "email": "admin@example.com" }, "token": "abc", "isAdmin": "true" }).to_string(),
        )
        .unwrap();

        let gate = SessionGate::open(&path);
        assert!(gate.is_admin());
        assert_eq!(gate.credential().unwrap().token(), "abc");
    }

    #[test]
    fn test_session_gate_requires_user_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, json!({ "token": "abc", "is_admin": true }).to_string()).unwrap();
        assert!(!SessionGate::open(&path).is_admin());

        fs::write(&path, "not json").unwrap();
        assert!(!SessionGate::open(&path).is_admin());
    }

    #[test]
    fn test_session_gate_login_logout() {
        let dir = tempfile::tempdir().unwrap();
        let gate = SessionGate::open(dir.path().join("nested").join("session.json"));

        gate.login(json!({ "name": "owner" }), "tok", true).unwrap();
        assert!(gate.is_admin());
        assert!(gate.path().exists());

        let reopened = SessionGate::open(gate.path());
        assert!(reopened.is_admin());

        gate.logout().unwrap();
        assert!(!gate.is_admin());
        reopened.reload();
        assert!(!reopened.is_admin());
    }
}
