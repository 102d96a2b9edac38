//! Password hashing and per-session state.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hashes a password with SHA-256, encoded as URL-safe base64.
///
/// Deterministic and unsalted: the same password always yields the same
/// hash, which keeps the credential file stable across runs.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// State for one interactive session.
///
/// Replaces global logged-in flags: the TUI owns exactly one `Session` and
/// passes it into handlers. Reset on logout; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub username: Option<String>,
}

impl Session {
    /// Creates a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the session as logged in for `username`.
    pub fn begin(&mut self, username: impl Into<String>) {
        self.logged_in = true;
        self.username = Some(username.into());
    }

    /// Resets the session to logged-out (logout).
    pub fn reset(&mut self) {
        self.logged_in = false;
        self.username = None;
    }

    /// Returns true if a user is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hashing the same password twice yields the same hash.
    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
    }

    /// Different passwords yield different hashes.
    #[test]
    fn test_hash_differs_for_different_passwords() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
    }

    /// The hash is not the password itself and has a fixed length.
    #[test]
    fn test_hash_is_one_way_encoding() {
        let hash = hash_password("hunter2");
        assert_ne!(hash, "hunter2");
        // 32 bytes of SHA-256 as unpadded base64
        assert_eq!(hash.len(), 43);
    }

    /// Session lifecycle: begin sets the flags, reset clears them.
    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.username, None);

        session.begin("alice");
        assert!(session.is_logged_in());
        assert_eq!(session.username.as_deref(), Some("alice"));

        session.reset();
        assert!(!session.is_logged_in());
        assert_eq!(session.username, None);
    }
}
