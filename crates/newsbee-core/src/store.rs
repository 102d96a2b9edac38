//! File-backed credential store.
//!
//! Users live in a single JSON document (`users.json`) with the shape
//! `{"users": [{"username": ..., "password": <hash>}, ...]}`. The file is
//! loaded once at open into an in-memory map guarded by a mutex; every
//! mutation rewrites the whole file. Uniqueness of usernames is enforced by
//! the map, not by scanning.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::hash_password;

/// One stored username/password-hash pair (wire shape).
///
/// The `password` field holds the hash, matching the legacy file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Top-level wire shape of `users.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// Errors from store operations.
///
/// All of these are recoverable; `Display` is a one-line message suitable
/// for an inline notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Empty username or password at signup.
    EmptyField,
    /// Signup with a username that already exists (case-sensitive).
    DuplicateUsername { username: String },
    /// Login with a username/password pair that matches no record.
    InvalidCredentials,
    /// Failed to persist the store.
    Io { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EmptyField => write!(f, "Please fill in all fields."),
            StoreError::DuplicateUsername { username } => {
                write!(f, "Username '{username}' already exists!")
            }
            StoreError::InvalidCredentials => write!(f, "Invalid username or password!"),
            StoreError::Io { message } => write!(f, "Error saving users: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// File-backed map from username to password hash.
pub struct CredentialStore {
    path: PathBuf,
    users: Mutex<BTreeMap<String, String>>,
    load_warning: Option<String>,
}

impl CredentialStore {
    /// Opens the store at `path`, loading any existing records.
    ///
    /// Fails soft: an absent file is a fresh empty store; an unreadable or
    /// unparsable file yields an empty store and a user-visible warning
    /// (see [`CredentialStore::load_warning`]). Never errors.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (users, load_warning) = load_users(&path);
        Self {
            path,
            users: Mutex::new(users),
            load_warning,
        }
    }

    /// Returns the warning produced while loading the backing file, if any.
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.users.lock().expect("store mutex poisoned").len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a new user and persists the store.
    ///
    /// Rejects empty username or password, and usernames that already exist
    /// (exact, case-sensitive match). The password is stored as a one-way
    /// hash, never in the clear.
    ///
    /// # Errors
    /// Returns `EmptyField`, `DuplicateUsername`, or `Io` on save failure.
    /// A save failure does not roll back the in-memory record.
    pub fn signup(&self, username: &str, password: &str) -> Result<(), StoreError> {
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::EmptyField);
        }

        let mut users = self.users.lock().expect("store mutex poisoned");
        if users.contains_key(username) {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        users.insert(username.to_string(), hash_password(password));
        // Persist while holding the lock so concurrent signups serialize.
        save_users(&self.path, &users)
    }

    /// Checks a username/password pair against the stored records.
    ///
    /// # Errors
    /// Returns `InvalidCredentials` unless both the username and the hash of
    /// the supplied password match a stored record exactly.
    pub fn login(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let users = self.users.lock().expect("store mutex poisoned");
        let supplied = hash_password(password);
        match users.get(username) {
            Some(stored) if *stored == supplied => Ok(()),
            _ => Err(StoreError::InvalidCredentials),
        }
    }
}

/// Loads records from the backing file.
///
/// Returns the map plus an optional user-visible warning. An absent file is
/// a fresh store and produces no warning.
fn load_users(path: &Path) -> (BTreeMap<String, String>, Option<String>) {
    if !path.exists() {
        return (BTreeMap::new(), None);
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read users file");
            return (
                BTreeMap::new(),
                Some(format!("Error loading users: {e}. Starting with no accounts.")),
            );
        }
    };

    match serde_json::from_str::<UsersFile>(&contents) {
        Ok(file) => {
            let users = file
                .users
                .into_iter()
                .map(|record| (record.username, record.password_hash))
                .collect();
            (users, None)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "users file is not valid JSON");
            (
                BTreeMap::new(),
                Some(format!(
                    "Error loading users: {} is not valid JSON. Starting with no accounts.",
                    path.display()
                )),
            )
        }
    }
}

/// Persists the full map back to the wire shape, overwriting the file.
///
/// Atomic write (temp file + rename) so a crash mid-write cannot leave a
/// truncated document behind.
fn save_users(path: &Path, users: &BTreeMap<String, String>) -> Result<(), StoreError> {
    let file = UsersFile {
        users: users
            .iter()
            .map(|(username, hash)| UserRecord {
                username: username.clone(),
                password_hash: hash.clone(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&file).map_err(|e| StoreError::Io {
        message: e.to_string(),
    })?;

    write_atomic(path, &json).map_err(|e| {
        warn!(path = %path.display(), error = %e, "failed to save users file");
        StoreError::Io {
            message: e.to_string(),
        }
    })
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::open(dir.path().join("users.json"))
    }

    /// Signup then login with the same credentials succeeds.
    #[test]
    fn test_signup_then_login_succeeds() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.signup("alice", "hunter2").unwrap();
        store.login("alice", "hunter2").unwrap();
    }

    /// Login with a wrong password for an existing username fails.
    #[test]
    fn test_login_wrong_password_fails() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.signup("alice", "hunter2").unwrap();
        assert_eq!(
            store.login("alice", "wrong"),
            Err(StoreError::InvalidCredentials)
        );
    }

    /// Login for an unknown username fails.
    #[test]
    fn test_login_unknown_user_fails() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(
            store.login("nobody", "hunter2"),
            Err(StoreError::InvalidCredentials)
        );
    }

    /// Duplicate signup is rejected and the store is unchanged, on disk too.
    #[test]
    fn test_duplicate_signup_rejected_store_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = CredentialStore::open(&path);

        store.signup("alice", "hunter2").unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();

        let err = store.signup("alice", "other").unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateUsername {
                username: "alice".to_string()
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);

        // The original password still works.
        store.login("alice", "hunter2").unwrap();
    }

    /// Usernames are matched case-sensitively.
    #[test]
    fn test_usernames_are_case_sensitive() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.signup("alice", "hunter2").unwrap();
        store.signup("Alice", "hunter2").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.login("ALICE", "hunter2"),
            Err(StoreError::InvalidCredentials)
        );
    }

    /// Empty username or password is rejected at signup.
    #[test]
    fn test_signup_empty_fields_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.signup("", "hunter2"), Err(StoreError::EmptyField));
        assert_eq!(store.signup("alice", ""), Err(StoreError::EmptyField));
        assert!(store.is_empty());
    }

    /// An absent backing file is a fresh store with no warning.
    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.is_empty());
        assert!(store.load_warning().is_none());
    }

    /// Invalid JSON yields an empty store plus a warning, not an error.
    #[test]
    fn test_open_invalid_json_is_empty_with_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, "{not json").unwrap();

        let store = CredentialStore::open(&path);
        assert!(store.is_empty());
        assert!(store.load_warning().unwrap().contains("not valid JSON"));
    }

    /// Records survive a reopen, and the wire shape keeps the legacy field name.
    #[test]
    fn test_records_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        let store = CredentialStore::open(&path);
        store.signup("alice", "hunter2").unwrap();
        drop(store);

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(value["users"][0]["password"].is_string());
        assert_eq!(value["users"][0]["username"], "alice");
        // Never the clear-text password.
        assert_ne!(value["users"][0]["password"], "hunter2");

        let reopened = CredentialStore::open(&path);
        reopened.login("alice", "hunter2").unwrap();
    }

    /// A file with no `users` field loads as empty without a warning.
    #[test]
    fn test_open_missing_users_field_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, "{}").unwrap();

        let store = CredentialStore::open(&path);
        assert!(store.is_empty());
        assert!(store.load_warning().is_none());
    }
}
