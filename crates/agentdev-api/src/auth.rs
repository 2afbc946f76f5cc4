//! Credentials and bearer sessions.
//!
//! Passwords are kept as salted SHA-256 digests. Sessions are opaque random
//! tokens held in memory: an access token for requests and a refresh token
//! that can be traded once for a new pair.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use agentdev_models::{Role, User, UserId};

use crate::config::AdminAccount;

/// Seeded ID of the configured administrator.
pub const ADMIN_USER_ID: &str = "user_123";

/// Generate a cryptographically random 32-byte hex token.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two byte strings in time independent of where they differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

struct Credential {
    user: User,
    salt: String,
    digest: String,
}

/// In-memory user directory keyed by lowercase email.
pub struct UserDirectory {
    users: RwLock<HashMap<String, Credential>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// A directory holding only the configured administrator.
    pub fn with_admin(admin: &AdminAccount) -> Self {
        let directory = Self::new();
        directory.add_user(
            User::new(ADMIN_USER_ID, admin.email.clone(), admin.name.clone(), Role::Admin),
            &admin.password,
        );
        directory
    }

    /// Adds or replaces a user.
    pub fn add_user(&self, user: User, password: &str) {
        let salt = generate_salt();
        let digest = password_digest(&salt, password);
        let key = user.email.to_lowercase();
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(key, Credential { user, salt, digest });
    }

    /// Returns the user if the email and password match.
    pub fn verify(&self, email: &str, password: &str) -> Option<User> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        let credential = users.get(&email.to_lowercase())?;
        let candidate = password_digest(&credential.salt, password);
        constant_time_eq(candidate.as_bytes(), credential.digest.as_bytes())
            .then(|| credential.user.clone())
    }

    pub fn get(&self, user_id: &UserId) -> Option<User> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users
            .values()
            .find(|c| &c.user.user_id == user_id)
            .map(|c| c.user.clone())
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens handed to a client after login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

struct AccessEntry {
    user: User,
    refresh_token: String,
    expires_at: Instant,
}

struct RefreshEntry {
    user: User,
    access_token: String,
    expires_at: Instant,
}

#[derive(Default)]
struct Sessions {
    access: HashMap<String, AccessEntry>,
    refresh: HashMap<String, RefreshEntry>,
}

impl Sessions {
    fn prune(&mut self, now: Instant) {
        self.access.retain(|_, e| e.expires_at > now);
        self.refresh.retain(|_, e| e.expires_at > now);
    }
}

/// Issues, validates and revokes bearer sessions.
pub struct SessionManager {
    access_ttl: Duration,
    refresh_ttl: Duration,
    inner: Mutex<Sessions>,
}

impl SessionManager {
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            access_ttl,
            refresh_ttl,
            inner: Mutex::new(Sessions::default()),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Starts a session for `user`.
    pub fn login(&self, user: User) -> TokenPair {
        self.login_at(user, Instant::now())
    }

    fn login_at(&self, user: User, now: Instant) -> TokenPair {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.prune(now);
        self.issue(&mut sessions, user, now)
    }

    fn issue(&self, sessions: &mut Sessions, user: User, now: Instant) -> TokenPair {
        let access_token = generate_token();
        let refresh_token = generate_token();
        sessions.access.insert(
            access_token.clone(),
            AccessEntry {
                user: user.clone(),
                refresh_token: refresh_token.clone(),
                expires_at: now + self.access_ttl,
            },
        );
        sessions.refresh.insert(
            refresh_token.clone(),
            RefreshEntry {
                user,
                access_token: access_token.clone(),
                expires_at: now + self.refresh_ttl,
            },
        );
        TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.as_secs(),
        }
    }

    /// Returns the session's user while the access token is unexpired.
    pub fn validate(&self, access_token: &str) -> Option<User> {
        self.validate_at(access_token, Instant::now())
    }

    fn validate_at(&self, access_token: &str, now: Instant) -> Option<User> {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.access.get(access_token) {
            Some(entry) if entry.expires_at > now => Some(entry.user.clone()),
            Some(_) => {
                sessions.access.remove(access_token);
                None
            }
            None => None,
        }
    }

    /// Trades a refresh token for a new pair. Both old tokens stop working.
    pub fn refresh(&self, refresh_token: &str) -> Option<(TokenPair, User)> {
        self.refresh_at(refresh_token, Instant::now())
    }

    fn refresh_at(&self, refresh_token: &str, now: Instant) -> Option<(TokenPair, User)> {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.refresh.remove(refresh_token)?;
        sessions.access.remove(&entry.access_token);
        if entry.expires_at <= now {
            return None;
        }
        let user = entry.user;
        let pair = self.issue(&mut sessions, user.clone(), now);
        Some((pair, user))
    }

    /// Ends the session owning `access_token`. Returns whether it existed.
    pub fn revoke(&self, access_token: &str) -> bool {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.access.remove(access_token) {
            Some(entry) => {
                sessions.refresh.remove(&entry.refresh_token);
                true
            }
            None => false,
        }
    }

    /// Number of live access tokens.
    pub fn active_sessions(&self) -> usize {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.prune(Instant::now());
        sessions.access.len()
    }
}
