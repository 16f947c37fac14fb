//! Authentication backend for axum-login.
//!
//! Multi-user: credentials are checked against the user store and the
//! session is bound to the user's row id.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum_login::{AuthUser, AuthnBackend, UserId};
use std::sync::Arc;

use crate::domain::error::PapertradeError;
use crate::domain::portfolio::UserRecord;
use crate::ports::store_port::StorePort;

/// Authenticated user as carried by the session layer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    /// The stored password hash, used by axum-login to validate sessions.
    pw_hash: String,
}

impl From<UserRecord> for SessionUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            pw_hash: record.hash,
        }
    }
}

impl AuthUser for SessionUser {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.pw_hash.as_bytes()
    }
}

/// Login credentials submitted via the login form.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Authentication backend that verifies against the user store.
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn StorePort + Send + Sync>,
}

impl Backend {
    pub fn new(store: Arc<dyn StorePort + Send + Sync>) -> Self {
        Self { store }
    }
}

impl AuthnBackend for Backend {
    type User = SessionUser;
    type Credentials = Credentials;
    type Error = PapertradeError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Some(record) = self.store.user_by_username(&creds.username)? else {
            return Ok(None);
        };

        let parsed_hash = match PasswordHash::new(&record.hash) {
            Ok(h) => h,
            Err(_) => return Ok(None),
        };

        let argon2 = Argon2::default();
        if argon2
            .verify_password(creds.password.as_bytes(), &parsed_hash)
            .is_ok()
        {
            Ok(Some(SessionUser::from(record)))
        } else {
            Ok(None)
        }
    }

    async fn get_user(
        &self,
        user_id: &UserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        Ok(self.store.user_by_id(*user_id)?.map(SessionUser::from))
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

/// Hash a password for storage: argon2id with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, PapertradeError> {
    use argon2::{password_hash::SaltString, Algorithm, Params, PasswordHasher, Version};
    use rand::rngs::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PapertradeError::PasswordHash {
            reason: e.to_string(),
        })
}
