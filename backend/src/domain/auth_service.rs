//! Registration, login, and bearer-token authentication.
//!
//! Passwords are hashed with argon2id; sessions are stateless JWTs carrying
//! the user id. Every authenticated request re-resolves the user from the
//! repository so bans and deletions take effect on the next call.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{User, validate_password, validate_username};

/// JWT payload: subject user id plus issue and expiry seconds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Issue a token for `user_id`.
    pub fn sign(&self, user_id: Uuid) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|error| {
            warn!(%error, "token signing failed");
            Error::internal("token signing failed")
        })
    }

    /// Extract the subject user id from a token, rejecting bad signatures
    /// and expired tokens alike.
    pub fn verify(&self, token: &str) -> Result<Uuid, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::unauthorized("Invalid or expired token"))?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::unauthorized("Invalid or expired token"))
    }
}

fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| {
            warn!(%error, "password hashing failed");
            Error::internal("password hashing failed")
        })
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("stored password hash failed to parse");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { .. } => {
            Error::conflict("Username already taken")
        }
    }
}

/// Account lifecycle service: register, login, and per-request lookup.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    /// Create an account and issue its first token.
    ///
    /// The username pre-check turns the common duplicate into a 400 with the
    /// canonical message; a losing race at insert surfaces as 409.
    pub async fn register(&self, username: &str, password: &str) -> Result<(User, String), Error> {
        validate_username(username).map_err(|err| Error::invalid_request(err.to_string()))?;
        validate_password(password).map_err(|err| Error::invalid_request(err.to_string()))?;

        if self
            .users
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(Error::invalid_request("Username already taken"));
        }

        let user = User::new(username, hash_password(password)?);
        self.users.insert(&user).await.map_err(map_repository_error)?;

        let token = self.tokens.sign(user.id)?;
        Ok((user, token))
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), Error> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash) {
            return Err(Error::unauthorized("Invalid credentials"));
        }
        if user.is_banned {
            return Err(Error::forbidden("Your account is banned"));
        }

        let token = self.tokens.sign(user.id)?;
        Ok((user, token))
    }

    /// Resolve a bearer token to a live account.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid or expired token"))?;

        if user.is_banned {
            return Err(Error::forbidden("Your account is banned"));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use mockall::predicate::eq;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 3600)
    }

    fn service(users: MockUserRepository) -> AuthService {
        AuthService::new(Arc::new(users), signer())
    }

    #[test]
    fn token_round_trips_subject() {
        let user_id = Uuid::new_v4();
        let signer = signer();
        let token = signer.sign(user_id).expect("sign");
        assert_eq!(signer.verify(&token).expect("verify"), user_id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("test-secret", -120);
        let token = signer.sign(Uuid::new_v4()).expect("sign");
        let err = signer.verify(&token).expect_err("expired");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenSigner::new("other-secret", 3600)
            .sign(Uuid::new_v4())
            .expect("sign");
        assert!(signer().verify(&token).is_err());
    }

    #[test]
    fn password_hash_verifies_and_differs_from_input() {
        let hash = hash_password("hunter22").expect("hash");
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("alice"))
            .return_once(|_| Ok(Some(User::new("alice", "hash"))));

        let err = service(users)
            .register("alice", "password")
            .await
            .expect_err("duplicate");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Username already taken");
    }

    #[tokio::test]
    async fn register_rejects_invalid_username_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let err = service(users)
            .register("a!", "password")
            .await
            .expect_err("invalid username");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn register_maps_insert_race_to_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));
        users
            .expect_insert()
            .return_once(|_| Err(UserRepositoryError::duplicate_username("alice")));

        let err = service(users)
            .register("alice", "password")
            .await
            .expect_err("race");
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| user.password_hash != "password" && !user.is_admin)
            .return_once(|_| Ok(()));

        let (user, token) = service(users)
            .register("alice", "password")
            .await
            .expect("register");
        assert_eq!(user.username, "alice");
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let stored = User::new("alice", hash_password("correct").expect("hash"));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(stored)));

        let err = service(users)
            .login("alice", "wrong")
            .await
            .expect_err("bad password");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_banned_account_after_credential_check() {
        let mut stored = User::new("alice", hash_password("correct").expect("hash"));
        stored.is_banned = true;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(stored)));

        let err = service(users)
            .login("alice", "correct")
            .await
            .expect_err("banned");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_subject() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let service = service(users);
        let token = TokenSigner::new("test-secret", 3600)
            .sign(Uuid::new_v4())
            .expect("sign");
        let err = service.authenticate(&token).await.expect_err("unknown");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
