use std::sync::OnceLock;

use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Fixed lifetime of a session token.
pub const SESSION_LIFETIME_HOURS: i64 = 24;

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Authentication coordinator combining password verification and session tokens.
///
/// Built once from configuration and shared read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    /// Hash verified against when no account exists, so unknown and known
    /// identities cost the same. Computed on first use.
    decoy_hash: OnceLock<Option<String>>,
}

/// Claims extracted from a session token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: Option<String>,
    pub role: String,
    pub expires_at: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for session signing. Empty disables issuance
    ///   and validation (both fail with `JwtError::MissingSecret`).
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against the stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Reject a login for an identity with no stored hash.
    ///
    /// Runs a full verification against a decoy hash first so the rejection
    /// takes as long as a wrong password for a real account.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(hash) = decoy {
            let _ = self.password_hasher.verify(password, hash);
        }
        AuthenticationError::InvalidCredentials
    }

    /// Whether tokens can be issued and validated.
    pub fn can_sign(&self) -> bool {
        self.jwt_handler.is_configured()
    }

    /// Issue a session token for `(email, role)` starting now.
    pub fn issue_token(&self, email: &str, role: &str) -> Result<String, JwtError> {
        self.issue_token_at(email, role, Utc::now().timestamp())
    }

    /// Issue a session token starting at `issued_at` (Unix seconds).
    ///
    /// # Errors
    /// * `MissingSecret` - No signing secret configured
    /// * `EncodingFailed` - Signing failed
    pub fn issue_token_at(
        &self,
        email: &str,
        role: &str,
        issued_at: i64,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_session(email, role, issued_at, SESSION_LIFETIME_HOURS);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a session token against the current time.
    pub fn validate_session(&self, token: &str) -> Result<Session, JwtError> {
        self.validate_session_at(token, Utc::now().timestamp())
    }

    /// Validate a session token as of `now` (Unix seconds).
    ///
    /// Checks run in order and stop at the first failure: signature and
    /// algorithm, expiry, then the `role` claim.
    ///
    /// # Errors
    /// * `MissingSecret` - No signing secret configured
    /// * `InvalidAlgorithm` / `DecodingFailed` / `MissingClaim("exp")` - Token not trusted
    /// * `TokenExpired` - `exp` is before `now`
    /// * `MissingClaim("role")` - No string `role` claim
    pub fn validate_session_at(&self, token: &str, now: i64) -> Result<Session, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        let role = claims
            .role()
            .ok_or_else(|| JwtError::MissingClaim(Claims::ROLE.to_string()))?
            .to_string();

        Ok(Session {
            email: claims.email,
            role,
            expires_at: claims.exp.unwrap_or(now),
        })
    }
}
