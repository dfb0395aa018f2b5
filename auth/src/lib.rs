//! Authentication utilities library
//!
//! - Credential verification (Argon2id)
//! - HS256 session token issuance and validation
//! - Authentication coordination
//!
//! The service defines its own roles and request context and adapts these
//! primitives at its HTTP boundary.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Sessions
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let hash = auth.hash_password("password123").unwrap();
//! auth.verify_credentials("password123", &hash).unwrap();
//!
//! let token = auth.issue_token("admin@example.com", "admin").unwrap();
//! let session = auth.validate_session(&token).unwrap();
//! assert_eq!(session.role, "admin");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::Session;
pub use authenticator::SESSION_LIFETIME_HOURS;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
