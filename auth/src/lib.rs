//! Authentication and session revocation
//!
//! Provides the authentication core used by the journal API:
//! - Password hashing (Argon2id)
//! - Signed access tokens (HS256 JWT with `sub`, `iat`, `exp`, `jti`)
//! - Revocation of tokens before their natural expiry
//! - The gate that ties these together for every authenticated request
//!
//! The service embedding this crate supplies user lookup through
//! [`IdentityProvider`] and durable revocation storage through
//! [`RevocationStore`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{TokenCodec, TokenError};
//! use chrono::{Duration, Utc};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let issued = codec.issue("user123", now, Duration::minutes(60)).unwrap();
//!
//! let claims = codec.verify(&issued.token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! let later = now + Duration::minutes(60);
//! assert_eq!(codec.verify(&issued.token, later), Err(TokenError::Expired));
//! ```

pub mod errors;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod revocation;

// Re-export commonly used items
pub use errors::AuthError;
pub use gate::AuthGate;
pub use gate::LoginOutcome;
pub use identity::Credential;
pub use identity::Identity;
pub use identity::IdentityError;
pub use identity::IdentityProvider;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use revocation::InMemoryRevocationStore;
pub use revocation::RevocationError;
pub use revocation::RevocationRecord;
pub use revocation::RevocationStore;
pub use revocation::RevocationSweeper;
