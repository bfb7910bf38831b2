pub mod revoked_token;
pub mod user;

pub use revoked_token::PostgresRevocationStore;
pub use user::PostgresUserRepository;
