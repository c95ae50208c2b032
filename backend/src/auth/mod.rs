//! Authentication module
//!
//! JWT access/refresh tokens carrying the account role, argon2 password
//! hashing and the `AuthUser` extractor with its role guards.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::AuthUser;
pub use password::PasswordService;
