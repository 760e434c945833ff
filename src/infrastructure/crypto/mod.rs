pub mod jwt;
pub mod password;

pub use jwt::{IssuedToken, JwtConfig, TokenClaims, TokenError, TokenService};
pub use password::{hash_password, verify_password, DEFAULT_COST};
