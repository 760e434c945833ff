//! Application layer - use-case orchestration
//!
//! Services here own the authorization decisions and talk to storage only
//! through the domain repository traits.

pub mod identity;
pub mod profiles;

pub use identity::{AccountService, AuthResult};
pub use profiles::ProfileService;
