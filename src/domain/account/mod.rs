//! Account aggregate
//!
//! Login-capable identities, their roles, and the repository interface
//! over the credential store.

pub mod model;
pub mod repository;

pub use model::{Account, Identity, Role};
pub use repository::{AccountRepository, NewAccount};
