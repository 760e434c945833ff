//! Identity module: accounts and authentication
//!
//! Contains the `AccountService` which orchestrates login, registration
//! and first-run bootstrap.

pub mod service;

pub use service::{AccountService, AuthResult};
