//! Database entities module

pub mod account;
pub mod profile;

pub use account::Entity as Account;
pub use profile::Entity as Profile;
