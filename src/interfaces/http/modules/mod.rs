pub mod health;
pub mod profiles;
pub mod users;
