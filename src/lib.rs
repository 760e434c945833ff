//! # Profile Directory
//!
//! Admin-managed directory of social-media profile records: token-based
//! authentication, role-gated administration, and a search/sort/paginate
//! listing API with basic analytics.
//!
//! ## Architecture
//!
//! - **domain**: accounts, profiles, the listing query engine, repository traits
//! - **application**: use-case services that own authorization decisions
//! - **infrastructure**: JWT and bcrypt, SeaORM entities, migrations, repositories
//! - **interfaces**: REST API (axum) with Swagger documentation
//! - **shared**: errors, pagination, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
