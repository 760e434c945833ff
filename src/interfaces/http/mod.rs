//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated extractors
//! - `middleware`: authentication middleware (bearer header or cookie)
//! - `modules`: per-resource handlers and DTOs
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
