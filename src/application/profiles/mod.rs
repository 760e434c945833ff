pub mod service;

pub use service::ProfileService;
