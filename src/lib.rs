pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::{AppError, ExtractionError, StoreError};
pub use extract::DocumentExtractor;
pub use service::{BillAuditService, PriceStore};
