pub mod pool;
pub mod queries;

pub use pool::{create_pool, read_only_pool};
pub use queries::*;
