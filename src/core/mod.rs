// Core data types shared by vectors, tables and the grouping engine
pub mod data_value;
pub mod dtype;
pub mod error;

// Re-exports for convenience
pub use data_value::Value;
pub use dtype::Dtype;
pub use error::{Error, Result};
