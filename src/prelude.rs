//! Convenience re-exports for common ShareHaus usage
//!
//! # Example
//!
//! ```rust
//! use sharehaus::prelude::*;
//!
//! let stmt = Statement::new("SELECT * FROM post WHERE id = ?;").bind("aZ-9");
//! assert_eq!(stmt.placeholder_count(), 1);
//! ```

// Core ShareHaus components
pub use crate::core::ShareHaus;
pub use crate::errors::ShareHausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, IdConfig};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

pub use store_object;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
