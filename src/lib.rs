//! # ShareHaus
//!
//! Persistence and query layer for a community content-sharing site: pooled
//! PostgreSQL execution with `?` placeholders, short random row IDs, and
//! search over approved posts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sharehaus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let haus = ShareHaus::open(&config).await?;
//!
//!     let mut db = haus.database().clone();
//!     let id = haus.ids().new_unique_id_default(&mut db, "post").await?;
//!     db.execute(
//!         &Statement::new("INSERT INTO post (id, content) VALUES (?, ?);")
//!             .bind(id.as_str())
//!             .bind("Free pizza on the quad"),
//!     )
//!     .await?;
//!
//!     let spec: QuerySpec = serde_json::from_str(r#"{"search":"pizza","sortBy":"rating"}"#)?;
//!     for row in haus.search().run(&mut db, &spec).await? {
//!         println!("{:?}", row.get_str("content"));
//!     }
//!
//!     haus.close().await;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::ShareHaus;
pub use errors::ShareHausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, IdConfig};

pub use store_object;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
