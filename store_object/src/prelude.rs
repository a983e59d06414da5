//! Convenience re-exports for common store-object usage

// Execution
pub use crate::executor::{Database, DbTransaction, StatementExecutor};
pub use crate::param::{Param, ParamType};
pub use crate::statement::Statement;
pub use crate::row::{Row, RowSet};

// Error types
pub use crate::errors::StoreError;
pub use crate::validation::{ValidatedColumn, ValidatedTableName, ValidationError};

// IDs
pub use crate::unique_id::{new_id, IdAllocator};

// Query building and search
pub use crate::query_builder::{
    QueryBuilder, QueryFilter, QuerySpec, SearchComposer, SearchSchema, SortKey, SortOrder,
};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
pub use sqlx::PgPool;
