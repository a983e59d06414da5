//! Store Object - persistence layer for ShareHaus
//!
//! Parameterized statements over a pooled PostgreSQL connection, random
//! unique row IDs, and search statements composed from sparse criteria.

pub mod binding;
pub mod errors;
pub mod executor;
pub mod param;
pub mod placeholder;
pub mod prelude;
pub mod query_builder;
pub mod row;
pub mod statement;
pub mod unique_id;
pub mod validation;

pub use errors::StoreError;
pub use executor::{Database, DbTransaction, StatementExecutor};
pub use param::{Param, ParamType};
pub use placeholder::{NumberedPlaceholders, PassthroughPlaceholders, PlaceholderTranslator};
pub use query_builder::{
    QueryBuilder, QueryFilter, QueryOperator, QuerySpec, SearchComposer, SearchSchema, SortKey,
    SortOrder,
};
pub use row::{Row, RowSet};
pub use statement::Statement;
pub use unique_id::{new_id, IdAllocator, ID_ALPHABET};
pub use validation::{ValidatedColumn, ValidatedTableName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
