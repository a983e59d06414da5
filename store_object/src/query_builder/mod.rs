//! Query builder utilities
//!
//! Generic predicate and ordering composition, plus the post search built on it.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod search;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use builder::QueryBuilder;
pub use filter::{escape_like, LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use search::{FilterField, QuerySpec, SearchComposer, SearchSchema, SortKey};
pub use sql_generation::SqlGenerator;
