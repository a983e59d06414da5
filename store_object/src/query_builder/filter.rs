//! Predicate fragments
//!
//! A [`QueryFilter`] is one piece of a `WHERE` clause. Values stay separate from
//! the field names so they are always bound, never written into the template.

use crate::param::Param;

/// Query condition operators
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    ILike,  // ILIKE (case insensitive)
    In,     // IN
    IsTrue, // IS TRUE
}

/// Single condition in WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    pub values: Vec<Param>, // empty for IS TRUE
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
}

impl QueryFilter {
    /// Create a simple condition
    pub fn condition(field: &str, operator: QueryOperator, values: Vec<Param>) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            values,
        })
    }

    /// Create OR group
    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    /// ILIKE condition (case insensitive)
    pub fn ilike(field: &str, pattern: &str) -> Self {
        Self::condition(field, QueryOperator::ILike, vec![Param::from(pattern)])
    }

    /// Case-insensitive substring match; wildcards in `text` match literally
    pub fn contains_ignore_case(field: &str, text: &str) -> Self {
        Self::ilike(field, &format!("%{}%", escape_like(text)))
    }

    /// IN condition
    pub fn in_values(field: &str, values: Vec<Param>) -> Self {
        Self::condition(field, QueryOperator::In, values)
    }

    /// Boolean column check that binds no parameter
    pub fn is_true(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsTrue, Vec::new())
    }
}

/// Escape `\`, `%` and `_` for a LIKE pattern using the default escape character
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
