//! Identifier validation
//!
//! Table and column names cannot be bound as statement parameters, so anything
//! interpolated into a statement template passes through these types first.

use std::fmt;
use thiserror::Error;

/// Validation errors for database identifiers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Only ASCII alphanumerics and underscores are allowed
    #[error("Invalid characters in name '{0}': only alphanumeric characters and underscores are allowed")]
    InvalidCharacters(String),

    /// PostgreSQL truncates identifiers longer than 63 bytes
    #[error("Name '{name}' is too long: {length} characters (max {max_length})")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },

    #[error("Name cannot be empty")]
    Empty,

    #[error("Name '{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),

    #[error("Name '{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),

    /// A qualified column reference with more than one dot
    #[error("Column reference '{0}' must be 'column' or 'table.column'")]
    InvalidQualifier(String),

    #[error("No column configured for sort key '{0}'")]
    MissingSortColumn(String),
}

/// PostgreSQL identifier length limit
const MAX_LENGTH: usize = 63;

/// Keywords PostgreSQL refuses as bare table or column names
const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "AND", "ANY", "ARRAY", "AS", "ASC", "BOTH", "CASE", "CAST", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DO", "DROP", "ELSE", "END",
    "EXCEPT", "FALSE", "FOR", "FOREIGN", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INSERT",
    "INTERSECT", "INTO", "JOIN", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER",
    "PRIMARY", "REFERENCES", "SELECT", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE",
    "UPDATE", "USER", "USING", "WHEN", "WHERE", "WITH",
];

fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > MAX_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_LENGTH,
        });
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str()) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

/// A validated table name that is safe to use in SQL queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    /// Create a new validated table name
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    /// Get the validated name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated column reference, bare (`rating`) or qualified (`post.rating`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedColumn(String);

impl ValidatedColumn {
    pub fn new(reference: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = reference.split('.').collect();

        match parts.as_slice() {
            [column] => validate_identifier(column)?,
            [table, column] => {
                validate_identifier(table)?;
                validate_identifier(column)?;
            }
            _ => return Err(ValidationError::InvalidQualifier(reference.to_string())),
        }

        Ok(Self(reference.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
