use crate::param::Param;
use crate::validation::ValidationError;
use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Statement failed: {source}")]
    Statement {
        statement: String,
        params: Vec<Param>,
        #[source]
        source: sqlx::Error,
    },

    /// An insert collided with an existing key. Callers allocating IDs are
    /// expected to catch this and retry with a fresh ID.
    #[error("Duplicate key: {source}")]
    DuplicateKey {
        statement: String,
        constraint: Option<String>,
        #[source]
        source: sqlx::Error,
    },

    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Cannot decode column '{column}' of type {type_name}: {message}")]
    Decode {
        column: String,
        type_name: String,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No free ID found for table '{table}' after {attempts} attempts")]
    IdSpaceExhausted { table: String, attempts: u32 },
}

impl StoreError {
    /// Classify a failed statement, splitting out unique violations
    pub(crate) fn from_statement(statement: &str, params: &[Param], source: sqlx::Error) -> Self {
        let duplicate = match &source {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Some(db_err.constraint().map(str::to_string))
            }
            _ => None,
        };

        match duplicate {
            Some(constraint) => StoreError::DuplicateKey {
                statement: statement.to_string(),
                constraint,
                source,
            },
            None => StoreError::Statement {
                statement: statement.to_string(),
                params: params.to_vec(),
                source,
            },
        }
    }

    /// Whether the store rejected the statement because of a uniqueness constraint
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }

    /// The statement template that failed, if this error came from one
    pub fn statement(&self) -> Option<&str> {
        match self {
            StoreError::Statement { statement, .. } | StoreError::DuplicateKey { statement, .. } => {
                Some(statement)
            }
            _ => None,
        }
    }
}
