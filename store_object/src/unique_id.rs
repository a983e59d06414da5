//! Short unique IDs
//!
//! Every entity row is keyed by a short random string. The allocator draws a
//! candidate, checks the target table for it, and redraws until it finds one
//! no live row uses.
//!
//! The check is a best-effort pre-check, not a reservation. Two callers can
//! draw the same candidate and both see it free before either inserts; the
//! table's primary key constraint is what actually enforces uniqueness. An
//! insert that loses that race fails with [`StoreError::DuplicateKey`], and the
//! caller retries with a new ID. [`IdAllocator::insert_with_unique_id`] wraps
//! that loop.
//!
//! IDs of deleted rows are not remembered, so a freed value can be handed out
//! again. The default length of 4 keeps IDs short enough for URLs at the cost
//! of a small ID space (64^4); collisions, and so retries, grow with table
//! size. Session, verification and password reset tokens use the longer
//! token length because guessability matters there too.

use crate::errors::StoreError;
use crate::executor::StatementExecutor;
use crate::statement::Statement;
use crate::validation::ValidatedTableName;
use config::IdConfig;
use rand::Rng;

/// URL-safe base64 alphabet
pub const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Generate a random ID with no uniqueness check
pub fn new_id(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Allocates primary keys checked against a table's live rows
#[derive(Debug, Clone)]
pub struct IdAllocator {
    default_length: usize,
    token_length: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(&IdConfig::default())
    }
}

impl IdAllocator {
    pub fn new(config: &IdConfig) -> Self {
        Self {
            default_length: config.default_length,
            token_length: config.token_length,
        }
    }

    pub fn default_length(&self) -> usize {
        self.default_length
    }

    pub fn token_length(&self) -> usize {
        self.token_length
    }

    /// Draw IDs of `length` until one is absent from `table`
    ///
    /// `table` must have an `id` column. Retries are unbounded; only store
    /// errors end the loop early.
    pub async fn new_unique_id<E>(
        &self,
        exec: &mut E,
        table: &str,
        length: usize,
    ) -> Result<String, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        let table = ValidatedTableName::new(table)?;
        let sql = format!("SELECT id FROM {} WHERE id = ?;", table);
        let mut collisions: u64 = 0;

        loop {
            let candidate = new_id(length);
            let rows = exec
                .execute(&Statement::new(sql.as_str()).bind(candidate.as_str()))
                .await?;

            if rows.is_empty() {
                if collisions > 0 {
                    tracing::debug!(table = %table, collisions, "unique id found after collisions");
                }
                return Ok(candidate);
            }

            collisions += 1;
            #[cfg(feature = "debug-logging")]
            tracing::debug!(table = %table, candidate = %candidate, "id collision, retrying");
        }
    }

    /// Entity ID of the configured default length
    pub async fn new_unique_id_default<E>(&self, exec: &mut E, table: &str) -> Result<String, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        self.new_unique_id(exec, table, self.default_length).await
    }

    /// Session or verification token of the configured token length
    pub async fn new_token<E>(&self, exec: &mut E, table: &str) -> Result<String, StoreError>
    where
        E: StatementExecutor + ?Sized,
    {
        self.new_unique_id(exec, table, self.token_length).await
    }

    /// Allocate an ID, build the insert with it, and retry on key collisions
    ///
    /// `build` receives each candidate and returns the insert statement. Only
    /// [`StoreError::DuplicateKey`] triggers a retry; any other failure is
    /// returned as is. After `max_attempts` collisions the result is
    /// [`StoreError::IdSpaceExhausted`].
    ///
    /// Do not call this on a [`DbTransaction`](crate::DbTransaction): the first
    /// duplicate key aborts the PostgreSQL transaction and every retry fails.
    pub async fn insert_with_unique_id<E, F>(
        &self,
        exec: &mut E,
        table: &str,
        length: usize,
        max_attempts: u32,
        build: F,
    ) -> Result<String, StoreError>
    where
        E: StatementExecutor + ?Sized,
        F: Fn(&str) -> Statement + Send + Sync,
    {
        for attempt in 1..=max_attempts {
            let id = self.new_unique_id(exec, table, length).await?;

            match exec.execute(&build(&id)).await {
                Ok(_) => return Ok(id),
                Err(e) if e.is_duplicate_key() => {
                    tracing::debug!(table, attempt, id = %id, "insert lost id race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::IdSpaceExhausted {
            table: table.to_string(),
            attempts: max_attempts,
        })
    }
}
