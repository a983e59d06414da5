//! Statement execution
//!
//! [`Database`] owns the process-wide connection pool and is the only place
//! statements reach PostgreSQL. Every call leases a connection, translates the
//! `?` placeholders, binds the parameters, and hands the connection back when
//! the call finishes, whether it succeeded or not.
//!
//! Capacity: at most `max_connections` statements run at once. Further calls
//! wait for a connection to come back, and with no `acquire_timeout_seconds`
//! configured they wait indefinitely. A stuck statement therefore pins one
//! connection, and a stuck batch pins one connection for all of its remaining
//! statements. Wrap calls in `tokio::time::timeout` where that matters.

use crate::binding::bind_all;
use crate::errors::StoreError;
use crate::placeholder::{NumberedPlaceholders, PlaceholderTranslator};
use crate::row::{Row, RowSet};
use crate::statement::Statement;
use async_trait::async_trait;
use config::DatabaseConfig;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;

/// Stand-in for "no acquire timeout"; sqlx requires a finite duration
const UNBOUNDED_ACQUIRE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Anything statements can be executed against
///
/// Implemented by [`Database`] (a fresh pooled connection per call) and
/// [`DbTransaction`] (one pinned connection inside a transaction), so the ID
/// allocator and the search runner work with either.
#[async_trait]
pub trait StatementExecutor: Send {
    /// Run one statement and return all of its rows
    async fn execute(&mut self, statement: &Statement) -> Result<RowSet, StoreError>;

    /// Run statements in order on a single connection, one row set per statement
    async fn execute_many(&mut self, statements: &[Statement]) -> Result<Vec<RowSet>, StoreError>;
}

/// Pooled PostgreSQL execution engine
///
/// Cloning is cheap and every clone shares the same pool. Build one at
/// startup, pass it to whatever needs storage, and [`close`](Database::close)
/// it once at shutdown.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    translator: Arc<dyn PlaceholderTranslator>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl Database {
    /// Open the pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let acquire_timeout = config
            .acquire_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(UNBOUNDED_ACQUIRE);

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(acquire_timeout);

        if config.idle_timeout_seconds > 0 {
            pool_options = pool_options.idle_timeout(Duration::from_secs(config.idle_timeout_seconds));
        }

        // Set max lifetime if specified
        pool_options = if config.max_lifetime_seconds > 0 {
            pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        } else {
            pool_options.max_lifetime(None)
        };

        let pool = pool_options
            .connect(&config.connection_string())
            .await
            .map_err(StoreError::Connection)?;

        tracing::debug!(
            max_connections = config.max_connections,
            "database pool opened"
        );

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool, translating `?` into `$n`
    pub fn from_pool(pool: PgPool) -> Self {
        Self::with_translator(pool, Arc::new(NumberedPlaceholders))
    }

    /// Wrap an existing pool with a different placeholder style
    pub fn with_translator(pool: PgPool, translator: Arc<dyn PlaceholderTranslator>) -> Self {
        Self { pool, translator }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one statement on a leased connection
    pub async fn execute(&self, statement: &Statement) -> Result<RowSet, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connection)?;
        run_statement(&mut conn, self.translator.as_ref(), statement, None).await
    }

    /// Run statements in order on one leased connection
    ///
    /// The connection is held for the whole batch. This is not a transaction:
    /// statements before a failure stay applied.
    pub async fn execute_many(&self, statements: &[Statement]) -> Result<Vec<RowSet>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connection)?;
        run_batch(&mut conn, self.translator.as_ref(), statements).await
    }

    /// Start a transaction on a dedicated connection
    pub async fn begin(&self) -> Result<DbTransaction, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::Connection)?;
        Ok(DbTransaction {
            tx,
            translator: Arc::clone(&self.translator),
        })
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.execute(&Statement::new("SELECT 1")).await?;
        Ok(())
    }

    /// Close every connection and stop handing out new ones
    ///
    /// Waits for leased connections to come back. Calling it again is a no-op.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::debug!("database pool closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl StatementExecutor for Database {
    async fn execute(&mut self, statement: &Statement) -> Result<RowSet, StoreError> {
        Database::execute(&*self, statement).await
    }

    async fn execute_many(&mut self, statements: &[Statement]) -> Result<Vec<RowSet>, StoreError> {
        Database::execute_many(&*self, statements).await
    }
}

/// A transaction pinned to one pooled connection
///
/// Dropping it without [`commit`](DbTransaction::commit) rolls back. A failed
/// statement leaves PostgreSQL's transaction aborted, so later statements in
/// the same transaction fail until it is rolled back.
pub struct DbTransaction {
    tx: Transaction<'static, Postgres>,
    translator: Arc<dyn PlaceholderTranslator>,
}

impl DbTransaction {
    pub async fn execute(&mut self, statement: &Statement) -> Result<RowSet, StoreError> {
        run_statement(&mut self.tx, self.translator.as_ref(), statement, None).await
    }

    pub async fn execute_many(&mut self, statements: &[Statement]) -> Result<Vec<RowSet>, StoreError> {
        run_batch(&mut self.tx, self.translator.as_ref(), statements).await
    }

    /// Commit the transaction
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::Connection)
    }

    /// Rollback the transaction
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(StoreError::Connection)
    }
}

#[async_trait]
impl StatementExecutor for DbTransaction {
    async fn execute(&mut self, statement: &Statement) -> Result<RowSet, StoreError> {
        DbTransaction::execute(self, statement).await
    }

    async fn execute_many(&mut self, statements: &[Statement]) -> Result<Vec<RowSet>, StoreError> {
        DbTransaction::execute_many(self, statements).await
    }
}

/// Rows completed before a failure, for the error log
enum Progress {
    Single,
    Batch { completed: usize, total: usize },
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Single => f.write_str("none"),
            Progress::Batch { completed, total } => {
                write!(f, "{} of {} statements completed", completed, total)
            }
        }
    }
}

async fn run_statement(
    conn: &mut PgConnection,
    translator: &dyn PlaceholderTranslator,
    statement: &Statement,
    batch: Option<(usize, usize)>,
) -> Result<RowSet, StoreError> {
    let sql = translator.translate(statement.template());
    let progress = match batch {
        Some((completed, total)) => Progress::Batch { completed, total },
        None => Progress::Single,
    };

    #[cfg(feature = "debug-logging")]
    tracing::trace!(statement = %sql, params = ?statement.params(), "executing statement");

    let rows = match bind_all(sqlx::query(&sql), statement.params())
        .fetch_all(&mut *conn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                statement = statement.template(),
                translated = %sql,
                params = ?statement.params(),
                result = %progress,
                error = %e,
                "statement failed"
            );
            return Err(StoreError::from_statement(statement.template(), statement.params(), e));
        }
    };

    rows.iter()
        .map(Row::from_pg_row)
        .collect::<Result<RowSet, _>>()
        .inspect_err(|e| {
            tracing::error!(
                statement = statement.template(),
                params = ?statement.params(),
                result = %progress,
                error = %e,
                "statement result could not be decoded"
            );
        })
}

async fn run_batch(
    conn: &mut PgConnection,
    translator: &dyn PlaceholderTranslator,
    statements: &[Statement],
) -> Result<Vec<RowSet>, StoreError> {
    let mut results = Vec::with_capacity(statements.len());

    for statement in statements {
        let batch = Some((results.len(), statements.len()));
        results.push(run_statement(conn, translator, statement, batch).await?);
    }

    Ok(results)
}
