//! Core ShareHaus functionality
//!
//! [`ShareHaus`] is built once at startup from an [`AppConfig`] and handed to
//! whatever serves requests. It owns the connection pool for the life of the
//! process; call [`close`](ShareHaus::close) once at shutdown.

use config::AppConfig;
use store_object::{Database, IdAllocator, SearchComposer, SearchSchema};

use crate::errors::ShareHausError;

/// Main coordinator holding the pool, the ID allocator, and the post search
#[derive(Debug, Clone)]
pub struct ShareHaus {
    db: Database,
    ids: IdAllocator,
    search: SearchComposer,
}

impl ShareHaus {
    /// Validate `config` and open the connection pool
    pub async fn open(config: &AppConfig) -> Result<Self, ShareHausError> {
        config.validate()?;

        let db = Database::connect(&config.database).await?;
        let haus = Self::with_database(db, config)?;

        debug_log!(
            max_connections = config.database.max_connections,
            id_length = config.ids.default_length,
            "ShareHaus opened"
        );

        Ok(haus)
    }

    /// Build around an already opened pool
    pub fn with_database(db: Database, config: &AppConfig) -> Result<Self, ShareHausError> {
        Ok(Self {
            db,
            ids: IdAllocator::new(&config.ids),
            search: SearchComposer::new(SearchSchema::posts())?,
        })
    }

    /// Get the execution engine
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Post search over this pool's schema
    pub fn search(&self) -> &SearchComposer {
        &self.search
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), ShareHausError> {
        self.db.health_check().await?;
        Ok(())
    }

    /// Close the pool; later calls are no-ops
    pub async fn close(&self) {
        self.db.close().await;
        debug_log!("ShareHaus closed");
    }
}
