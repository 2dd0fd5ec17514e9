use std::ops::Deref;
use std::path::Path;

use async_trait::async_trait;
use fieldx::fxstruct;
use sea_orm::ConnectionTrait;
use sea_orm::DatabaseConnection;
use tracing::debug;

use super::DatabaseDriver;
use crate::types::CatalogError;
use crate::types::Result;
use crate::types::StoreOp;

/// SQLite driver. The database file is created if missing.
#[derive(Debug)]
#[fxstruct(sync, no_new)]
pub struct Sqlite {
    connection: DatabaseConnection,
}

impl Sqlite {
    pub async fn connect(db_path: &Path) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        debug!("Connecting to {url}");
        let connection = sea_orm::Database::connect(&url)
            .await
            .map_err(|err| CatalogError::store(StoreOp::Connect, err))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseDriver for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Switch the database to WAL so the refresh scans don't stall inserts.
    async fn configure(&self) -> Result<()> {
        let db = &self.connection;

        for pragma in ["PRAGMA journal_mode=WAL;", "PRAGMA synchronous=NORMAL;"] {
            db.execute_unprepared(pragma)
                .await
                .map_err(|err| CatalogError::store(StoreOp::Configure, err))?;
        }

        Ok(())
    }

    async fn checkpoint(&self) -> Result<()> {
        self.connection
            .execute_unprepared("PRAGMA wal_checkpoint;")
            .await
            .map_err(|err| CatalogError::store(StoreOp::Close, err))?;

        Ok(())
    }
}

impl Deref for Sqlite {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}
