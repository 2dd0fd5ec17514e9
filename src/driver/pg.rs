use std::time::Duration;

use async_trait::async_trait;
use fieldx::fxstruct;
use sea_orm::ConnectOptions;
use sea_orm::DatabaseConnection;
use tracing::debug;

use super::DatabaseDriver;
use crate::types::CatalogError;
use crate::types::Result;
use crate::types::StoreOp;

/// PostgreSQL driver. Build it, then [`connect`](Pg::connect) before handing it over to a store.
#[derive(Debug)]
#[fxstruct(sync, rc, no_new, builder)]
pub struct Pg {
    host:     String,
    port:     u16,
    user:     String,
    password: String,
    database: String,
    #[fieldx(inner_mut, get(off), set, builder(off))]
    connection: DatabaseConnection,
}

impl Pg {
    pub async fn connect(&self) -> Result<()> {
        let url = format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        );
        debug!("Connecting to postgres://{}@{}:{}/{}", self.user, self.host, self.port, self.database);

        let mut opts = ConnectOptions::new(&url);
        opts.max_connections(16)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .test_before_acquire(true);

        self.set_connection(
            sea_orm::Database::connect(opts)
                .await
                .map_err(|err| CatalogError::store(StoreOp::Connect, err))?,
        );

        Ok(())
    }
}

#[async_trait]
impl DatabaseDriver for Pg {
    fn name(&self) -> &'static str {
        "pg"
    }

    fn connection(&self) -> DatabaseConnection {
        self.connection.read().clone()
    }

    /// Verifies the server answers; the pool is configured at connect time.
    async fn configure(&self) -> Result<()> {
        self.connection()
            .ping()
            .await
            .map_err(|err| CatalogError::store(StoreOp::Configure, err))
    }

    async fn checkpoint(&self) -> Result<()> {
        Ok(())
    }
}
