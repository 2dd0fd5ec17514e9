//! Database drivers.
#[cfg(feature = "pg")]
pub mod pg;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::fmt::Debug;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::types::Result;

/// A connection to one of the supported [backends](self#modules).
#[async_trait]
pub trait DatabaseDriver: Debug + Sync + Send + 'static {
    /// Return driver name.
    fn name(&self) -> &'static str;
    /// Returns the database connection for the driver. Connections are pooled, cloning is cheap.
    fn connection(&self) -> DatabaseConnection;
    /// Apply backend-specific connection settings. See corresponding driver implementation for details.
    async fn configure(&self) -> Result<()>;
    /// Flush whatever the backend keeps aside before the connection goes away.
    async fn checkpoint(&self) -> Result<()>;
}
