use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::EntityTrait;
use sea_orm::IntoActiveModel;
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::instrument;

use crate::driver::DatabaseDriver;
use crate::entity::creative;
use crate::entity::placement;
use crate::entity::AdPlacement;
use crate::entity::Creative;
use crate::migrations::Migrator;
use crate::traits::CatalogStore;
use crate::types::CatalogError;
use crate::types::EntityKind;
use crate::types::Result;
use crate::types::StoreOp;

/// [`CatalogStore`] over a SeaORM connection.
#[derive(Debug)]
pub struct DbStore<D>
where
    D: DatabaseDriver,
{
    driver:       Arc<D>,
    // Set once the migrations went through in this process.
    schema_ready: OnceCell<()>,
}

impl<D> DbStore<D>
where
    D: DatabaseDriver,
{
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            schema_ready: OnceCell::new(),
        }
    }

    pub fn driver(&self) -> Arc<D> {
        Arc::clone(&self.driver)
    }

    pub async fn close(&self) -> Result<()> {
        self.driver.checkpoint().await?;
        self.driver
            .connection()
            .close()
            .await
            .map_err(|err| CatalogError::store(StoreOp::Close, err))
    }
}

#[async_trait]
impl<D> CatalogStore for DbStore<D>
where
    D: DatabaseDriver,
{
    #[instrument(level = "debug", skip(self))]
    async fn create_schema(&self) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                let db = self.driver.connection();
                Migrator::up(&db, None)
                    .await
                    .map_err(|err| CatalogError::store(StoreOp::CreateSchema, err))?;
                debug!("Catalog schema is in place on {}", self.driver.name());
                Ok::<_, CatalogError>(())
            })
            .await?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, placement), fields(id = %placement.id))]
    async fn insert_placement(&self, placement: &AdPlacement) -> Result<()> {
        placement::Entity::insert(placement.clone().into_active_model())
            .exec_without_returning(&self.driver.connection())
            .await
            .map_err(|err| CatalogError::from_insert(EntityKind::Placement, &placement.id, err))?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, creative), fields(id = %creative.id))]
    async fn insert_creative(&self, creative: &Creative) -> Result<()> {
        creative::Entity::insert(creative.clone().into_active_model())
            .exec_without_returning(&self.driver.connection())
            .await
            .map_err(|err| CatalogError::from_insert(EntityKind::Creative, &creative.id, err))?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    async fn load_all_placements(&self) -> Result<Vec<AdPlacement>> {
        placement::Entity::find()
            .all(&self.driver.connection())
            .await
            .map_err(|err| CatalogError::store(StoreOp::Load(EntityKind::Placement), err))
    }

    #[instrument(level = "trace", skip(self))]
    async fn load_all_creatives(&self) -> Result<Vec<Creative>> {
        creative::Entity::find()
            .all(&self.driver.connection())
            .await
            .map_err(|err| CatalogError::store(StoreOp::Load(EntityKind::Creative), err))
    }
}
