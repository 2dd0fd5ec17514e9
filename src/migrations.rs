//! Schema of the catalog tables.
//!
//! Table and column names follow the `ad.db` layout: `AdUnits` and `Creatives` with capitalized columns.
pub mod creative;
pub mod placement;

use sea_orm_migration::prelude::*;

pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(placement::Migration), Box::new(creative::Migration)]
    }
}
