use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "ad_units_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdUnits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdUnits::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(AdUnits::Format).text().not_null())
                    .col(ColumnDef::new(AdUnits::Width).integer().not_null())
                    .col(ColumnDef::new(AdUnits::Height).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AdUnits::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum AdUnits {
    #[iden = "AdUnits"]
    Table,
    #[iden = "ID"]
    Id,
    #[iden = "Format"]
    Format,
    #[iden = "Width"]
    Width,
    #[iden = "Height"]
    Height,
}
