use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "creatives_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Creatives::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Creatives::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Creatives::Format).text().not_null())
                    .col(ColumnDef::new(Creatives::Width).integer().not_null())
                    .col(ColumnDef::new(Creatives::Height).integer().not_null())
                    .col(ColumnDef::new(Creatives::Content).text().not_null())
                    // REAL affinity; a NUMERIC column would hand whole prices back as integers.
                    .col(ColumnDef::new(Creatives::Price).double().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Creatives::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum Creatives {
    #[iden = "Creatives"]
    Table,
    #[iden = "ID"]
    Id,
    #[iden = "Format"]
    Format,
    #[iden = "Width"]
    Width,
    #[iden = "Height"]
    Height,
    #[iden = "Content"]
    Content,
    #[iden = "Price"]
    Price,
}
