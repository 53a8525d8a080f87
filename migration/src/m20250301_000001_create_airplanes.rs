use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Airplane::Table)
                    .if_not_exists()
                    .col(pk_auto(Airplane::Id))
                    .col(string_len(Airplane::TailNumber, 10).not_null().unique_key())
                    .col(string_len(Airplane::Model, 50).not_null())
                    .col(integer(Airplane::Capacity).not_null())
                    .col(integer(Airplane::ProductionYear).not_null())
                    .col(boolean(Airplane::Status).not_null().default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Airplane::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Airplane {
    Table,
    Id,
    TailNumber,
    Model,
    Capacity,
    ProductionYear,
    Status,
}
