use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000002_create_flights::Flight;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(pk_auto(Reservation::Id))
                    .col(string_len(Reservation::PassengerName, 100).not_null())
                    .col(string_len(Reservation::PassengerEmail, 254).not_null())
                    .col(string_len(Reservation::ReservationCode, 10).not_null().unique_key())
                    .col(integer(Reservation::FlightId).not_null())
                    .col(boolean(Reservation::Status).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Reservation::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_flight")
                            .from(Reservation::Table, Reservation::FlightId)
                            .to(Flight::Table, Flight::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reservation {
    Table,
    Id,
    PassengerName,
    PassengerEmail,
    ReservationCode,
    FlightId,
    Status,
    CreatedAt,
}
