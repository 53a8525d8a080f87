use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_airplanes::Airplane;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Flight::Table)
                    .if_not_exists()
                    .col(pk_auto(Flight::Id))
                    .col(string_len(Flight::FlightNumber, 10).not_null().unique_key())
                    .col(string_len(Flight::Departure, 100).not_null())
                    .col(string_len(Flight::Destination, 100).not_null())
                    .col(timestamp_with_time_zone(Flight::DepartureTime).not_null())
                    .col(timestamp_with_time_zone(Flight::ArrivalTime).not_null())
                    .col(integer(Flight::AirplaneId).not_null())
                    // check_departure_before_arrival
                    .check(Expr::col(Flight::DepartureTime).lt(Expr::col(Flight::ArrivalTime)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_airplane")
                            .from(Flight::Table, Flight::AirplaneId)
                            .to(Airplane::Table, Airplane::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Flight::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Flight {
    Table,
    Id,
    FlightNumber,
    Departure,
    Destination,
    DepartureTime,
    ArrivalTime,
    AirplaneId,
}
