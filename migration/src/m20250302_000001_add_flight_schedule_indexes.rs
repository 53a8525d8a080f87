use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_flights::Flight;
use super::m20250301_000003_create_reservations::Reservation;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One airplane can't fly the exact same window twice
        manager
            .create_index(
                Index::create()
                    .name("unique_airplane_schedule")
                    .table(Flight::Table)
                    .col(Flight::AirplaneId)
                    .col(Flight::DepartureTime)
                    .col(Flight::ArrivalTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flight_airplane_id")
                    .table(Flight::Table)
                    .col(Flight::AirplaneId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_flight_id")
                    .table(Reservation::Table)
                    .col(Reservation::FlightId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservation_flight_id")
                    .table(Reservation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_flight_airplane_id")
                    .table(Flight::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("unique_airplane_schedule")
                    .table(Flight::Table)
                    .to_owned(),
            )
            .await
    }
}
