pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_airplanes;
mod m20250301_000002_create_flights;
mod m20250301_000003_create_reservations;
mod m20250302_000001_add_flight_schedule_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_airplanes::Migration),
            Box::new(m20250301_000002_create_flights::Migration),
            Box::new(m20250301_000003_create_reservations::Migration),
            Box::new(m20250302_000001_add_flight_schedule_indexes::Migration),
        ]
    }
}
