use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{airplane, flight, reservation};
use crate::error::{AppError, AppResult};

/// Seats on a flight versus bookings held against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightLoad {
    pub capacity: i32,
    pub reservations: u64,
}

impl FlightLoad {
    pub fn is_full(&self) -> bool {
        capacity_reached(self.reservations, self.capacity)
    }
}

pub fn capacity_reached(reservations: u64, capacity: i32) -> bool {
    reservations >= u64::try_from(capacity).unwrap_or(0)
}

/// Every stored reservation counts, whatever its status flag says.
pub async fn reservation_count<C: ConnectionTrait>(db: &C, flight_id: i32) -> Result<u64, DbErr> {
    reservation::Entity::find()
        .filter(reservation::Column::FlightId.eq(flight_id))
        .count(db)
        .await
}

pub async fn flight_load<C: ConnectionTrait>(db: &C, flight: &flight::Model) -> AppResult<FlightLoad> {
    let airplane = airplane::Entity::find_by_id(flight.airplane_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Airplane of flight {} not found", flight.id)))?;

    Ok(FlightLoad {
        capacity: airplane.capacity,
        reservations: reservation_count(db, flight.id).await?,
    })
}

pub async fn is_full<C: ConnectionTrait>(db: &C, flight: &flight::Model) -> AppResult<bool> {
    Ok(flight_load(db, flight).await?.is_full())
}
