use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use crate::db::unique_violation;
use crate::entities::{flight, reservation};
use crate::error::{AdmissionError, AppError, AppResult};
use crate::services::capacity;
use crate::services::scheduling::{self, FlightSchedule};
use crate::utils::reservation_code::generate_code;

pub const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub passenger_name: String,
    pub passenger_email: String,
    pub flight_id: i32,
    pub status: bool,
}

/// Gate applied before a flight takes another reservation.
pub async fn admit_reservation<C: ConnectionTrait>(db: &C, flight: &flight::Model) -> AppResult<()> {
    if capacity::is_full(db, flight).await? {
        return Err(AdmissionError::FlightFull.into());
    }

    if scheduling::has_conflict(db, &FlightSchedule::of(flight), Some(flight.id)).await? {
        return Err(AdmissionError::ScheduleConflict.into());
    }

    Ok(())
}

/// Loads the flight and holds its row lock until the surrounding
/// transaction ends, so admission and insert happen as one step.
pub async fn lock_flight<C: ConnectionTrait>(db: &C, flight_id: i32) -> AppResult<flight::Model> {
    flight::Entity::find_by_id(flight_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid flight".to_string()))
}

/// Draws codes from `generate` until one is not stored yet, giving up
/// after `MAX_CODE_ATTEMPTS` draws.
pub async fn unused_code<C, G>(db: &C, mut generate: G) -> AppResult<String>
where
    C: ConnectionTrait,
    G: FnMut() -> String,
{
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate();
        let taken = reservation::Entity::find()
            .filter(reservation::Column::ReservationCode.eq(code.as_str()))
            .count(db)
            .await?;

        if taken == 0 {
            return Ok(code);
        }
        tracing::warn!(code = %code, "Reservation code already taken, regenerating");
    }

    Err(AdmissionError::CodeCollision.into())
}

/// A unique violation on insert means another writer took the code
/// between the check and the insert.
pub fn translate_insert_error(err: DbErr) -> AppError {
    match unique_violation(&err) {
        Some(_) => AppError::Admission(AdmissionError::CodeCollision),
        None => AppError::Database(err),
    }
}

/// Admits and stores a reservation, assigning its code and creation time.
pub async fn place_reservation(
    db: &DatabaseConnection,
    new: NewReservation,
) -> AppResult<reservation::Model> {
    let txn = db.begin().await?;

    let flight = lock_flight(&txn, new.flight_id).await?;
    admit_reservation(&txn, &flight).await?;

    let code = unused_code(&txn, generate_code).await?;
    let record = reservation::ActiveModel {
        passenger_name: Set(new.passenger_name),
        passenger_email: Set(new.passenger_email),
        reservation_code: Set(code),
        flight_id: Set(flight.id),
        status: Set(new.status),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };

    let saved = record.insert(&txn).await.map_err(translate_insert_error)?;

    txn.commit().await?;

    tracing::info!(
        reservation_code = %saved.reservation_code,
        flight_id = saved.flight_id,
        "Reservation placed"
    );
    Ok(saved)
}
