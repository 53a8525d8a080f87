//! Flight schedule validation against the other flights of an airplane.
//!
//! Three distinct tests are applied:
//! * exact duplicate of `(airplane, departure, arrival)`, also guarded by
//!   the `unique_airplane_schedule` index
//! * strict overlap, rejected when a flight is saved
//! * buffered overlap (one hour either side), reported by [`has_conflict`]
//!   and consulted before taking reservations

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Select,
};

use crate::db::unique_violation;
use crate::entities::{airplane, flight};
use crate::error::{AppError, AppResult, SchedulingError};
use crate::utils::schedule::TimeWindow;

/// The slice of a flight the schedule rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightSchedule {
    pub airplane_id: i32,
    pub window: TimeWindow,
}

impl FlightSchedule {
    pub fn new(airplane_id: i32, departure: DateTime<Utc>, arrival: DateTime<Utc>) -> Self {
        Self {
            airplane_id,
            window: TimeWindow::new(departure, arrival),
        }
    }

    pub fn of(flight: &flight::Model) -> Self {
        Self::new(
            flight.airplane_id,
            flight.departure_time.with_timezone(&Utc),
            flight.arrival_time.with_timezone(&Utc),
        )
    }
}

fn same_airplane(airplane_id: i32, exclude_id: Option<i32>) -> Select<flight::Entity> {
    let query = flight::Entity::find().filter(flight::Column::AirplaneId.eq(airplane_id));
    match exclude_id {
        Some(id) => query.filter(flight::Column::Id.ne(id)),
        None => query,
    }
}

/// Flights of `airplane_id` whose window strictly intersects `window`.
pub async fn count_schedule_matches<C: ConnectionTrait>(
    db: &C,
    airplane_id: i32,
    window: TimeWindow,
    exclude_id: Option<i32>,
) -> Result<u64, DbErr> {
    same_airplane(airplane_id, exclude_id)
        .filter(flight::Column::DepartureTime.lt(window.end.fixed_offset()))
        .filter(flight::Column::ArrivalTime.gt(window.start.fixed_offset()))
        .count(db)
        .await
}

/// Flights of `airplane_id` flying exactly `window`.
pub async fn count_exact_schedule<C: ConnectionTrait>(
    db: &C,
    airplane_id: i32,
    window: TimeWindow,
    exclude_id: Option<i32>,
) -> Result<u64, DbErr> {
    same_airplane(airplane_id, exclude_id)
        .filter(flight::Column::DepartureTime.eq(window.start.fixed_offset()))
        .filter(flight::Column::ArrivalTime.eq(window.end.fixed_offset()))
        .count(db)
        .await
}

/// Runs the save-time rules for `candidate`. `exclude_id` is the flight's
/// own id when updating, so it never conflicts with itself.
pub async fn validate_flight_timing<C: ConnectionTrait>(
    db: &C,
    candidate: &FlightSchedule,
    exclude_id: Option<i32>,
) -> AppResult<()> {
    if !candidate.window.is_ordered() {
        return Err(SchedulingError::InvalidTimeOrder.into());
    }

    if count_exact_schedule(db, candidate.airplane_id, candidate.window, exclude_id).await? > 0 {
        return Err(SchedulingError::DuplicateSchedule.into());
    }

    if count_schedule_matches(db, candidate.airplane_id, candidate.window, exclude_id).await? > 0 {
        return Err(SchedulingError::ScheduleOverlap.into());
    }

    Ok(())
}

/// Advisory check: another flight of the airplane lies within an hour of
/// the candidate's window.
pub async fn has_conflict<C: ConnectionTrait>(
    db: &C,
    candidate: &FlightSchedule,
    exclude_id: Option<i32>,
) -> AppResult<bool> {
    let matches = count_schedule_matches(
        db,
        candidate.airplane_id,
        candidate.window.buffered(),
        exclude_id,
    )
    .await?;

    Ok(matches > 0)
}

/// Loads the airplane and holds its row lock until the surrounding
/// transaction ends, serializing schedule writes per airplane.
pub async fn lock_airplane<C: ConnectionTrait>(db: &C, airplane_id: i32) -> AppResult<airplane::Model> {
    airplane::Entity::find_by_id(airplane_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid airplane".to_string()))
}

/// Maps a failed flight insert/update onto the domain error it stands for.
pub fn translate_write_error(err: DbErr) -> AppError {
    match unique_violation(&err) {
        Some(msg) if msg.contains("flight_number") => {
            AppError::Conflict("A flight with this flight number already exists".to_string())
        }
        Some(_) => SchedulingError::DuplicateSchedule.into(),
        None => AppError::Database(err),
    }
}
