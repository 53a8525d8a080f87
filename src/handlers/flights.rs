use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::{flight, reservation};
use crate::error::{AppError, AppResult, SchedulingError};
use crate::services::capacity;
use crate::services::scheduling::{self, FlightSchedule};
use crate::utils::fields::require_text;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub flight_number: String,
    pub departure: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub airplane: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFlightRequest {
    pub flight_number: Option<String>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub airplane: Option<i32>,
}

impl From<CreateFlightRequest> for UpdateFlightRequest {
    fn from(full: CreateFlightRequest) -> Self {
        Self {
            flight_number: Some(full.flight_number),
            departure: Some(full.departure),
            destination: Some(full.destination),
            departure_time: Some(full.departure_time),
            arrival_time: Some(full.arrival_time),
            airplane: Some(full.airplane),
        }
    }
}

/// Query parameters accepted by the flight listing
#[derive(Debug, Default, Deserialize)]
pub struct FlightFilter {
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<NaiveDate>,
    pub arrival_time: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct FlightStatusResponse {
    pub flight: i32,
    pub flight_number: String,
    pub capacity: i32,
    pub reservations: u64,
    pub is_full: bool,
    pub has_conflict: bool,
}

/// A flight's validated field values, ready to be written.
#[derive(Debug, Clone)]
struct FlightDraft {
    flight_number: String,
    departure: String,
    destination: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    airplane_id: i32,
}

impl FlightDraft {
    fn new(payload: CreateFlightRequest) -> AppResult<Self> {
        Ok(Self {
            flight_number: require_text("flight_number", &payload.flight_number, 10)?,
            departure: require_text("departure", &payload.departure, 100)?,
            destination: require_text("destination", &payload.destination, 100)?,
            departure_time: payload.departure_time,
            arrival_time: payload.arrival_time,
            airplane_id: payload.airplane,
        })
    }

    fn merged(current: &flight::Model, changes: UpdateFlightRequest) -> AppResult<Self> {
        Self::new(CreateFlightRequest {
            flight_number: changes
                .flight_number
                .unwrap_or_else(|| current.flight_number.clone()),
            departure: changes.departure.unwrap_or_else(|| current.departure.clone()),
            destination: changes
                .destination
                .unwrap_or_else(|| current.destination.clone()),
            departure_time: changes
                .departure_time
                .unwrap_or_else(|| current.departure_time.with_timezone(&Utc)),
            arrival_time: changes
                .arrival_time
                .unwrap_or_else(|| current.arrival_time.with_timezone(&Utc)),
            airplane: changes.airplane.unwrap_or(current.airplane_id),
        })
    }

    fn schedule(&self) -> FlightSchedule {
        FlightSchedule::new(self.airplane_id, self.departure_time, self.arrival_time)
    }
}

/// Validates and writes a flight inside one transaction. The airplane row
/// stays locked until commit so concurrent writers for the same airplane
/// see each other's flights.
async fn save_flight(
    db: &DatabaseConnection,
    current: Option<flight::Model>,
    draft: FlightDraft,
) -> AppResult<flight::Model> {
    let schedule = draft.schedule();
    if !schedule.window.is_ordered() {
        return Err(SchedulingError::InvalidTimeOrder.into());
    }

    let txn = db.begin().await?;
    scheduling::lock_airplane(&txn, draft.airplane_id).await?;

    let exclude_id = current.as_ref().map(|f| f.id);

    let mut number_query =
        flight::Entity::find().filter(flight::Column::FlightNumber.eq(draft.flight_number.as_str()));
    if let Some(id) = exclude_id {
        number_query = number_query.filter(flight::Column::Id.ne(id));
    }
    if number_query.one(&txn).await?.is_some() {
        return Err(AppError::Conflict(
            "A flight with this flight number already exists".to_string(),
        ));
    }

    scheduling::validate_flight_timing(&txn, &schedule, exclude_id).await?;

    let mut active: flight::ActiveModel = match current {
        Some(existing) => existing.into(),
        None => <flight::ActiveModel as Default>::default(),
    };
    active.flight_number = Set(draft.flight_number);
    active.departure = Set(draft.departure);
    active.destination = Set(draft.destination);
    active.departure_time = Set(draft.departure_time.fixed_offset());
    active.arrival_time = Set(draft.arrival_time.fixed_offset());
    active.airplane_id = Set(draft.airplane_id);

    let saved = match exclude_id {
        Some(_) => active.update(&txn).await,
        None => active.insert(&txn).await,
    }
    .map_err(scheduling::translate_write_error)?;

    txn.commit().await?;
    Ok(saved)
}

async fn find_flight(state: &AppState, id: i32) -> AppResult<flight::Model> {
    flight::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
}

/// First instant of `date` (UTC) and the first instant of the next day
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::default()).and_utc();
    let end = start
        .checked_add_signed(Duration::days(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}

fn icontains(column: flight::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

fn apply_filter(mut query: Select<flight::Entity>, filter: FlightFilter) -> Select<flight::Entity> {
    if let Some(departure) = filter.departure.filter(|s| !s.is_empty()) {
        query = query.filter(icontains(flight::Column::Departure, &departure));
    }

    if let Some(destination) = filter.destination.filter(|s| !s.is_empty()) {
        query = query.filter(icontains(flight::Column::Destination, &destination));
    }

    if let Some(date) = filter.departure_time {
        let (start, end) = day_bounds(date);
        query = query
            .filter(flight::Column::DepartureTime.gte(start.fixed_offset()))
            .filter(flight::Column::DepartureTime.lt(end.fixed_offset()));
    }

    if let Some(date) = filter.arrival_time {
        let (start, end) = day_bounds(date);
        query = query
            .filter(flight::Column::ArrivalTime.gte(start.fixed_offset()))
            .filter(flight::Column::ArrivalTime.lt(end.fixed_offset()));
    }

    query
}

/// List flights, optionally filtered by route and date
pub async fn list_flights(
    State(state): State<AppState>,
    Query(filter): Query<FlightFilter>,
) -> AppResult<Json<Vec<flight::Model>>> {
    let flights = apply_filter(flight::Entity::find(), filter)
        .order_by_asc(flight::Column::DepartureTime)
        .order_by_asc(flight::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(flights))
}

pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<flight::Model>> {
    Ok(Json(find_flight(&state, id).await?))
}

/// Schedule a new flight
pub async fn create_flight(
    State(state): State<AppState>,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<(StatusCode, Json<flight::Model>)> {
    let draft = FlightDraft::new(payload)?;
    let result = save_flight(&state.db, None, draft).await?;

    tracing::info!(
        flight_id = result.id,
        flight_number = %result.flight_number,
        airplane_id = result.airplane_id,
        "Flight scheduled"
    );
    Ok((StatusCode::CREATED, Json(result)))
}

/// Full update (PUT)
pub async fn replace_flight(
    state: State<AppState>,
    id: Path<i32>,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<Json<flight::Model>> {
    update_flight(state, id, Json(payload.into())).await
}

/// Partial update (PATCH)
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFlightRequest>,
) -> AppResult<Json<flight::Model>> {
    let current = find_flight(&state, id).await?;
    let draft = FlightDraft::merged(&current, payload)?;
    let result = save_flight(&state.db, Some(current), draft).await?;

    Ok(Json(result))
}

/// Delete a flight and its reservations
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let result = flight::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Flight not found".to_string()));
    }

    tracing::info!(flight_id = id, "Flight deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Reservations held on one flight
pub async fn flight_reservations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<reservation::Model>>> {
    let flight = find_flight(&state, id).await?;

    let reservations = reservation::Entity::find()
        .filter(reservation::Column::FlightId.eq(flight.id))
        .order_by_asc(reservation::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(reservations))
}

/// Capacity and schedule health of a flight
pub async fn flight_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<FlightStatusResponse>> {
    let flight = find_flight(&state, id).await?;
    let load = capacity::flight_load(&state.db, &flight).await?;
    let has_conflict =
        scheduling::has_conflict(&state.db, &FlightSchedule::of(&flight), Some(flight.id)).await?;

    Ok(Json(FlightStatusResponse {
        flight: flight.id,
        flight_number: flight.flight_number,
        capacity: load.capacity,
        reservations: load.reservations,
        is_full: load.is_full(),
        has_conflict,
    }))
}
