use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;

use crate::entities::reservation;
use crate::error::{AppError, AppResult};
use crate::services::admission::{self, NewReservation};
use crate::utils::fields::{require_email, require_text};
use crate::AppState;

/// `reservation_code` and `created_at` are server-assigned; if a client
/// sends them they are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub passenger_name: String,
    pub passenger_email: String,
    pub flight: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReservationRequest {
    pub passenger_name: Option<String>,
    pub passenger_email: Option<String>,
    pub flight: Option<i32>,
    pub status: Option<bool>,
}

/// PUT body; an omitted `status` keeps the stored value.
#[derive(Debug, Deserialize)]
pub struct ReplaceReservationRequest {
    pub passenger_name: String,
    pub passenger_email: String,
    pub flight: i32,
    pub status: Option<bool>,
}

impl From<ReplaceReservationRequest> for UpdateReservationRequest {
    fn from(full: ReplaceReservationRequest) -> Self {
        Self {
            passenger_name: Some(full.passenger_name),
            passenger_email: Some(full.passenger_email),
            flight: Some(full.flight),
            status: full.status,
        }
    }
}

fn default_status() -> bool {
    true
}

async fn find_reservation(state: &AppState, id: i32) -> AppResult<reservation::Model> {
    reservation::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
}

pub async fn list_reservations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<reservation::Model>>> {
    let reservations = reservation::Entity::find()
        .order_by_asc(reservation::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(reservations))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<reservation::Model>> {
    Ok(Json(find_reservation(&state, id).await?))
}

/// Book a seat on a flight
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<reservation::Model>)> {
    let new = NewReservation {
        passenger_name: require_text("passenger_name", &payload.passenger_name, 100)?,
        passenger_email: require_email("passenger_email", &payload.passenger_email)?,
        flight_id: payload.flight,
        status: payload.status,
    };

    let result = admission::place_reservation(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Full update (PUT)
pub async fn replace_reservation(
    state: State<AppState>,
    id: Path<i32>,
    Json(payload): Json<ReplaceReservationRequest>,
) -> AppResult<Json<reservation::Model>> {
    update_reservation(state, id, Json(payload.into())).await
}

/// Partial update (PATCH). Moving a reservation to another flight goes
/// through admission again; the code and creation time never change.
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<reservation::Model>> {
    let current = find_reservation(&state, id).await?;
    let current_flight = current.flight_id;
    let mut active: reservation::ActiveModel = current.into();

    if let Some(name) = payload.passenger_name {
        active.passenger_name = Set(require_text("passenger_name", &name, 100)?);
    }

    if let Some(email) = payload.passenger_email {
        active.passenger_email = Set(require_email("passenger_email", &email)?);
    }

    if let Some(status) = payload.status {
        active.status = Set(status);
    }

    let txn = state.db.begin().await?;

    if let Some(flight_id) = payload.flight.filter(|id| *id != current_flight) {
        let flight = admission::lock_flight(&txn, flight_id).await?;
        admission::admit_reservation(&txn, &flight).await?;
        active.flight_id = Set(flight.id);

        tracing::info!(
            reservation_id = id,
            from_flight = current_flight,
            to_flight = flight.id,
            "Reservation moved to another flight"
        );
    }

    let result = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(result))
}

pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let result = reservation::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Reservation not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
