use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::db::unique_violation;
use crate::entities::{airplane, flight};
use crate::error::{AppError, AppResult};
use crate::utils::fields::{require_positive, require_text};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAirplaneRequest {
    pub tail_number: String,
    pub model: String,
    pub capacity: i32,
    pub production_year: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAirplaneRequest {
    pub tail_number: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub production_year: Option<i32>,
    pub status: Option<bool>,
}

/// PUT body: every field but `status` is required. An omitted `status`
/// keeps the stored value.
#[derive(Debug, Deserialize)]
pub struct ReplaceAirplaneRequest {
    pub tail_number: String,
    pub model: String,
    pub capacity: i32,
    pub production_year: i32,
    pub status: Option<bool>,
}

impl From<ReplaceAirplaneRequest> for UpdateAirplaneRequest {
    fn from(full: ReplaceAirplaneRequest) -> Self {
        Self {
            tail_number: Some(full.tail_number),
            model: Some(full.model),
            capacity: Some(full.capacity),
            production_year: Some(full.production_year),
            status: full.status,
        }
    }
}

fn default_status() -> bool {
    true
}

fn duplicate_tail_number() -> AppError {
    AppError::Conflict("An airplane with this tail number already exists".to_string())
}

async fn find_airplane(state: &AppState, id: i32) -> AppResult<airplane::Model> {
    airplane::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Airplane not found".to_string()))
}

/// List all airplanes
pub async fn list_airplanes(State(state): State<AppState>) -> AppResult<Json<Vec<airplane::Model>>> {
    let airplanes = airplane::Entity::find()
        .order_by_asc(airplane::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(airplanes))
}

pub async fn get_airplane(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<airplane::Model>> {
    Ok(Json(find_airplane(&state, id).await?))
}

/// Register a new airplane
pub async fn create_airplane(
    State(state): State<AppState>,
    Json(payload): Json<CreateAirplaneRequest>,
) -> AppResult<(StatusCode, Json<airplane::Model>)> {
    let tail_number = require_text("tail_number", &payload.tail_number, 10)?;
    let model = require_text("model", &payload.model, 50)?;
    let capacity = require_positive("capacity", payload.capacity)?;

    let taken = airplane::Entity::find()
        .filter(airplane::Column::TailNumber.eq(tail_number.as_str()))
        .count(&state.db)
        .await?;
    if taken > 0 {
        return Err(duplicate_tail_number());
    }

    let airplane = airplane::ActiveModel {
        tail_number: Set(tail_number),
        model: Set(model),
        capacity: Set(capacity),
        production_year: Set(payload.production_year),
        status: Set(payload.status),
        ..Default::default()
    };

    let result = airplane.insert(&state.db).await.map_err(|e| match unique_violation(&e) {
        Some(_) => duplicate_tail_number(),
        None => AppError::Database(e),
    })?;

    tracing::info!(airplane_id = result.id, tail_number = %result.tail_number, "Airplane created");
    Ok((StatusCode::CREATED, Json(result)))
}

/// Full update (PUT)
pub async fn replace_airplane(
    state: State<AppState>,
    id: Path<i32>,
    Json(payload): Json<ReplaceAirplaneRequest>,
) -> AppResult<Json<airplane::Model>> {
    update_airplane(state, id, Json(payload.into())).await
}

/// Partial update (PATCH). The tail number identifies the airplane and
/// cannot be changed.
pub async fn update_airplane(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAirplaneRequest>,
) -> AppResult<Json<airplane::Model>> {
    let airplane = find_airplane(&state, id).await?;

    if let Some(tail_number) = &payload.tail_number {
        if tail_number.trim() != airplane.tail_number {
            return Err(AppError::BadRequest(
                "tail_number cannot be changed".to_string(),
            ));
        }
    }

    let mut active: airplane::ActiveModel = airplane.into();

    if let Some(model) = payload.model {
        active.model = Set(require_text("model", &model, 50)?);
    }

    if let Some(capacity) = payload.capacity {
        active.capacity = Set(require_positive("capacity", capacity)?);
    }

    if let Some(year) = payload.production_year {
        active.production_year = Set(year);
    }

    if let Some(status) = payload.status {
        active.status = Set(status);
    }

    let result = active.update(&state.db).await?;
    Ok(Json(result))
}

/// Delete an airplane along with its flights and their reservations
pub async fn delete_airplane(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let result = airplane::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Airplane not found".to_string()));
    }

    tracing::info!(airplane_id = id, "Airplane deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Flights flown by one airplane
pub async fn airplane_flights(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<flight::Model>>> {
    let airplane = find_airplane(&state, id).await?;

    let flights = flight::Entity::find()
        .filter(flight::Column::AirplaneId.eq(airplane.id))
        .order_by_asc(flight::Column::DepartureTime)
        .all(&state.db)
        .await?;

    Ok(Json(flights))
}
