mod common;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::collections::VecDeque;

use airline_booking_backend::entities::{airplane, flight, reservation};
use airline_booking_backend::services::scheduling::{
    count_schedule_matches, has_conflict, translate_write_error, validate_flight_timing,
    FlightSchedule,
};
use airline_booking_backend::services::{admission, capacity};
use airline_booking_backend::utils::schedule::TimeWindow;
use airline_booking_backend::{AdmissionError, AppError, SchedulingError};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
}

async fn insert_airplane(db: &DatabaseConnection, tail_number: &str, capacity: i32) -> airplane::Model {
    airplane::ActiveModel {
        tail_number: Set(tail_number.to_string()),
        model: Set("Boeing 737-800".to_string()),
        capacity: Set(capacity),
        production_year: Set(2012),
        status: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

fn flight_row(
    flight_number: &str,
    airplane_id: i32,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> flight::ActiveModel {
    flight::ActiveModel {
        flight_number: Set(flight_number.to_string()),
        departure: Set("Istanbul".to_string()),
        destination: Set("Ankara".to_string()),
        departure_time: Set(departure.fixed_offset()),
        arrival_time: Set(arrival.fixed_offset()),
        airplane_id: Set(airplane_id),
        ..Default::default()
    }
}

async fn insert_flight(
    db: &DatabaseConnection,
    flight_number: &str,
    airplane_id: i32,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> flight::Model {
    flight_row(flight_number, airplane_id, departure, arrival)
        .insert(db)
        .await
        .unwrap()
}

fn reservation_row(flight_id: i32, code: &str) -> reservation::ActiveModel {
    reservation::ActiveModel {
        passenger_name: Set("Ada".to_string()),
        passenger_email: Set("ada@example.com".to_string()),
        reservation_code: Set(code.to_string()),
        flight_id: Set(flight_id),
        status: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
}

async fn insert_reservation(db: &DatabaseConnection, flight_id: i32, code: &str) {
    reservation_row(flight_id, code).insert(db).await.unwrap();
}

/// Generator replaying a fixed list of codes
fn replay(codes: &[&str]) -> impl FnMut() -> String {
    let mut queue: VecDeque<String> = codes.iter().map(|c| c.to_string()).collect();
    move || queue.pop_front().expect("generator ran dry")
}

fn scheduling_error(result: Result<(), AppError>) -> Option<SchedulingError> {
    match result {
        Err(AppError::Scheduling(e)) => Some(e),
        _ => None,
    }
}

#[tokio::test]
async fn test_validate_flight_timing_rules() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    let reversed = FlightSchedule::new(plane.id, at(12, 0), at(10, 0));
    assert_eq!(
        scheduling_error(validate_flight_timing(&db, &reversed, None).await),
        Some(SchedulingError::InvalidTimeOrder)
    );

    let duplicate = FlightSchedule::new(plane.id, at(10, 0), at(12, 0));
    assert_eq!(
        scheduling_error(validate_flight_timing(&db, &duplicate, None).await),
        Some(SchedulingError::DuplicateSchedule)
    );

    let overlapping = FlightSchedule::new(plane.id, at(11, 0), at(13, 0));
    assert_eq!(
        scheduling_error(validate_flight_timing(&db, &overlapping, None).await),
        Some(SchedulingError::ScheduleOverlap)
    );

    let touching = FlightSchedule::new(plane.id, at(12, 0), at(13, 0));
    assert!(validate_flight_timing(&db, &touching, None).await.is_ok());
    assert!(has_conflict(&db, &touching, None).await.unwrap());

    let clear = FlightSchedule::new(plane.id, at(13, 0), at(14, 0));
    assert!(validate_flight_timing(&db, &clear, None).await.is_ok());
    assert!(!has_conflict(&db, &clear, None).await.unwrap());
}

#[tokio::test]
async fn test_own_id_is_excluded() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    let shifted = FlightSchedule::new(plane.id, at(10, 30), at(12, 30));
    assert!(validate_flight_timing(&db, &shifted, Some(flight.id)).await.is_ok());
    assert!(validate_flight_timing(&db, &shifted, None).await.is_err());

    let same = FlightSchedule::of(&flight);
    assert!(validate_flight_timing(&db, &same, Some(flight.id)).await.is_ok());
    assert!(!has_conflict(&db, &same, Some(flight.id)).await.unwrap());
}

#[tokio::test]
async fn test_other_airplanes_are_ignored() {
    let db = common::test_db().await;
    let first = insert_airplane(&db, "TC-JRO", 10).await;
    let second = insert_airplane(&db, "TC-JRP", 10).await;
    insert_flight(&db, "TK100", first.id, at(10, 0), at(12, 0)).await;

    let window = TimeWindow::new(at(10, 0), at(12, 0));
    assert_eq!(count_schedule_matches(&db, first.id, window, None).await.unwrap(), 1);
    assert_eq!(count_schedule_matches(&db, second.id, window, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_is_full_boundary() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 3).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    insert_reservation(&db, flight.id, "AAAAAAAAA1").await;
    insert_reservation(&db, flight.id, "AAAAAAAAA2").await;
    assert!(!capacity::is_full(&db, &flight).await.unwrap());

    insert_reservation(&db, flight.id, "AAAAAAAAA3").await;
    assert!(capacity::is_full(&db, &flight).await.unwrap());

    match admission::admit_reservation(&db, &flight).await {
        Err(AppError::Admission(e)) => assert_eq!(e, AdmissionError::FlightFull),
        other => panic!("expected FlightFull, got {:?}", other),
    }
}

#[tokio::test]
async fn test_admission_rechecks_buffered_schedule() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(11, 0)).await;
    assert!(admission::admit_reservation(&db, &flight).await.is_ok());

    insert_flight(&db, "TK101", plane.id, at(11, 0), at(12, 0)).await;
    match admission::admit_reservation(&db, &flight).await {
        Err(AppError::Admission(e)) => assert_eq!(e, AdmissionError::ScheduleConflict),
        other => panic!("expected ScheduleConflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_place_reservation_assigns_code() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 2).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    let new = admission::NewReservation {
        passenger_name: "Ada".to_string(),
        passenger_email: "ada@example.com".to_string(),
        flight_id: flight.id,
        status: true,
    };

    let first = admission::place_reservation(&db, new.clone()).await.unwrap();
    let second = admission::place_reservation(&db, new.clone()).await.unwrap();
    assert_ne!(first.reservation_code, second.reservation_code);
    assert_eq!(first.reservation_code.len(), 10);

    assert!(matches!(
        admission::place_reservation(&db, new).await,
        Err(AppError::Admission(AdmissionError::FlightFull))
    ));
}

#[tokio::test]
async fn test_duplicate_schedule_write_is_translated() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    let err = flight_row("TK200", plane.id, at(10, 0), at(12, 0))
        .insert(&db)
        .await
        .unwrap_err();

    match translate_write_error(err) {
        AppError::Scheduling(e) => assert_eq!(e, SchedulingError::DuplicateSchedule),
        other => panic!("expected DuplicateSchedule, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_flight_number_write_is_translated() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;

    let err = flight_row("TK100", plane.id, at(14, 0), at(15, 0))
        .insert(&db)
        .await
        .unwrap_err();

    assert!(matches!(translate_write_error(err), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_taken_code_is_regenerated() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;
    insert_reservation(&db, flight.id, "AAAAAAAAAA").await;

    let code = admission::unused_code(&db, replay(&["AAAAAAAAAA", "BBBBBBBBBB"]))
        .await
        .unwrap();
    assert_eq!(code, "BBBBBBBBBB");
}

#[tokio::test]
async fn test_code_attempts_are_bounded() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;
    insert_reservation(&db, flight.id, "AAAAAAAAAA").await;

    let mut draws = 0;
    let result = admission::unused_code(&db, || {
        draws += 1;
        "AAAAAAAAAA".to_string()
    })
    .await;

    assert!(matches!(
        result,
        Err(AppError::Admission(AdmissionError::CodeCollision))
    ));
    assert_eq!(draws, admission::MAX_CODE_ATTEMPTS);
}

#[tokio::test]
async fn test_duplicate_code_insert_is_translated() {
    let db = common::test_db().await;
    let plane = insert_airplane(&db, "TC-JRO", 10).await;
    let flight = insert_flight(&db, "TK100", plane.id, at(10, 0), at(12, 0)).await;
    insert_reservation(&db, flight.id, "AAAAAAAAAA").await;

    let err = reservation_row(flight.id, "AAAAAAAAAA")
        .insert(&db)
        .await
        .unwrap_err();

    assert!(matches!(
        admission::translate_insert_error(err),
        AppError::Admission(AdmissionError::CodeCollision)
    ));
}
