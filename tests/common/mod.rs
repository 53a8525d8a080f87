#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use airline_booking_backend::{routes, AppState, Config};

/// Fresh in-memory database with all migrations applied. One pooled
/// connection keeps the same in-memory database for the whole test.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("failed to open sqlite");
    Migrator::up(&db, None).await.expect("failed to migrate");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        rate_limit_per_second: 1,
        rate_limit_burst: 100,
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = test_db().await;
        let router = routes::create_router(AppState {
            db: db.clone(),
            config: test_config(),
        });
        Self { router, db }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates an airplane and returns its id
    pub async fn airplane(&self, tail_number: &str, capacity: i32) -> i64 {
        let (status, body) = self
            .post(
                "/airplanes/",
                serde_json::json!({
                    "tail_number": tail_number,
                    "model": "Airbus A320",
                    "capacity": capacity,
                    "production_year": 2018,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    /// Creates a flight on 2025-03-01 between the given hours
    pub async fn flight(&self, flight_number: &str, airplane: i64, from: &str, to: &str) -> (StatusCode, Value) {
        self.post(
            "/flights/",
            serde_json::json!({
                "flight_number": flight_number,
                "departure": "Istanbul",
                "destination": "Ankara",
                "departure_time": at(from),
                "arrival_time": at(to),
                "airplane": airplane,
            }),
        )
        .await
    }

    pub async fn reserve(&self, flight: i64, name: &str) -> (StatusCode, Value) {
        self.post(
            "/reservations/",
            serde_json::json!({
                "passenger_name": name,
                "passenger_email": format!("{}@example.com", name.to_lowercase()),
                "flight": flight,
            }),
        )
        .await
    }
}

/// `"10:00"` on the fixed test day, as RFC 3339
pub fn at(time: &str) -> String {
    format!("2025-03-01T{}:00Z", time)
}
