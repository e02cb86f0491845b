#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::Value;
use tower::ServiceExt;

use diveclub::{
    AppState,
    config::DatabaseConfig,
    database,
    entities::{EquipmentType, dive, equipment, member},
    operations::{
        dives::{self, DivePayload},
        equipment::{self as items, EquipmentPayload},
        members::{self, MemberPayload},
    },
    routes,
};

pub const PER_PAGE: u64 = 10;

fn test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let config = DatabaseConfig {
        url: test_database_url(),
        max_connections: 1,
    };
    let db = database::connect(&config).await?;
    database::migrate(&db).await?;
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    routes::app(AppState::new(db, PER_PAGE))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }

    /// Number of data rows in the rendered list table.
    pub fn table_rows(&self) -> usize {
        self.body.matches("<tr><td>").count()
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_form(app: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

pub async fn create_member(db: &DatabaseConnection, first: &str, last: &str, email: &str) -> member::Model {
    members::create(
        db,
        MemberPayload {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            certification: "Open Water".to_string(),
        },
    )
    .await
    .expect("Failed to create member")
}

pub async fn create_dive(db: &DatabaseConnection, member_id: i32, location: &str, date: &str) -> dive::Model {
    dives::create(
        db,
        DivePayload {
            member_id,
            location: location.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            depth: Decimal::new(1850, 2),
            duration: 45,
        },
    )
    .await
    .expect("Failed to create dive")
}

pub async fn create_equipment(
    db: &DatabaseConnection,
    name: &str,
    equipment_type: EquipmentType,
    member_id: Option<i32>,
) -> equipment::Model {
    items::create(
        db,
        EquipmentPayload {
            name: name.to_string(),
            equipment_type,
            is_functional: true,
            member_id,
        },
    )
    .await
    .expect("Failed to create equipment")
}
