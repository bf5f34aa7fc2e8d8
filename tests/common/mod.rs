#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use actix_http::Request;
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::env;
use tempfile::TempDir;

use spots_be::config::Config;
use spots_be::database::init_database;
use spots_be::AppState;

/// A migrated SQLite database in a temporary directory plus the app state built on it.
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
    pub state: AppState,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite://{}/test.db", temp_dir.path().display());

        let config = Config {
            database_url: database_url.clone(),
            ..Config::test_config()
        };

        let pool = init_database(&database_url).await?;
        let state = AppState::new(pool.clone(), config.clone());

        Ok(TestContext {
            pool,
            config,
            state,
            _temp_dir: temp_dir,
        })
    }
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// `today + days` formatted the way the API expects dates.
pub fn day(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub cookie: Cookie<'static>,
}

pub fn signup_body(username: &str) -> Value {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    json!({
        "firstName": first_name,
        "lastName": last_name,
        "email": format!("{}@example.com", username),
        "username": username,
        "password": "password123",
    })
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|c| c.name() == "token")
        .map(|c| c.into_owned())
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
}

pub async fn signup<S, B>(app: &S, username: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(signup_body(username))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "signup of {} failed", username);

    let cookie = session_cookie(&res).expect("signup should set the session cookie");
    let body: Value = test::read_body_json(res).await;

    TestUser {
        id: body["user"]["id"].as_i64().expect("user id"),
        username: username.to_string(),
        cookie,
    }
}

pub fn spot_body(name: &str, lat: f64, lng: f64, price: f64) -> Value {
    json!({
        "address": "123 Disney Lane",
        "city": "San Francisco",
        "state": "California",
        "country": "United States of America",
        "lat": lat,
        "lng": lng,
        "name": name,
        "description": "Place where web developers are created",
        "price": price,
    })
}

pub async fn create_spot<S, B>(app: &S, owner: &TestUser, body: Value) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/spots")
        .cookie(owner.cookie.clone())
        .set_json(body)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "spot creation failed: {}", body);
    body["id"].as_i64().expect("spot id")
}

pub async fn create_default_spot<S, B>(app: &S, owner: &TestUser) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    create_spot(app, owner, spot_body("App Academy", 37.76, -122.47, 123.0)).await
}

pub async fn book<S, B>(
    app: &S,
    guest: &TestUser,
    spot_id: i64,
    start: &str,
    end: &str,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/spots/{}/bookings", spot_id))
        .cookie(guest.cookie.clone())
        .set_json(json!({ "startDate": start, "endDate": end }))
        .to_request();
    send(app, req).await
}

pub async fn create_review<S, B>(
    app: &S,
    author: &TestUser,
    spot_id: i64,
    stars: i64,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/spots/{}/reviews", spot_id))
        .cookie(author.cookie.clone())
        .set_json(json!({ "review": "This was an awesome spot!", "stars": stars }))
        .to_request();
    send(app, req).await
}

/// Inserts a booking directly, bypassing the date rules of the API.
pub async fn insert_booking(
    pool: &SqlitePool,
    spot_id: i64,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO bookings (spot_id, user_id, start_date, end_date, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id
        "#,
    )
    .bind(spot_id)
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar::<_, i64>(&query)
        .fetch_one(pool)
        .await
        .expect("Failed to count records")
}
