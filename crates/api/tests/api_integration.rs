//! API integration tests.
//!
//! Each test drives the full router over a private in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use lapor_api::{AppState, app};
use lapor_db::{
    entities::{report::ReportStatus, user, user::UserRole},
    test_utils::{TestDatabase, fixtures},
};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    db: TestDatabase,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let db = TestDatabase::new().await.unwrap();
        let router = app(AppState::new(db.shared()));
        Self { db, router }
    }

    /// A user of the given role with a bearer token.
    async fn login(&self, role: UserRole, unit_work_id: Option<&str>) -> (user::Model, String) {
        let user = fixtures::user(self.db.connection(), "Tester", role, unit_work_id)
            .await
            .unwrap();
        let token = fixtures::token(self.db.connection(), &user.id).await.unwrap();
        (user, token)
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn report_body(category_id: &str) -> Value {
    json!({
        "title": "Jalan berlubang",
        "description": "Lubang besar di tengah jalan",
        "address": "Jl. Merdeka 1",
        "latitude": "-6.2",
        "longitude": "106.8",
        "category": category_id,
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/nothing-here", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"]["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_signup_then_signin_then_me() {
    let app = TestApp::new().await;

    let response = app
        .send(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"name": "Siti", "email": "Siti@Example.com", "password": "rahasia123"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("password").is_none());

    let response = app
        .send(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({"email": "siti@example.com", "password": "rahasia123"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = app.send("GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Siti");

    let response = app
        .send("POST", "/api/auth/signout", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send("GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_reports_every_invalid_field() {
    let app = TestApp::new().await;

    let response = app
        .send(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"name": "Al", "email": "not-an-email", "password": "short"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["data"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["data"]["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/users/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send("GET", "/api/users/me", Some("bogus-token"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_management_is_admin_only() {
    let app = TestApp::new().await;
    let (_, user_token) = app.login(UserRole::User, None).await;
    let (_, admin_token) = app.login(UserRole::Admin, None).await;
    let body = json!({"name": "Jalan", "image": "jalan.png"});

    let response = app
        .send("POST", "/api/categories", Some(&user_token), Some(body.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send("POST", "/api/categories", Some(&admin_token), Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.send("GET", "/api/categories/list", None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .send("DELETE", &format!("/api/categories/{id}"), Some(&admin_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_report_lifecycle_over_http() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let unit = fixtures::unit_work(app.db.connection(), "Dinas PU").await.unwrap();
    let (reporter, user_token) = app.login(UserRole::User, None).await;
    let (_, admin_token) = app.login(UserRole::Admin, None).await;
    let (officer, officer_token) = app.login(UserRole::Officer, Some(&unit.id)).await;

    let response = app
        .send("POST", "/api/reports", Some(&user_token), Some(report_body(&category.id)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "Menunggu");
    assert_eq!(body["data"]["imageReport"], json!([]));
    let report_id = body["data"]["id"].as_str().unwrap().to_string();

    let assign = json!({"report_id": report_id, "unit_work_id": unit.id});
    let response = app
        .send("POST", "/api/reports/assign", Some(&user_token), Some(assign.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let response = app
            .send("POST", "/api/reports/assign", Some(&admin_token), Some(assign.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "Diproses");
    }

    let done = json!({"id_report": report_id, "message": "Sudah ditambal", "imageReport": ["after.jpg"]});
    let response = app
        .send("POST", "/api/reports/officer/done", Some(&user_token), Some(done.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send("POST", "/api/reports/officer/done", Some(&officer_token), Some(done))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "Selesai");

    let response = app
        .send("GET", &format!("/api/reports/{report_id}"), Some(&user_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["reporter"]["name"], reporter.name);
    assert_eq!(body["data"]["unitWorks"]["name"], "Dinas PU");
    assert_eq!(body["data"]["officer"]["id"], officer.id);
    assert_eq!(body["data"]["officerReport"]["message"], "Sudah ditambal");

    let response = app
        .send(
            "GET",
            &format!("/api/reports/officer/{}", officer.id),
            Some(&user_token),
            None,
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_complete_requires_evidence_images() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let (reporter, _) = app.login(UserRole::User, None).await;
    let (_, officer_token) = app.login(UserRole::Officer, None).await;
    let report = fixtures::report(
        app.db.connection(),
        "Lampu mati",
        ReportStatus::Processing,
        &category.id,
        &reporter.id,
        None,
    )
    .await
    .unwrap();

    let response = app
        .send(
            "POST",
            "/api/reports/officer/done",
            Some(&officer_token),
            Some(json!({"id_report": report.id, "message": "Selesai"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["data"]["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_report_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.login(UserRole::User, None).await;

    let response = app
        .send("GET", "/api/reports/does-not-exist", Some(&token), None)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reporter_listing_filters_by_status() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let (reporter, token) = app.login(UserRole::User, None).await;
    for (title, status) in [
        ("Sampah menumpuk", ReportStatus::Waiting),
        ("Banjir di gang", ReportStatus::Done),
    ] {
        fixtures::report(
            app.db.connection(),
            title,
            status,
            &category.id,
            &reporter.id,
            None,
        )
        .await
        .unwrap();
    }

    let uri = format!("/api/reports/user/{}?status=Selesai", reporter.id);
    let body = body_json(app.send("GET", &uri, Some(&token), None).await).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Banjir di gang");

    let uri = format!("/api/reports/user/{}?status=Hilang", reporter.id);
    let response = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/reports/user/{}?limit=1&skip=1", reporter.id);
    let body = body_json(app.send("GET", &uri, Some(&token), None).await).await;
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_comment_and_delete_report() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let (reporter, owner_token) = app.login(UserRole::User, None).await;
    let (_, stranger_token) = app.login(UserRole::User, None).await;
    let report = fixtures::report(
        app.db.connection(),
        "Pohon tumbang",
        ReportStatus::Waiting,
        &category.id,
        &reporter.id,
        None,
    )
    .await
    .unwrap();

    let response = app
        .send(
            "POST",
            "/api/comments",
            Some(&stranger_token),
            Some(json!({"id_report": report.id, "message": "Saya juga lihat"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["data"]["id"].is_string());

    let uri = format!("/api/reports/{}", report.id);
    let response = app.send("DELETE", &uri, Some(&stranger_token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send("DELETE", &uri, Some(&owner_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send("GET", &uri, Some(&owner_token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unit_work_cascade_over_http() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let (_, admin_token) = app.login(UserRole::Admin, None).await;

    let response = app
        .send(
            "POST",
            "/api/unit-works",
            Some(&admin_token),
            Some(json!({"name": "Dinas Kebersihan", "detail": "Sampah dan taman"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["image"], json!([]));
    let unit_id = body["data"]["id"].as_str().unwrap().to_string();

    let (officer, _) = app.login(UserRole::Officer, Some(&unit_id)).await;
    fixtures::report(
        app.db.connection(),
        "Sampah liar",
        ReportStatus::Processing,
        &category.id,
        &officer.id,
        Some(&unit_id),
    )
    .await
    .unwrap();

    let uri = format!("/api/unit-works/{unit_id}");
    let response = app.send("DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!({"users": 1, "reports": 1}));

    let response = app.send("DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_summary_and_coordinates() {
    let app = TestApp::new().await;
    let category = fixtures::category(app.db.connection(), "Jalan").await.unwrap();
    let (reporter, _) = app.login(UserRole::User, None).await;
    for (title, status) in [
        ("Menunggu satu", ReportStatus::Waiting),
        ("Diproses satu", ReportStatus::Processing),
        ("Selesai satu", ReportStatus::Done),
    ] {
        fixtures::report(
            app.db.connection(),
            title,
            status,
            &category.id,
            &reporter.id,
            None,
        )
        .await
        .unwrap();
    }

    let body = body_json(app.send("GET", "/api/dashboard/summary", None, None).await).await;
    assert_eq!(
        body["data"],
        json!({"Menunggu": 1, "Diproses": 1, "Selesai": 1, "Ditolak": 0})
    );

    let body = body_json(app.send("GET", "/api/dashboard/coordinates", None, None).await).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(!titles.contains(&"Menunggu satu"));
}
