use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::NewDoctor;
use doctor_cell::router::{availability_routes, doctor_routes};
use doctor_cell::services::DoctorService;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn profile_requires_a_token() {
    let state = TestConfig::default().to_state();
    let app = doctor_routes(state);

    let (status, body) = send(
        app,
        Request::builder().uri("/profile").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn doctor_schedules_and_public_reads_it() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = TestUser::doctor("ann@clinic.test");
    DoctorService::new(&state)
        .create_doctor(
            doctor.id,
            NewDoctor {
                full_name: "Ann Lee".to_string(),
                email: doctor.email.clone(),
                specialization: "Cardiology".to_string(),
                ..NewDoctor::default()
            },
        )
        .await
        .unwrap();

    let (status, body) = send(
        availability_routes(state.clone()),
        Request::builder()
            .method("POST")
            .uri("/")
            .header(AUTHORIZATION, JwtTestUtils::bearer(&doctor, &config.jwt_secret))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "startDate": "2025-09-01",
                    "endDate": "2025-09-02",
                    "timeSlots": ["10:00 AM", "11:00 AM"]
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (status, body) = send(
        availability_routes(state.clone()),
        Request::builder()
            .uri(format!("/doctor/{}?startDate=2025-09-02&endDate=2025-09-30", doctor.id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["availability"][0]["date"], "2025-09-02");

    let (status, body) = send(
        doctor_routes(state.clone()),
        Request::builder()
            .uri("/profile")
            .header(AUTHORIZATION, JwtTestUtils::bearer(&doctor, &config.jwt_secret))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ann@clinic.test");
}

#[tokio::test]
async fn patients_cannot_publish_availability() {
    let config = TestConfig::default();
    let state = config.to_state();
    let patient = TestUser::patient("pat@clinic.test");

    let (status, _) = send(
        availability_routes(state),
        Request::builder()
            .method("POST")
            .uri("/")
            .header(AUTHORIZATION, JwtTestUtils::bearer(&patient, &config.jwt_secret))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "startDate": "2025-09-01", "timeSlots": ["10:00 AM"] }).to_string(),
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn directory_reads_through_postgrest() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::default().to_supabase_state(&mock_server.uri());
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("is_active", "eq.true"))
        .and(query_param("specialization", "ilike.cardiology"))
        .and(query_param("order", "full_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_row(doctor_id, "Ann Lee", "Cardiology")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        doctor_routes(state),
        Request::builder()
            .uri("/?specialization=cardiology")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["id"], doctor_id.to_string());
}

#[tokio::test]
async fn upstream_failures_surface_as_bad_gateway() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::default().to_supabase_state(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            MockSupabaseResponses::error_response("JWT expired", "PGRST301"),
        ))
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        doctor_routes(state),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("rejected credentials"));
}
