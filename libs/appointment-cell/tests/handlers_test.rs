mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

use common::{seed_day, seed_doctor};

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

fn json_request(method: &str, uri: &str, bearer: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, bearer)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, bearer: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, bearer)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn booking_flow_over_http() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;

    let alice = TestUser::patient("alice@mail.test");
    let bob = TestUser::patient("bob@mail.test");
    let alice_auth = JwtTestUtils::bearer(&alice, &config.jwt_secret);
    let bob_auth = JwtTestUtils::bearer(&bob, &config.jwt_secret);
    let doctor_auth = JwtTestUtils::bearer(&doctor, &config.jwt_secret);

    // Field names used by the booking form are accepted as aliases.
    let form = json!({
        "doctorId": doctor.id,
        "availabilitySlotId": day.id,
        "date": "2025-09-01",
        "time": "10:00 AM",
        "name": "Alice Smith",
        "email": "alice@mail.test",
        "phoneNo": "0712345678",
        "symptoms": "Headache"
    });

    let (status, booked) = send(
        appointment_routes(state.clone()),
        json_request("POST", "/", &alice_auth, form.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booked["status"], "pending");
    assert_eq!(booked["time"], "10:00 AM");
    assert_eq!(booked["patientName"], "Alice Smith");
    let appointment_id = booked["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        appointment_routes(state.clone()),
        json_request("POST", "/", &bob_auth, form.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, listed) = send(
        appointment_routes(state.clone()),
        get_request("/doctor?status=pending", &doctor_auth),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["appointments"][0]["id"], appointment_id.as_str());

    let (status, confirmed) = send(
        appointment_routes(state.clone()),
        json_request(
            "PUT",
            &format!("/{}/status", appointment_id),
            &doctor_auth,
            json!({ "status": "confirmed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, cancelled) = send(
        appointment_routes(state.clone()),
        json_request(
            "PUT",
            &format!("/{}/cancel", appointment_id),
            &alice_auth,
            json!({ "reason": "Travelling" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["cancellationReason"], "Travelling");

    let (status, _) = send(
        appointment_routes(state.clone()),
        json_request("POST", "/", &bob_auth, form),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cancel_accepts_an_empty_body() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let alice = TestUser::patient("alice@mail.test");
    let alice_auth = JwtTestUtils::bearer(&alice, &config.jwt_secret);

    let (_, booked) = send(
        appointment_routes(state.clone()),
        json_request(
            "POST",
            "/",
            &alice_auth,
            json!({
                "doctorId": doctor.id,
                "availabilityId": day.id,
                "date": "2025-09-01",
                "time": "10:00 AM",
                "patientName": "Alice",
                "patientEmail": "alice@mail.test",
                "patientPhone": "0712345678",
                "symptoms": "Cough"
            }),
        ),
    )
    .await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}/cancel", booked["id"].as_str().unwrap()))
        .header(AUTHORIZATION, &alice_auth)
        .body(Body::empty())
        .unwrap();
    let (status, cancelled) = send(appointment_routes(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert!(cancelled["cancellationReason"].is_null());
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let alice = TestUser::patient("alice@mail.test");

    let (status, body) = send(
        appointment_routes(state),
        json_request(
            "POST",
            "/",
            &JwtTestUtils::bearer(&alice, &config.jwt_secret),
            json!({
                "doctorId": doctor.id,
                "availabilityId": day.id,
                "date": "2025-09-01",
                "time": "10:00 AM"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn undecodable_bodies_are_bad_requests_with_an_error_field() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let alice_auth = JwtTestUtils::bearer(&TestUser::patient("alice@mail.test"), &config.jwt_secret);
    let doctor_auth = JwtTestUtils::bearer(&doctor, &config.jwt_secret);

    let (status, body) = send(
        appointment_routes(state.clone()),
        json_request(
            "POST",
            "/",
            &alice_auth,
            json!({
                "doctorId": doctor.id,
                "availabilityId": day.id,
                "date": "2025-09-01",
                "patientName": "Alice",
                "patientEmail": "alice@mail.test",
                "patientPhone": "0712345678",
                "symptoms": "Headache"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("time"));

    let (status, body) = send(
        appointment_routes(state),
        json_request(
            "PUT",
            &format!("/{}/status", day.id),
            &doctor_auth,
            json!({ "reason": "no status" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_listing_requires_admin() {
    let config = TestConfig::default();
    let state = config.to_state();
    let alice = TestUser::patient("alice@mail.test");
    let admin = TestUser::admin("admin@clinic.test");

    let (status, _) = send(
        appointment_routes(state.clone()),
        get_request("/", &JwtTestUtils::bearer(&alice, &config.jwt_secret)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        appointment_routes(state.clone()),
        get_request("/?search=nobody", &JwtTestUtils::bearer(&admin, &config.jwt_secret)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, _) = send(
        appointment_routes(state),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
