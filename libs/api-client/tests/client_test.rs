use assert_matches::assert_matches;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api_client::{ClientError, ClinicClient, Session};
use appointment_cell::models::{AppointmentListQuery, BookAppointmentRequest};
use shared_models::appointment::AppointmentStatus;
use shared_models::auth::Role;

fn session_json(id: Uuid, role: &str) -> Value {
    json!({
        "token": "signed.jwt.token",
        "user": {
            "id": id,
            "email": "maya@mail.test",
            "role": role,
            "fullName": "Maya Okafor"
        }
    })
}

fn appointment_json(id: Uuid, status: &str) -> Value {
    json!({
        "id": id,
        "appointmentCode": "APT-7XK2Q9A",
        "doctorId": Uuid::new_v4(),
        "patientId": Uuid::new_v4(),
        "availabilityId": Uuid::new_v4(),
        "date": "2025-09-01",
        "time": "10:00 AM",
        "patientName": "Maya Okafor",
        "patientEmail": "maya@mail.test",
        "patientPhone": "+1 555 010 2000",
        "symptoms": "",
        "doctorName": "Ann Lee",
        "department": "Cardiology",
        "status": status,
        "cancellationReason": null,
        "createdAt": "2025-08-20T09:00:00Z",
        "updatedAt": "2025-08-20T09:00:00Z"
    })
}

async fn logged_in(server: &MockServer) -> (ClinicClient, Session) {
    let client = ClinicClient::new(&server.uri()).unwrap();
    Mock::given(method("POST"))
        .and(path("/patients/login"))
        .and(body_json(json!({ "email": "maya@mail.test", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(Uuid::new_v4(), "patient")))
        .mount(server)
        .await;

    let session = client.login_patient("maya@mail.test", "secret1").await.unwrap();
    (client, session)
}

#[tokio::test]
async fn login_yields_a_session_used_as_bearer() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    assert_eq!(session.user.role, Role::Patient);
    assert_eq!(session.user.full_name.as_deref(), Some("Maya Okafor"));

    let appointment_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/appointments/{}", appointment_id)))
        .and(header("authorization", "Bearer signed.jwt.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json(appointment_id, "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let appointment = client.get_appointment(&session, appointment_id).await.unwrap();
    assert_eq!(appointment.id, appointment_id);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.time.label(), "10:00 AM");

    client.logout(session);
}

#[tokio::test]
async fn wrong_credentials_are_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/doctors/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid email or password" })),
        )
        .mount(&server)
        .await;

    let client = ClinicClient::new(&server.uri()).unwrap();
    let result = client.login_doctor("ann@clinic.test", "nope").await;

    assert_eq!(result, Err(ClientError::Auth("Invalid email or password".to_string())));
}

#[tokio::test]
async fn taken_slot_is_a_conflict() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "Time slot is already booked" })))
        .mount(&server)
        .await;

    let request = BookAppointmentRequest {
        doctor_id: Uuid::new_v4(),
        availability_id: Uuid::new_v4(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        time: "10:00 AM".to_string(),
        patient_name: "Maya Okafor".to_string(),
        patient_email: "maya@mail.test".to_string(),
        patient_phone: "+1 555 010 2000".to_string(),
        symptoms: String::new(),
    };
    let result = client.book_appointment(&session, &request).await;

    assert_matches!(result, Err(ClientError::Conflict(msg)) if msg == "Time slot is already booked");
}

#[tokio::test]
async fn directory_listing_passes_filters_and_unwraps_items() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .and(query_param("specialization", "cardiology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "doctors": [{
                "id": doctor_id,
                "fullName": "Ann Lee",
                "specialization": "Cardiology",
                "profileImageUrl": null,
                "bio": null
            }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let client = ClinicClient::new(&server.uri()).unwrap();
    let doctors = client.list_doctors(Some("cardiology"), None).await.unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].id, doctor_id);
    assert_eq!(doctors[0].full_name, "Ann Lee");
}

#[tokio::test]
async fn status_filter_is_sent_as_query() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/appointments/patient"))
        .and(query_param("status", "cancelled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointments": [appointment_json(Uuid::new_v4(), "cancelled")],
            "total": 1
        })))
        .mount(&server)
        .await;

    let query = AppointmentListQuery {
        status: Some("cancelled".to_string()),
        ..AppointmentListQuery::default()
    };
    let appointments = client.patient_appointments(&session, &query).await.unwrap();

    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn status_update_sends_wire_name() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    let appointment_id = Uuid::new_v4();
    Mock::given(method("PUT"))
        .and(path(format!("/appointments/{}/status", appointment_id)))
        .and(body_json(json!({ "status": "no-show", "reason": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json(appointment_id, "no-show")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_appointment_status(&session, appointment_id, AppointmentStatus::NoShow, None)
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::NoShow);
}

#[tokio::test]
async fn validation_and_missing_resources_are_distinguished() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    let missing = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/patients/{}", missing)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Patient not found" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/availability/".to_string() + &missing.to_string()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid time slot label: 'soon'" })))
        .mount(&server)
        .await;

    assert_matches!(client.get_patient(&session, missing).await, Err(ClientError::NotFound(_)));
    assert_matches!(
        client.update_time_slots(&session, missing, vec!["soon".to_string()]).await,
        Err(ClientError::Validation(_))
    );
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = ClinicClient::new(&server.uri()).unwrap();
    let result = client.health().await;

    assert_eq!(
        result,
        Err(ClientError::Server {
            status: 502,
            message: "bad gateway".to_string()
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ClinicClient::new("http://127.0.0.1:1").unwrap();
    let result = client.list_doctors(None, None).await;

    assert_matches!(result, Err(ClientError::Network(_)));
}

#[tokio::test]
async fn verify_reports_invalid_tokens_as_false() {
    let server = MockServer::start().await;
    let (client, session) = logged_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": false })))
        .mount(&server)
        .await;

    assert!(!client.verify_token(&session).await.unwrap());
}
