mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use futures::future::join_all;

use appointment_cell::models::AppointmentListQuery;
use appointment_cell::services::{BookingService, ListScope};
use shared_database::repositories::AvailabilityRepository;
use shared_models::appointment::AppointmentStatus;
use shared_models::error::AppError;
use shared_utils::test_utils::{TestConfig, TestUser};

use common::{booking, seed_day, seed_doctor};

#[tokio::test]
async fn book_cancel_rebook_scenario() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);

    let patient_a = TestUser::patient("a@mail.test").to_user();
    let patient_b = TestUser::patient("b@mail.test").to_user();

    let a = service
        .book_appointment(&patient_a, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();
    assert_eq!(a.status, AppointmentStatus::Pending);
    assert_eq!(a.doctor_name, "Ann Lee");
    assert_eq!(a.department, "Cardiology");
    assert!(a.appointment_code.starts_with("APT-"));

    let slot_state = state.store.availability.get(day.id).await.unwrap().unwrap();
    let slot = slot_state.slot("10:00 AM".parse().unwrap()).unwrap();
    assert!(slot.is_booked);
    assert_eq!(slot.appointment_id, Some(a.id));
    assert_eq!(slot.patient_id, Some(patient_a.id));

    let b_first = service
        .book_appointment(&patient_b, booking(doctor.id, &day, "10:00 AM", "Bob"))
        .await;
    assert_matches!(b_first, Err(AppError::Conflict(_)));

    let cancelled = service
        .cancel_appointment(&patient_a, a.id, Some("Feeling better".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Feeling better"));

    let freed = state.store.availability.get(day.id).await.unwrap().unwrap();
    assert!(!freed.slot("10:00 AM".parse().unwrap()).unwrap().is_booked);

    let b = service
        .book_appointment(&patient_b, booking(doctor.id, &day, "10:00 AM", "Bob"))
        .await
        .unwrap();
    assert_eq!(b.status, AppointmentStatus::Pending);
    assert_ne!(b.appointment_code, a.appointment_code);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_yield_exactly_one_winner() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;

    let attempts = (0..16).map(|i| {
        let state = Arc::clone(&state);
        let request = booking(doctor.id, &day, "10:00 AM", &format!("Patient{}", i));
        tokio::spawn(async move {
            let patient = TestUser::patient(&format!("p{}@mail.test", i)).to_user();
            BookingService::new(&state).book_appointment(&patient, request).await
        })
    });

    let results: Vec<_> = join_all(attempts).await.into_iter().map(|r| r.unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results.iter().filter(|r| matches!(r, Err(AppError::Conflict(_)))).count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 15);

    let admin = TestUser::admin("admin@clinic.test").to_user();
    let all = BookingService::new(&state)
        .list_appointments(&admin, ListScope::All, AppointmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn invalid_patient_fields_change_nothing() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let patient = TestUser::patient("a@mail.test").to_user();

    let mut missing_name = booking(doctor.id, &day, "10:00 AM", "Alice");
    missing_name.patient_name = "   ".to_string();
    let mut bad_email = booking(doctor.id, &day, "10:00 AM", "Alice");
    bad_email.patient_email = "alice-at-mail".to_string();
    let mut bad_phone = booking(doctor.id, &day, "10:00 AM", "Alice");
    bad_phone.patient_phone = "call me".to_string();
    let mut no_symptoms = booking(doctor.id, &day, "10:00 AM", "Alice");
    no_symptoms.symptoms = String::new();
    let mut bad_time = booking(doctor.id, &day, "10:00 AM", "Alice");
    bad_time.time = "ten o'clock".to_string();

    for request in [missing_name, bad_email, bad_phone, no_symptoms, bad_time] {
        let result = service.book_appointment(&patient, request).await;
        assert_matches!(result, Err(AppError::ValidationError(_)));
    }

    let untouched = state.store.availability.get(day.id).await.unwrap().unwrap();
    assert!(!untouched.has_bookings());
    let mine = service
        .list_appointments(&patient, ListScope::Patient, AppointmentListQuery::default())
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn unresolvable_references_are_not_found() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let other = seed_doctor(&state, "Bob Cole", "Dermatology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let patient = TestUser::patient("a@mail.test").to_user();

    let unknown_doctor = booking(uuid::Uuid::new_v4(), &day, "10:00 AM", "Alice");
    let wrong_doctor = booking(other.id, &day, "10:00 AM", "Alice");
    let mut wrong_date = booking(doctor.id, &day, "10:00 AM", "Alice");
    wrong_date.date = common::date(2);
    let mut unknown_slot = booking(doctor.id, &day, "10:00 AM", "Alice");
    unknown_slot.availability_id = uuid::Uuid::new_v4();
    let unoffered_time = booking(doctor.id, &day, "3:00 PM", "Alice");

    for request in [unknown_doctor, wrong_doctor, wrong_date, unknown_slot, unoffered_time] {
        let result = service.book_appointment(&patient, request).await;
        assert_matches!(result, Err(AppError::NotFound(_)));
    }

    assert!(!state.store.availability.get(day.id).await.unwrap().unwrap().has_bookings());
}

#[tokio::test]
async fn only_patients_book() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;

    let result = BookingService::new(&state)
        .book_appointment(&doctor.to_user(), booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await;
    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn status_updates_follow_the_transition_graph() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let patient = TestUser::patient("a@mail.test").to_user();
    let doc = doctor.to_user();

    let a = service
        .book_appointment(&patient, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();

    // Patients cannot change status.
    let by_patient = service.update_status(&patient, a.id, "confirmed", None).await;
    assert_matches!(by_patient, Err(AppError::Forbidden(_)));

    // Skipping confirmation is not allowed.
    let skip = service.update_status(&doc, a.id, "completed", None).await;
    assert_matches!(skip, Err(AppError::ValidationError(_)));

    let unknown = service.update_status(&doc, a.id, "archived", None).await;
    assert_matches!(unknown, Err(AppError::ValidationError(_)));

    let confirmed = service.update_status(&doc, a.id, "confirmed", None).await.unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    // Same status again is a no-op.
    let again = service.update_status(&doc, a.id, "confirmed", None).await.unwrap();
    assert_eq!(again.status, AppointmentStatus::Confirmed);

    let no_show = service.update_status(&doc, a.id, "no-show", None).await.unwrap();
    assert_eq!(no_show.status, AppointmentStatus::NoShow);

    // No-show keeps the slot and is terminal.
    let back = service.update_status(&doc, a.id, "pending", None).await;
    assert_matches!(back, Err(AppError::ValidationError(_)));
    let cancel = service.cancel_appointment(&patient, a.id, None).await;
    assert_matches!(cancel, Err(AppError::ValidationError(_)));
    assert!(state.store.availability.get(day.id).await.unwrap().unwrap().has_bookings());
}

#[tokio::test]
async fn cancelling_through_status_releases_the_slot() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let patient = TestUser::patient("a@mail.test").to_user();
    let admin = TestUser::admin("admin@clinic.test").to_user();

    let a = service
        .book_appointment(&patient, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();

    let cancelled = service
        .update_status(&admin, a.id, "cancelled", Some("Doctor unavailable".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Doctor unavailable"));
    assert!(!state.store.availability.get(day.id).await.unwrap().unwrap().has_bookings());

    // Cancelling again is accepted.
    let twice = service.cancel_appointment(&patient, a.id, None).await.unwrap();
    assert_eq!(twice.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn a_second_cancel_does_not_free_someone_elses_booking() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let alice = TestUser::patient("a@mail.test").to_user();
    let bob = TestUser::patient("b@mail.test").to_user();

    let a = service
        .book_appointment(&alice, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();
    service.cancel_appointment(&alice, a.id, None).await.unwrap();
    let b = service
        .book_appointment(&bob, booking(doctor.id, &day, "10:00 AM", "Bob"))
        .await
        .unwrap();

    service.cancel_appointment(&alice, a.id, None).await.unwrap();

    let slot_state = state.store.availability.get(day.id).await.unwrap().unwrap();
    let slot = slot_state.slot("10:00 AM".parse().unwrap()).unwrap();
    assert!(slot.is_booked);
    assert_eq!(slot.appointment_id, Some(b.id));
}

#[tokio::test]
async fn cancel_and_view_are_limited_to_participants() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let other_doctor = seed_doctor(&state, "Bob Cole", "Dermatology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let alice = TestUser::patient("a@mail.test").to_user();
    let mallory = TestUser::patient("m@mail.test").to_user();

    let a = service
        .book_appointment(&alice, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();

    assert_matches!(service.get_appointment(&mallory, a.id).await, Err(AppError::Forbidden(_)));
    assert_matches!(
        service.get_appointment(&other_doctor.to_user(), a.id).await,
        Err(AppError::Forbidden(_))
    );
    assert_matches!(service.cancel_appointment(&mallory, a.id, None).await, Err(AppError::Forbidden(_)));
    assert_eq!(service.get_appointment(&doctor.to_user(), a.id).await.unwrap().id, a.id);
    assert_matches!(
        service.get_appointment(&alice, uuid::Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    );
}

#[tokio::test]
async fn listings_are_scoped_and_filterable() {
    let state = TestConfig::default().to_state();
    let ann = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let bob = seed_doctor(&state, "Bob Cole", "Dermatology").await;
    let ann_day = seed_day(&state, &ann, 1, &["09:00 AM", "10:00 AM"]).await;
    let bob_day = seed_day(&state, &bob, 1, &["09:00 AM"]).await;
    let service = BookingService::new(&state);
    let alice = TestUser::patient("alice@mail.test").to_user();
    let carol = TestUser::patient("carol@mail.test").to_user();
    let admin = TestUser::admin("admin@clinic.test").to_user();

    let a1 = service
        .book_appointment(&alice, booking(ann.id, &ann_day, "09:00 AM", "Alice"))
        .await
        .unwrap();
    service
        .book_appointment(&carol, booking(ann.id, &ann_day, "10:00 AM", "Carol"))
        .await
        .unwrap();
    service
        .book_appointment(&alice, booking(bob.id, &bob_day, "09:00 AM", "Alice"))
        .await
        .unwrap();
    service.update_status(&ann.to_user(), a1.id, "confirmed", None).await.unwrap();

    let ann_list = service
        .list_appointments(&ann.to_user(), ListScope::Doctor, AppointmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(ann_list.len(), 2);
    assert!(ann_list.iter().all(|a| a.doctor_id == ann.id));

    let alice_list = service
        .list_appointments(&alice, ListScope::Patient, AppointmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(alice_list.len(), 2);

    let confirmed = service
        .list_appointments(
            &admin,
            ListScope::All,
            AppointmentListQuery {
                status: Some("confirmed".to_string()),
                ..AppointmentListQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, a1.id);

    let by_doctor_name = service
        .list_appointments(
            &admin,
            ListScope::All,
            AppointmentListQuery {
                search: Some("cole".to_string()),
                ..AppointmentListQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_doctor_name.len(), 1);

    let by_code = service
        .list_appointments(
            &admin,
            ListScope::All,
            AppointmentListQuery {
                search: Some(a1.appointment_code.to_lowercase()),
                ..AppointmentListQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_code.len(), 1);

    let by_email = service
        .list_appointments(
            &admin,
            ListScope::All,
            AppointmentListQuery {
                search: Some("CAROL@".to_string()),
                ..AppointmentListQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);

    assert_matches!(
        service
            .list_appointments(&alice, ListScope::All, AppointmentListQuery::default())
            .await,
        Err(AppError::Forbidden(_))
    );
    assert_matches!(
        service
            .list_appointments(&alice, ListScope::Doctor, AppointmentListQuery::default())
            .await,
        Err(AppError::Forbidden(_))
    );
}

#[tokio::test]
async fn deleting_an_active_appointment_frees_its_slot() {
    let state = TestConfig::default().to_state();
    let doctor = seed_doctor(&state, "Ann Lee", "Cardiology").await;
    let day = seed_day(&state, &doctor, 1, &["10:00 AM"]).await;
    let service = BookingService::new(&state);
    let alice = TestUser::patient("a@mail.test").to_user();
    let admin = TestUser::admin("admin@clinic.test").to_user();

    let a = service
        .book_appointment(&alice, booking(doctor.id, &day, "10:00 AM", "Alice"))
        .await
        .unwrap();

    assert_matches!(service.delete_appointment(&alice, a.id).await, Err(AppError::Forbidden(_)));

    service.delete_appointment(&admin, a.id).await.unwrap();
    assert!(!state.store.availability.get(day.id).await.unwrap().unwrap().has_bookings());
    assert_matches!(service.get_appointment(&admin, a.id).await, Err(AppError::NotFound(_)));
    assert_matches!(service.delete_appointment(&admin, a.id).await, Err(AppError::NotFound(_)));
}
