//! Enrollment lifecycle integration tests
//!
//! Requires a PostgreSQL database via `TEST_DATABASE_URL`; tests skip
//! themselves when it is not set.

mod helpers;

use assert_matches::assert_matches;
use helpers::database_helper::TestDatabase;
use helpers::test_data::{auth_context_for, seed_extracurricular, seed_user, test_services};
use serial_test::serial;
use sixkul::models::enrollment::EnrollmentStatus;
use sixkul::models::user::UserRole;
use sixkul::utils::errors::SixkulError;

#[tokio::test]
#[serial]
async fn test_application_is_pending_until_approved() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;

    let enrollment = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .expect("application should succeed");
    assert_eq!(enrollment.status(), EnrollmentStatus::Pending);

    let ctx = auth_context_for(pembina);
    let approved = services
        .enrollment_service
        .decide(&ctx, enrollment.id, true, None)
        .await
        .expect("approval should succeed");
    assert_eq!(approved.status(), EnrollmentStatus::Active);
    assert_eq!(approved.decided_by, Some(ctx.user_id()));
}

#[tokio::test]
#[serial]
async fn test_duplicate_application_is_rejected() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, None, 20).await;

    services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .expect("first application should succeed");

    let err = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::DuplicateEnrollment);
}

#[tokio::test]
#[serial]
async fn test_rejected_application_reopens_as_pending() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;

    let enrollment = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap();

    let ctx = auth_context_for(pembina);
    let rejected = services
        .enrollment_service
        .decide(&ctx, enrollment.id, false, Some("kuota kelas".to_string()))
        .await
        .unwrap();
    assert_eq!(rejected.status(), EnrollmentStatus::Rejected);

    // Applying again reuses the same row, back in the pending state.
    let reopened = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .expect("re-application should succeed");
    assert_eq!(reopened.id, enrollment.id);
    assert_eq!(reopened.status(), EnrollmentStatus::Pending);
    assert_eq!(reopened.note, None);
}

#[tokio::test]
#[serial]
async fn test_capacity_blocks_approval() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let first = seed_user(&tdb.db, UserRole::Siswa).await;
    let second = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 1).await;

    let ctx = auth_context_for(pembina);

    let e1 = services.enrollment_service.enroll(first.id, ekskul.id).await.unwrap();
    services.enrollment_service.decide(&ctx, e1.id, true, None).await.unwrap();

    // Applications are still accepted when full; approval is what's blocked.
    let e2 = services.enrollment_service.enroll(second.id, ekskul.id).await.unwrap();
    let err = services
        .enrollment_service
        .decide(&ctx, e2.id, true, None)
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::CapacityReached);

    // Rejection still works.
    let rejected = services
        .enrollment_service
        .decide(&ctx, e2.id, false, None)
        .await
        .unwrap();
    assert_eq!(rejected.status(), EnrollmentStatus::Rejected);
}

#[tokio::test]
#[serial]
async fn test_pembina_cannot_decide_for_another_activity() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let owner = seed_user(&tdb.db, UserRole::Pembina).await;
    let other = seed_user(&tdb.db, UserRole::Pembina).await;
    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(owner.id), 20).await;

    let enrollment = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap();

    let ctx = auth_context_for(other);
    let err = services
        .enrollment_service
        .decide(&ctx, enrollment.id, true, None)
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::PermissionDenied(_));
}

#[tokio::test]
#[serial]
async fn test_student_can_leave_their_own_enrollment() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;

    let enrollment = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap();
    let pembina_ctx = auth_context_for(pembina);
    services
        .enrollment_service
        .decide(&pembina_ctx, enrollment.id, true, None)
        .await
        .unwrap();

    let student_ctx = auth_context_for(student);
    let left = services
        .enrollment_service
        .deactivate(&student_ctx, enrollment.id, Some("pindah sekolah".to_string()))
        .await
        .expect("student should be able to leave");
    assert_eq!(left.status(), EnrollmentStatus::Inactive);

    // Another student cannot touch the enrollment.
    let stranger = seed_user(&tdb.db, UserRole::Siswa).await;
    let stranger_ctx = auth_context_for(stranger);
    let err = services
        .enrollment_service
        .deactivate(&stranger_ctx, enrollment.id, None)
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::PermissionDenied(_));
}

#[tokio::test]
#[serial]
async fn test_closed_extracurricular_rejects_applications() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, None, 20).await;
    sqlx::query("UPDATE extracurriculars SET is_open = FALSE WHERE id = $1")
        .bind(ekskul.id)
        .execute(&tdb.pool)
        .await
        .unwrap();

    let err = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::EnrollmentClosed);
}

#[tokio::test]
#[serial]
async fn test_application_notifies_the_pembina() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let student = seed_user(&tdb.db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;

    services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap();

    let unread = tdb.db.notifications.count_unread(pembina.id).await.unwrap();
    assert_eq!(unread, 1);
}
