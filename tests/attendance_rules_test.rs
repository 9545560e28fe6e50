//! Attendance recording integration tests
//!
//! Requires a PostgreSQL database via `TEST_DATABASE_URL`; tests skip
//! themselves when it is not set.

mod helpers;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use helpers::database_helper::TestDatabase;
use helpers::test_data::{auth_context_for, seed_extracurricular, seed_user, test_services};
use serial_test::serial;
use sixkul::database::DatabaseService;
use sixkul::models::attendance::{AttendanceEntry, AttendanceStatus, BatchAttendanceRequest};
use sixkul::models::schedule::{CreateSessionRequest, Session, SessionStatus, UpdateSessionRequest};
use sixkul::models::user::{User, UserRole};
use sixkul::services::auth::AuthContext;
use sixkul::services::ServiceFactory;
use sixkul::utils::errors::SixkulError;

struct Fixture {
    ctx: AuthContext,
    student: User,
    enrollment_id: i64,
    session: Session,
}

async fn setup(db: &DatabaseService, services: &ServiceFactory) -> Fixture {
    let pembina = seed_user(db, UserRole::Pembina).await;
    let student = seed_user(db, UserRole::Siswa).await;
    let ekskul = seed_extracurricular(db, Some(pembina.id), 20).await;
    let ctx = auth_context_for(pembina);

    let enrollment = services
        .enrollment_service
        .enroll(student.id, ekskul.id)
        .await
        .unwrap();
    services
        .enrollment_service
        .decide(&ctx, enrollment.id, true, None)
        .await
        .unwrap();

    let session = services
        .scheduling_service
        .create_session(
            &ctx,
            CreateSessionRequest {
                extracurricular_id: ekskul.id,
                session_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                location: Some("Lapangan".to_string()),
                topic: None,
            },
        )
        .await
        .unwrap();

    Fixture {
        ctx,
        student,
        enrollment_id: enrollment.id,
        session,
    }
}

fn batch(session_id: i64, entries: Vec<(i64, AttendanceStatus)>) -> BatchAttendanceRequest {
    BatchAttendanceRequest {
        session_id,
        entries: entries
            .into_iter()
            .map(|(enrollment_id, status)| AttendanceEntry {
                enrollment_id,
                status,
                note: None,
            })
            .collect(),
    }
}

#[tokio::test]
#[serial]
async fn test_batch_records_rows_and_completes_the_session() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    let written = services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .expect("batch should succeed");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].status, "HADIR");
    assert_eq!(written[0].marked_by, Some(fx.ctx.user_id()));

    let session = tdb.db.sessions.find_by_id(fx.session.id).await.unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Completed);

    let mine = services
        .attendance_service
        .list_mine(fx.student.id, None, None, 25, 0)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_recorded_attendance_is_locked() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .unwrap();

    // The same enrollment and date cannot be marked again, even to correct it.
    let err = services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Alpa)]),
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::AttendanceLocked { .. });
}

#[tokio::test]
#[serial]
async fn test_batch_is_all_or_nothing() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    // Second entry references a pending enrollment, which must sink the batch.
    let other = seed_user(&tdb.db, UserRole::Siswa).await;
    let pending = services
        .enrollment_service
        .enroll(other.id, fx.session.extracurricular_id)
        .await
        .unwrap();

    let err = services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(
                fx.session.id,
                vec![
                    (fx.enrollment_id, AttendanceStatus::Hadir),
                    (pending.id, AttendanceStatus::Hadir),
                ],
            ),
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::InvalidInput(_));

    let rows = services
        .attendance_service
        .list_for_session(&fx.ctx, fx.session.id)
        .await
        .unwrap();
    assert!(rows.is_empty(), "a failed batch must write nothing");

    let session = tdb.db.sessions.find_by_id(fx.session.id).await.unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Scheduled);
}

#[tokio::test]
#[serial]
async fn test_cancelled_session_rejects_attendance() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    services
        .scheduling_service
        .cancel_session(&fx.ctx, fx.session.id)
        .await
        .unwrap();

    let err = services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::InvalidInput(_));
}

#[tokio::test]
#[serial]
async fn test_session_with_recorded_attendance_cannot_be_edited() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .unwrap();

    // Moving the date (or any other edit) must be refused once rows exist.
    let err = services
        .scheduling_service
        .update_session(
            &fx.ctx,
            fx.session.id,
            UpdateSessionRequest {
                session_date: NaiveDate::from_ymd_opt(2026, 4, 1),
                start_time: None,
                end_time: None,
                location: None,
                topic: None,
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::InvalidInput(_));

    let session = tdb.db.sessions.find_by_id(fx.session.id).await.unwrap().unwrap();
    assert_eq!(session.session_date, fx.session.session_date);
    assert_eq!(session.status(), SessionStatus::Completed);
}

#[tokio::test]
#[serial]
async fn test_update_cannot_cancel_a_session() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    // Cancellation carries its own guards and member notifications, so the
    // plain update endpoint refuses the status flip.
    let err = services
        .scheduling_service
        .update_session(
            &fx.ctx,
            fx.session.id,
            UpdateSessionRequest {
                session_date: None,
                start_time: None,
                end_time: None,
                location: None,
                topic: None,
                status: Some(SessionStatus::Cancelled),
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::InvalidInput(_));

    let session = tdb.db.sessions.find_by_id(fx.session.id).await.unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::Scheduled);
}

#[tokio::test]
#[serial]
async fn test_recap_counts_by_status() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    // A second session on another date for the same member.
    let second = services
        .scheduling_service
        .create_session(
            &fx.ctx,
            CreateSessionRequest {
                extracurricular_id: fx.session.extracurricular_id,
                session_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
                start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                location: None,
                topic: None,
            },
        )
        .await
        .unwrap();

    services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .unwrap();
    services
        .attendance_service
        .mark_batch(
            &fx.ctx,
            batch(second.id, vec![(fx.enrollment_id, AttendanceStatus::Sakit)]),
        )
        .await
        .unwrap();

    let recap = services
        .attendance_service
        .recap(
            &fx.ctx,
            fx.session.extracurricular_id,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(recap.len(), 1);
    assert_eq!(recap[0].student_id, fx.student.id);
    assert_eq!(recap[0].hadir, 1);
    assert_eq!(recap[0].sakit, 1);
    assert_eq!(recap[0].alpa, 0);
}

#[tokio::test]
#[serial]
async fn test_only_the_managing_pembina_may_mark() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);
    let fx = setup(&tdb.db, &services).await;

    let outsider = seed_user(&tdb.db, UserRole::Pembina).await;
    let outsider_ctx = auth_context_for(outsider);

    let err = services
        .attendance_service
        .mark_batch(
            &outsider_ctx,
            batch(fx.session.id, vec![(fx.enrollment_id, AttendanceStatus::Hadir)]),
        )
        .await
        .unwrap_err();
    assert_matches!(err, SixkulError::PermissionDenied(_));
}
