//! Session generation integration tests
//!
//! Requires a PostgreSQL database via `TEST_DATABASE_URL`; tests skip
//! themselves when it is not set.

mod helpers;

use chrono::{NaiveDate, NaiveTime};
use helpers::database_helper::TestDatabase;
use helpers::test_data::{auth_context_for, seed_extracurricular, seed_user, test_services};
use serial_test::serial;
use sixkul::models::schedule::{CreateScheduleRequest, Schedule};
use sixkul::models::user::UserRole;
use sixkul::services::auth::AuthContext;
use sixkul::services::ServiceFactory;

async fn seed_monday_schedule(
    services: &ServiceFactory,
    ctx: &AuthContext,
    extracurricular_id: i64,
) -> Schedule {
    services
        .scheduling_service
        .create_schedule(
            ctx,
            CreateScheduleRequest {
                extracurricular_id,
                day_of_week: 0,
                start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                location: Some("Aula".to_string()),
            },
        )
        .await
        .expect("failed to seed schedule")
}

#[tokio::test]
#[serial]
async fn test_generation_materializes_matching_weekdays() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;
    let ctx = auth_context_for(pembina);
    let schedule = seed_monday_schedule(&services, &ctx, ekskul.id).await;

    // March 2026 holds five Mondays: the 2nd, 9th, 16th, 23rd and 30th.
    let created = services
        .scheduling_service
        .generate_sessions(
            &ctx,
            schedule.id,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .expect("generation should succeed");

    assert_eq!(created.len(), 5);
    for session in &created {
        assert_eq!(session.schedule_id, Some(schedule.id));
        assert_eq!(session.start_time, schedule.start_time);
    }
    assert_eq!(created[0].session_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
}

#[tokio::test]
#[serial]
async fn test_regeneration_skips_existing_dates() {
    let Some(tdb) = TestDatabase::new().await else { return };
    let services = test_services(&tdb.db);

    let pembina = seed_user(&tdb.db, UserRole::Pembina).await;
    let ekskul = seed_extracurricular(&tdb.db, Some(pembina.id), 20).await;
    let ctx = auth_context_for(pembina);
    let schedule = seed_monday_schedule(&services, &ctx, ekskul.id).await;

    let first = services
        .scheduling_service
        .generate_sessions(
            &ctx,
            schedule.id,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.len(), 5);

    // Overlapping re-run: the three March Mondays already exist, so only
    // the two April ones may appear.
    let second = services
        .scheduling_service
        .generate_sessions(
            &ctx,
            schedule.id,
            NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 13).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].session_date, NaiveDate::from_ymd_opt(2026, 4, 6).unwrap());
    assert_eq!(second[1].session_date, NaiveDate::from_ymd_opt(2026, 4, 13).unwrap());

    // No duplicate rows landed for the overlap.
    let all = services
        .scheduling_service
        .list_sessions(ekskul.id, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 7);
    let mut dates: Vec<_> = all.iter().map(|s| s.session_date).collect();
    dates.dedup();
    assert_eq!(dates.len(), 7);
}
