//! Test database helper utilities
//!
//! Database-backed tests run against the PostgreSQL instance named by
//! `TEST_DATABASE_URL` and skip themselves when it is not set.

use sixkul::database::DatabaseService;
use sqlx::PgPool;

pub struct TestDatabase {
    pub pool: PgPool,
    pub db: DatabaseService,
}

impl TestDatabase {
    /// Connect to the test database and reset it. Returns None when
    /// `TEST_DATABASE_URL` is unset so the test can skip.
    pub async fn new() -> Option<Self> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL not set, skipping database test");
                return None;
            }
        };

        let pool = PgPool::connect(&url)
            .await
            .expect("failed to connect to test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        let helper = Self {
            db: DatabaseService::new(pool.clone()),
            pool,
        };
        helper.cleanup().await;
        Some(helper)
    }

    /// Wipe all application tables between tests
    pub async fn cleanup(&self) {
        sqlx::query(
            "TRUNCATE attendance, sessions, schedules, enrollments, announcements, \
             notifications, preferences, student_profiles, pembina_profiles, \
             extracurriculars, users RESTART IDENTITY CASCADE",
        )
        .execute(&self.pool)
        .await
        .expect("failed to truncate test tables");
    }
}
