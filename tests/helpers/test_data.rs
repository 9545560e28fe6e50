//! Test data seeding helpers

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use sixkul::config::Settings;
use sixkul::database::DatabaseService;
use sixkul::models::extracurricular::{CreateExtracurricularRequest, Extracurricular};
use sixkul::models::user::{User, UserRole};
use sixkul::services::auth::AuthContext;
use sixkul::services::{AuthService, ServiceFactory};
use uuid::Uuid;

/// Settings usable offline. The identity provider URL points nowhere; tests
/// that need the provider mock it with wiremock.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.session_secret = "test-secret-test-secret-test-secret!!".to_string();
    settings.auth.provider_url = "http://127.0.0.1:1".to_string();
    settings
}

pub fn test_services(db: &DatabaseService) -> ServiceFactory {
    ServiceFactory::new(test_settings(), db.clone()).expect("failed to build services")
}

pub fn auth_context_for(user: User) -> AuthContext {
    AuthService::new(test_settings()).auth_context(user)
}

pub async fn seed_user(db: &DatabaseService, role: UserRole) -> User {
    let full_name: String = Name().fake();
    let email = format!("{}-{}", Uuid::new_v4().simple(), SafeEmail().fake::<String>());
    db.users
        .create(&Uuid::new_v4().to_string(), &email, &full_name, role)
        .await
        .expect("failed to seed user")
}

pub async fn seed_extracurricular(
    db: &DatabaseService,
    pembina_id: Option<i64>,
    capacity: i32,
) -> Extracurricular {
    db.extracurriculars
        .create(&CreateExtracurricularRequest {
            name: format!("Ekskul {}", Uuid::new_v4().simple()),
            description: None,
            category: Some("olahraga".to_string()),
            pembina_id,
            capacity: Some(capacity),
            is_open: Some(true),
        })
        .await
        .expect("failed to seed extracurricular")
}
