//! Identity provider client tests against a mocked HTTP server

use assert_matches::assert_matches;
use sixkul::config::Settings;
use sixkul::services::IdentityService;
use sixkul::utils::errors::{IdentityError, SixkulError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> IdentityService {
    let mut settings = Settings::default();
    settings.auth.provider_url = server.uri();
    settings.auth.provider_api_key = "test-key".to_string();
    settings.auth.provider_timeout_seconds = 2;
    IdentityService::new(settings).expect("identity service")
}

#[tokio::test]
async fn test_valid_credentials_return_the_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify"))
        .and(header("X-Api-Key", "test-key"))
        .and(body_partial_json(serde_json::json!({ "username": "budi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {
                "external_id": "sch-0042",
                "email": "budi@sekolah.sch.id",
                "full_name": "Budi Santoso",
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let identity = service
        .verify_credentials("budi", "rahasia")
        .await
        .expect("verification should succeed");

    assert_eq!(identity.external_id, "sch-0042");
    assert_eq!(identity.email, "budi@sekolah.sch.id");
    assert_eq!(identity.full_name, "Budi Santoso");
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.verify_credentials("budi", "salah").await.unwrap_err();
    assert_matches!(
        err,
        SixkulError::Identity(IdentityError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_ok_false_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "ok": false, "result": null })),
        )
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.verify_credentials("budi", "salah").await.unwrap_err();
    assert_matches!(
        err,
        SixkulError::Identity(IdentityError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_server_error_maps_to_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.verify_credentials("budi", "rahasia").await.unwrap_err();
    assert_matches!(err, SixkulError::Identity(IdentityError::RequestFailed(_)));
}

#[tokio::test]
async fn test_missing_result_is_an_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.verify_credentials("budi", "rahasia").await.unwrap_err();
    assert_matches!(err, SixkulError::Identity(IdentityError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_health_check_reflects_provider_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let service = service_for(&server);
    assert!(service.health_check().await);
}
