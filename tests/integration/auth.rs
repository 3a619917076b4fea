//! Integration tests for the token manager

use super::*;
use futures::future::join_all;
use integrations_lucidchart::errors::{AuthenticationError, ConfigurationError};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::any;

#[tokio::test]
async fn test_authorization_code_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_partial_json(json!({
            "grant_type": "authorization_code",
            "code": "auth-code",
            "client_id": CLIENT_ID,
            "client_secret": CLIENT_SECRET,
            "redirect_uri": REDIRECT_URL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("from-code", "r1", in_one_hour())))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_builder(&server).code("auth-code").build().unwrap();
    let client = LucidchartClient::new(config).unwrap();

    let token = assert_ok!(client.token_manager().get_token().await);
    assert_eq!(token.access_token.expose_secret(), "from-code");
    assert_eq!(token.account_id, Some(100));

    // The held token is reused while it is valid.
    let again = assert_ok!(client.token_manager().get_token().await);
    assert_eq!(again.access_token.expose_secret(), "from-code");
}

#[tokio::test]
async fn test_configured_refresh_token_takes_precedence() {
    let server = MockServer::start().await;

    refresh_mock("long-lived", "from-refresh")
        .expect(1)
        .mount(&server)
        .await;

    let config = config_builder(&server)
        .code("auth-code")
        .refresh_token("long-lived")
        .build()
        .unwrap();
    let client = LucidchartClient::new(config).unwrap();

    let token = assert_ok!(client.token_manager().get_token().await);
    assert_eq!(token.access_token.expose_secret(), "from-refresh");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_with_issued_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_partial_json(json!({"grant_type": "authorization_code"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("expired", "issued", 1_000)))
        .expect(1)
        .mount(&server)
        .await;
    refresh_mock("issued", "renewed").expect(1).mount(&server).await;

    let config = config_builder(&server).code("auth-code").build().unwrap();
    let client = LucidchartClient::new(config).unwrap();

    let first = assert_ok!(client.token_manager().get_token().await);
    assert!(first.is_expired());

    let second = assert_ok!(client.token_manager().get_token().await);
    assert_eq!(second.access_token.expose_secret(), "renewed");
    assert!(!second.is_expired());
}

#[tokio::test]
async fn test_missing_code_and_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_builder(&server).build().unwrap();
    let client = LucidchartClient::new(config).unwrap();

    let err = assert_err!(client.token_manager().get_token().await);
    assert!(matches!(
        err,
        LucidchartError::Configuration(ConfigurationError::MissingCredentials(_))
    ));
}

#[tokio::test]
async fn test_expired_token_without_refresh_material() {
    let server = MockServer::start().await;

    let mut body = token_body("expired", "unused", 1_000);
    body.as_object_mut().unwrap().remove("refresh_token");
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_builder(&server).code("auth-code").build().unwrap();
    let client = LucidchartClient::new(config).unwrap();

    assert_ok!(client.token_manager().get_token().await);
    let err = assert_err!(client.token_manager().get_token().await);
    assert!(matches!(
        err,
        LucidchartError::Authentication(AuthenticationError::NoRefreshMaterial(_))
    ));
}

#[tokio::test]
async fn test_token_endpoint_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Authorization code has expired"
        })))
        .mount(&server)
        .await;

    let config = config_builder(&server).code("stale-code").build().unwrap();
    let client = LucidchartClient::new(config).unwrap();

    let err = assert_err!(client.token_manager().get_token().await);
    match &err {
        LucidchartError::Validation(validation) => {
            assert_eq!(validation.status, 400);
            assert_eq!(validation.error, "invalid_grant");
            assert_eq!(validation.description, "Authorization code has expired");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(err.to_string().contains("Authorization code has expired"));
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_token_endpoint_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = assert_err!(client.token_manager().get_token().await);
    assert!(matches!(
        err,
        LucidchartError::Authentication(AuthenticationError::RefreshFailed(_))
    ));
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("shared", "long-lived", in_one_hour()))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let tokens = client.token_manager();

    let results = join_all((0..8).map(|_| tokens.get_token())).await;

    for result in results {
        let token = assert_ok!(result);
        assert_eq!(token.access_token.expose_secret(), "shared");
    }
}
