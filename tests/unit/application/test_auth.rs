use crate::common::{SpyTransport, alice, authenticated_mock_client, mock_client, spy_client};
use mockito::{Matcher, Server};
use robinhood_client::prelude::*;
use serde_json::json;
use tokio_test::block_on;
use tracing::Level;

#[test]
fn test_session_starts_unauthenticated() {
    let session = Session::new();
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(session.authenticated_at().is_none());
}

#[test]
fn test_session_establish_and_clear() {
    let mut session = Session::new();
    session.begin_authentication();
    assert_eq!(session.state(), AuthState::Authenticating);
    assert!(session.token().is_none());

    session.establish("alice", "abc123");
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("abc123"));
    assert_eq!(session.username(), Some("alice"));
    assert!(session.authenticated_at().is_some());

    session.clear();
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(session.username().is_none());
}

#[test]
fn test_session_with_empty_token_is_not_authenticated() {
    let mut session = Session::new();
    session.establish("alice", "");
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_authenticate_stores_token() {
    let spy = SpyTransport::sequence(vec![json!({"token": "abc123"})]);
    let (mut client, sink) = spy_client(&spy);

    assert!(client.authenticate(&alice()).await.unwrap());
    assert!(client.is_authenticated());
    assert_eq!(client.session().token(), Some("abc123"));

    let requests = spy.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://api.test.local/api-token-auth/");
    assert_eq!(requests[0].form_value("username"), Some("alice"));
    assert_eq!(requests[0].form_value("password"), Some("secret"));
    assert_eq!(requests[0].form_value("mfa_code"), None);
    assert!(requests[0].token.is_none());
    assert_eq!(sink.messages_at(Level::INFO).len(), 1);
}

#[tokio::test]
async fn test_authenticate_without_token_fails_quietly() {
    let spy = SpyTransport::sequence(vec![json!({
        "non_field_errors": ["Unable to log in with provided credentials."]
    })]);
    let (mut client, sink) = spy_client(&spy);

    assert!(!client.authenticate(&alice()).await.unwrap());
    assert!(!client.is_authenticated());
    assert_eq!(client.session().state(), AuthState::Unauthenticated);

    let errors = sink.messages_at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("alice"));
    assert!(errors[0].contains("Unable to log in"));
}

#[tokio::test]
async fn test_authenticate_ignores_null_or_empty_token() {
    for body in [json!({"token": null}), json!({"token": ""}), json!({"token": 42})] {
        let spy = SpyTransport::sequence(vec![body]);
        let (mut client, _sink) = spy_client(&spy);
        assert!(!client.authenticate(&alice()).await.unwrap());
        assert!(!client.is_authenticated());
    }
}

#[tokio::test]
async fn test_mfa_challenge_resubmits_with_code() {
    let spy = SpyTransport::sequence(vec![
        json!({"mfa_required": true, "mfa_type": "sms"}),
        json!({"token": "abc123"}),
    ]);
    let (mut client, _sink) = spy_client(&spy);
    let provider =
        StaticCredentials::new(Credentials::new("alice", "secret").with_mfa_code("123456"));

    assert!(client.authenticate(&provider).await.unwrap());
    assert!(client.is_authenticated());

    let requests = spy.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].form_value("mfa_code"), None);
    assert_eq!(requests[1].form_value("username"), Some("alice"));
    assert_eq!(requests[1].form_value("password"), Some("secret"));
    assert_eq!(requests[1].form_value("mfa_code"), Some("123456"));
}

#[tokio::test]
async fn test_mfa_code_is_requested_from_provider() {
    struct Challenged;

    impl CredentialProvider for Challenged {
        fn credentials(&self) -> Result<Credentials, AppError> {
            Ok(Credentials::new("alice", "secret"))
        }

        fn mfa_code(&self, mfa_type: Option<&str>) -> Result<String, AppError> {
            assert_eq!(mfa_type, Some("sms"));
            Ok("654321".to_string())
        }
    }

    let spy = SpyTransport::sequence(vec![
        json!({"mfa_required": true, "mfa_type": "sms"}),
        json!({"token": "abc123"}),
    ]);
    let (mut client, _sink) = spy_client(&spy);

    assert!(client.authenticate(&Challenged).await.unwrap());
    assert_eq!(spy.requests()[1].form_value("mfa_code"), Some("654321"));
}

#[tokio::test]
async fn test_mfa_second_response_without_token_fails() {
    let spy = SpyTransport::sequence(vec![
        json!({"mfa_required": true, "mfa_type": "sms"}),
        json!({"mfa_required": true, "mfa_type": "sms"}),
    ]);
    let (mut client, sink) = spy_client(&spy);
    let provider =
        StaticCredentials::new(Credentials::new("alice", "secret").with_mfa_code("000000"));

    assert!(!client.authenticate(&provider).await.unwrap());
    assert!(!client.is_authenticated());
    // Resubmitted exactly once
    assert_eq!(spy.calls(), 2);
    assert_eq!(sink.messages_at(Level::ERROR).len(), 1);
}

#[tokio::test]
async fn test_mfa_without_code_is_missing_credentials() {
    let spy = SpyTransport::sequence(vec![json!({"mfa_required": true, "mfa_type": "app"})]);
    let (mut client, _sink) = spy_client(&spy);

    let err = client.authenticate(&alice()).await.unwrap_err();
    assert!(matches!(err, AppError::MissingCredentials(_)));
    assert_eq!(client.session().state(), AuthState::Unauthenticated);
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn test_failed_reauthentication_keeps_previous_session() {
    let spy = SpyTransport::sequence(vec![
        json!({"token": "abc123"}),
        json!({"detail": "Too many attempts"}),
    ]);
    let (mut client, _sink) = spy_client(&spy);

    assert!(client.authenticate(&alice()).await.unwrap());
    assert!(!client.authenticate(&alice()).await.unwrap());
    assert!(client.is_authenticated());
    assert_eq!(client.session().token(), Some("abc123"));
}

#[test]
fn test_deauthenticate_without_login_only_warns() {
    let spy = SpyTransport::sequence(vec![]);
    let (mut client, sink) = spy_client(&spy);

    let result = block_on(client.deauthenticate());

    assert!(result.is_ok());
    assert!(!client.is_authenticated());
    assert_eq!(spy.calls(), 0);
    let warnings = sink.messages_at(Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("logout"));
}

#[tokio::test]
async fn test_deauthenticate_sends_token_and_clears() {
    let spy = SpyTransport::sequence(vec![json!({"token": "abc123"}), json!({})]);
    let (mut client, _sink) = spy_client(&spy);
    client.authenticate(&alice()).await.unwrap();

    client.deauthenticate().await.unwrap();

    assert!(!client.is_authenticated());
    assert_eq!(client.session().state(), AuthState::Unauthenticated);
    let logout = &spy.requests()[1];
    assert_eq!(logout.url, "https://api.test.local/api-token-logout/");
    assert_eq!(logout.token.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_mock_login_then_authorized_request() {
    let mut server = Server::new_async().await;
    let (client, _sink) = authenticated_mock_client(&mut server).await;

    let accounts = server
        .mock("GET", "/accounts/")
        .match_header("authorization", "Token abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"account_number":"XJ123","buying_power":"500.00"}]}"#)
        .create_async()
        .await;

    let number = client.get_account_data("account_number").await.unwrap();
    assert_eq!(number, json!("XJ123"));
    accounts.assert_async().await;
}

#[tokio::test]
async fn test_mock_mfa_flow() {
    let mut server = Server::new_async().await;
    let challenge = server
        .mock("POST", "/api-token-auth/")
        .match_body(Matcher::Exact("username=alice&password=secret".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"mfa_required": true, "mfa_type": "sms"}"#)
        .expect(1)
        .create_async()
        .await;
    let confirm = server
        .mock("POST", "/api-token-auth/")
        .match_body(Matcher::UrlEncoded("mfa_code".into(), "123456".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "abc123"}"#)
        .expect(1)
        .create_async()
        .await;

    let (mut client, _sink) = mock_client(&server);
    let provider =
        StaticCredentials::new(Credentials::new("alice", "secret").with_mfa_code("123456"));

    assert!(client.authenticate(&provider).await.unwrap());
    challenge.assert_async().await;
    confirm.assert_async().await;
}

#[tokio::test]
async fn test_mock_login_error_status_without_token() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api-token-auth/")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"non_field_errors":["Unable to log in with provided credentials."]}"#)
        .create_async()
        .await;

    let (mut client, _sink) = mock_client(&server);
    assert!(!client.authenticate(&alice()).await.unwrap());
    assert!(!client.is_authenticated());
    login.assert_async().await;
}

#[tokio::test]
async fn test_mock_logout_failure_still_clears() {
    let mut server = Server::new_async().await;
    let (mut client, sink) = authenticated_mock_client(&mut server).await;
    let logout = server
        .mock("POST", "/api-token-logout/")
        .match_header("authorization", "Token abc123")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let result = client.deauthenticate().await;

    assert!(matches!(result, Err(AppError::Json(_))));
    assert!(!client.is_authenticated());
    assert_eq!(sink.messages_at(Level::WARN).len(), 1);
    logout.assert_async().await;
}
