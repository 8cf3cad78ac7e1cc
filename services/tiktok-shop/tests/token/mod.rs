use anyhow::Result;
use http::Method;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use ttsign_core::{ErrorKind, ProxyKind, Resource};
use ttsign_tiktok_shop::{AccessTokenRequest, RefreshTokenRequest, TokenService};

use crate::mock::MockHttpSend;

fn service(mock: &MockHttpSend) -> TokenService {
    TokenService::new(mock.context()).with_base_url("https://auth.test/")
}

#[tokio::test]
async fn test_access_token_is_not_signed() -> Result<()> {
    let mock = MockHttpSend::json(
        200,
        json!({"code": 0, "data": {"access_token": "at", "refresh_token": "rt"}}),
    );

    let resp: Value = service(&mock)
        .access_token(AccessTokenRequest {
            app_key: "app-key".to_string(),
            app_secret: "app-secret".to_string(),
            auth_code: "code-1".to_string(),
            proxy: Some("http://proxy.internal:3128".to_string()),
        })
        .await?;
    assert_eq!(resp["data"]["access_token"], json!("at"));

    let req = mock.last();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.uri.host(), Some("auth.test"));
    assert_eq!(req.path(), "/api/v2/token/get");
    assert_eq!(
        req.params(),
        vec![
            ("app_key".to_string(), "app-key".to_string()),
            ("app_secret".to_string(), "app-secret".to_string()),
            ("auth_code".to_string(), "code-1".to_string()),
            ("grant_type".to_string(), "authorized_code".to_string()),
        ]
    );
    assert_eq!(req.param("sign"), None);
    assert_eq!(req.param("timestamp"), None);
    assert_eq!(req.header("content-type").as_deref(), Some("application/json"));
    assert_eq!(req.agent.map(|v| v.kind()), Some(ProxyKind::Http));
    Ok(())
}

#[tokio::test]
async fn test_refresh_token() -> Result<()> {
    let mock = MockHttpSend::json(200, json!({"code": 0}));

    let _: Value = service(&mock)
        .refresh_token(RefreshTokenRequest {
            app_key: "app-key".to_string(),
            app_secret: "app-secret".to_string(),
            refresh_token: "rt-1".to_string(),
            proxy: None,
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/api/v2/token/refresh");
    assert_eq!(req.param("refresh_token").as_deref(), Some("rt-1"));
    assert_eq!(req.param("grant_type").as_deref(), Some("refresh_token"));
    assert!(req.agent.is_none());
    Ok(())
}

#[tokio::test]
async fn test_token_remote_error() {
    let mock = MockHttpSend::json(401, json!({"code": 36004004, "message": "invalid auth code"}));

    let err = service(&mock)
        .access_token::<Value>(AccessTokenRequest {
            app_key: "app-key".to_string(),
            app_secret: "app-secret".to_string(),
            auth_code: "expired".to_string(),
            proxy: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.resource(), Some(Resource::Token));
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.message(),
        "Token request failed with status 401: invalid auth code"
    );
}

#[tokio::test]
async fn test_token_transport_error() {
    let mock = MockHttpSend::transport_error("dns error");

    let err = service(&mock)
        .refresh_token::<Value>(RefreshTokenRequest {
            app_key: "app-key".to_string(),
            app_secret: "app-secret".to_string(),
            refresh_token: "rt-1".to_string(),
            proxy: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.message(), "Token request failed: dns error");
}

#[tokio::test]
async fn test_token_requires_credentials() {
    let mock = MockHttpSend::json(200, json!({}));

    let err = service(&mock)
        .access_token::<Value>(AccessTokenRequest {
            app_key: "app-key".to_string(),
            app_secret: " ".to_string(),
            auth_code: "code-1".to_string(),
            proxy: None,
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Token));
    assert!(mock.requests().is_empty());
}
