use axum::http::StatusCode;
use serde_json::{Value, json};

use super::helpers::{
    RONNIE_PASSWORD, bearer_headers, cookie_headers, issue_token, login, request_form,
    request_json, test_app, test_app_with,
};
use crate::config::Settings;

#[tokio::test]
async fn issue_token_success() {
    let (app, fixtures) = test_app();

    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();
    let refresh = token["refresh_token"].as_str().unwrap();

    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
    assert_eq!(token["token_type"], "bearer");
    assert_eq!(token["expires_in"], 3600);
}

#[tokio::test]
async fn issue_token_wrong_secret_is_invalid_client() {
    let (app, fixtures) = test_app();

    let (status, body, _) = request_form(
        app,
        "POST",
        "/token",
        &[
            ("grant_type", "client_credentials"),
            ("client_id", &fixtures.ronnie_client.client_id),
            ("client_secret", "tampered"),
        ],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_client");
}

#[tokio::test]
async fn issue_token_unknown_client_is_invalid_client() {
    let (app, _) = test_app();

    let (status, body, _) = request_form(
        app,
        "POST",
        "/token",
        &[
            ("grant_type", "client_credentials"),
            ("client_id", "who"),
            ("client_secret", "cares"),
        ],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_client");
}

#[tokio::test]
async fn issue_token_unsupported_grant_is_invalid_grant() {
    let (app, fixtures) = test_app();

    for fields in [
        vec![
            ("grant_type", "password"),
            ("client_id", fixtures.ronnie_client.client_id.as_str()),
            ("client_secret", fixtures.ronnie_client.client_secret.as_str()),
        ],
        // missing grant_type entirely
        vec![
            ("client_id", fixtures.ronnie_client.client_id.as_str()),
            ("client_secret", fixtures.ronnie_client.client_secret.as_str()),
        ],
    ] {
        let (status, body, _) = request_form(app.clone(), "POST", "/token", &fields, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"], "invalid_grant");
    }
}

#[tokio::test]
async fn bearer_token_grants_api_access() {
    let (app, fixtures) = test_app();
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();

    let (status, _, _) = request_json(
        app.clone(),
        "GET",
        "/tasks",
        None,
        Some(bearer_headers(access)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = request_json(
        app,
        "POST",
        "/tasks",
        Some(json!({ "description": "do this" })),
        Some(bearer_headers(access)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(task["done"], false);
}

#[tokio::test]
async fn unauthenticated_api_request_is_rejected() {
    let (app, _) = test_app();
    let (status, _, _) = request_json(app, "GET", "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_and_is_single_use() {
    let (app, fixtures) = test_app();
    let first = issue_token(&app, &fixtures.ronnie_client).await;
    let first_access = first["access_token"].as_str().unwrap();
    let first_refresh = first["refresh_token"].as_str().unwrap();

    let (status, body, _) = request_form(
        app.clone(),
        "POST",
        "/token-refresh",
        &[("grant_type", "refresh_token"), ("refresh_token", first_refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second: Value = serde_json::from_str(&body).unwrap();
    let second_access = second["access_token"].as_str().unwrap();
    assert_ne!(second_access, first_access);

    // the superseded access token no longer authenticates
    let (status, _, _) = request_json(
        app.clone(),
        "GET",
        "/tasks",
        None,
        Some(bearer_headers(first_access)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // replaying the consumed refresh token fails like an unknown one
    let (status, body, _) = request_form(
        app.clone(),
        "POST",
        "/token-refresh",
        &[("grant_type", "refresh_token"), ("refresh_token", first_refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_grant");

    // the winning pair stays valid
    let (status, _, _) = request_json(
        app,
        "GET",
        "/tasks",
        None,
        Some(bearer_headers(second_access)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_requires_the_refresh_grant_type() {
    let (app, fixtures) = test_app();
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let refresh = token["refresh_token"].as_str().unwrap();

    let (status, _, _) = request_form(
        app,
        "POST",
        "/token-refresh",
        &[("grant_type", "client_credentials"), ("refresh_token", refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_unknown_token_is_invalid_grant() {
    let (app, _) = test_app();

    let (status, body, _) = request_form(
        app,
        "POST",
        "/token-refresh",
        &[("grant_type", "refresh_token"), ("refresh_token", "never-issued")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_grant");
}

#[tokio::test]
async fn revoke_takes_effect_immediately() {
    let (app, fixtures) = test_app();
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();

    let session = login(&app, "ronnie", RONNIE_PASSWORD).await;
    let (status, body, _) = request_form(
        app.clone(),
        "POST",
        "/token-revoke",
        &[("token", access)],
        Some(cookie_headers(&session)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["revoked"], true);

    let (status, _, _) = request_json(
        app.clone(),
        "GET",
        "/tasks",
        None,
        Some(bearer_headers(access)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // unknown tokens are a no-op
    let (status, body, _) = request_form(
        app,
        "POST",
        "/token-revoke",
        &[("token", "never-issued")],
        Some(cookie_headers(&session)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["revoked"], false);
}

#[tokio::test]
async fn revoked_pair_cannot_be_refreshed_back_to_life() {
    let (app, fixtures) = test_app();
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();
    let refresh = token["refresh_token"].as_str().unwrap();

    let session = login(&app, "ronnie", RONNIE_PASSWORD).await;
    let (status, _, _) = request_form(
        app.clone(),
        "POST",
        "/token-revoke",
        &[("token", access)],
        Some(cookie_headers(&session)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = request_form(
        app,
        "POST",
        "/token-refresh",
        &[("grant_type", "refresh_token"), ("refresh_token", refresh)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_grant");
}

#[tokio::test]
async fn expired_token_resolves_anonymous_while_still_stored() {
    let settings = Settings {
        access_token_ttl_seconds: 0,
        ..Settings::default()
    };
    let (app, fixtures) = test_app_with(settings);
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();

    // the record is still in storage, only the policy rejects it
    assert!(fixtures.state.issuer.lookup_access_token(access).is_some());

    let (status, _, _) =
        request_json(app, "GET", "/tasks", None, Some(bearer_headers(access))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn strict_policy_surfaces_expired_tokens_as_403() {
    let settings = Settings {
        access_token_ttl_seconds: 0,
        strict_bearer_errors: true,
        ..Settings::default()
    };
    let (app, fixtures) = test_app_with(settings);
    let token = issue_token(&app, &fixtures.ronnie_client).await;
    let access = token["access_token"].as_str().unwrap();

    let (status, body, _) =
        request_json(app, "GET", "/tasks", None, Some(bearer_headers(access))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "invalid_token");
}
