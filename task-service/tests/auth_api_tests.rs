mod common;

use common::token_for_subject;
use common::TestApp;
use common::TEST_SECRET;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_signup_returns_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/signup")
        .json(&json!({
            "email": "a@x.com",
            "password": "StrongPass1",
            "name": "Alice"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["token"].as_str().unwrap().contains('.'));
    assert!(body["data"]["user_id"].is_string());
    assert!(body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_email_is_400() {
    let app = TestApp::spawn().await;
    app.signup("a@x.com", "StrongPass1").await;

    let response = app
        .post("/auth/signup")
        .json(&json!({ "email": "a@x.com", "password": "OtherPass2" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_signup_weak_password_names_the_field() {
    let app = TestApp::spawn().await;

    for (password, expected) in [
        ("Ab1", "at least 8 characters"),
        ("alllowercase1", "uppercase"),
        ("ALLUPPERCASE1", "lowercase"),
        ("NoDigitsHere", "number"),
    ] {
        let response = app
            .post("/auth/signup")
            .json(&json!({ "email": "weak@x.com", "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"]["field"], "password");
        assert!(body["data"]["message"].as_str().unwrap().contains(expected));
    }
}

#[tokio::test]
async fn test_signin_failures_are_uniform() {
    let app = TestApp::spawn().await;
    app.signup("real@x.com", "StrongPass1").await;

    let wrong_password = app
        .post("/auth/signin")
        .json(&json!({ "email": "real@x.com", "password": "WrongPass1" }))
        .send()
        .await
        .expect("Failed to execute request");
    let no_such_user = app
        .post("/auth/signin")
        .json(&json!({ "email": "ghost@x.com", "password": "StrongPass1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(no_such_user.status(), StatusCode::UNAUTHORIZED);

    // Identical body shape and message: no account enumeration.
    let wrong_body: serde_json::Value = wrong_password.json().await.unwrap();
    let ghost_body: serde_json::Value = no_such_user.json().await.unwrap();
    assert_eq!(wrong_body, ghost_body);
}

#[tokio::test]
async fn test_signin_returns_fresh_token() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let response = app
        .post("/auth/signin")
        .json(&json!({ "email": "a@x.com", "password": "StrongPass1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user_id"], user_id.as_str());
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::spawn().await;

    let response = app.get("/auth/me").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "AUTH_MISSING_TOKEN");
}

#[tokio::test]
async fn test_me_rejects_malformed_authorization_header() {
    let app = TestApp::spawn().await;

    for header in ["Basic abc", "Bearer", "Bearer ", "Bearer a b"] {
        let response = app
            .get("/auth/me")
            .header("Authorization", header)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error_code"], "AUTH_INVALID_FORMAT", "header {:?}", header);
    }
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/auth/me")
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "AUTH_TOKEN_INVALID");
}

#[tokio::test]
async fn test_me_rejects_expired_token_distinctly() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": user_id,
        "role": "user",
        "iat": now - 7200,
        "exp": now - 3600,
    });
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap();

    let response = app.get("/auth/me").bearer_auth(expired).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "AUTH_TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_valid_token_for_deleted_user_is_404() {
    let app = TestApp::spawn().await;
    let (token, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let id = task_service::domain::user::models::UserId::from_string(&user_id).unwrap();
    app.users.remove_user(&id);

    let response = app.get("/auth/me").bearer_auth(token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_token_with_unknown_subject_is_404() {
    let app = TestApp::spawn().await;

    let token = token_for_subject(&uuid::Uuid::new_v4().to_string());
    let response = app.get("/auth/me").bearer_auth(token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::spawn().await;
    let (token, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let response = app.get("/auth/me").bearer_auth(token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["banned"], false);
}

#[tokio::test]
async fn test_token_info_reflects_claims() {
    let app = TestApp::spawn().await;
    let (token, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let response = app
        .get("/auth/token-info")
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user_id"], user_id.as_str());
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["issued_at"].is_string());
    assert!(body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_legacy_hash_is_migrated_on_signin() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app.signup("legacy@x.com", "OldPassword1").await;

    app.seed_legacy_hash(&user_id, "OldPassword1", "somesalt");
    let id = task_service::domain::user::models::UserId::from_string(&user_id).unwrap();
    assert!(app.users.credential_hash(&id).unwrap().contains(':'));

    // Signin verifies against the legacy scheme and upgrades the hash.
    let response = app
        .post("/auth/signin")
        .json(&json!({ "email": "legacy@x.com", "password": "OldPassword1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let migrated = app.users.credential_hash(&id).unwrap();
    assert!(migrated.starts_with("$2"));

    // The migrated hash still verifies the same password.
    let again = app
        .post("/auth/signin")
        .json(&json!({ "email": "legacy@x.com", "password": "OldPassword1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_legacy_hash_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app.signup("legacy@x.com", "OldPassword1").await;
    app.seed_legacy_hash(&user_id, "OldPassword1", "somesalt");

    let response = app
        .post("/auth/signin")
        .json(&json!({ "email": "legacy@x.com", "password": "WrongPassword1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A failed verification must not migrate anything.
    let id = task_service::domain::user::models::UserId::from_string(&user_id).unwrap();
    assert!(app.users.credential_hash(&id).unwrap().contains(':'));
}

#[tokio::test]
async fn test_session_endpoint_after_signin() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app.signup("a@x.com", "StrongPass1").await;

    let signin: serde_json::Value = app
        .post("/auth/signin")
        .json(&json!({ "email": "a@x.com", "password": "StrongPass1" }))
        .header("user-agent", "integration-suite/1.0")
        .header("x-forwarded-for", "203.0.113.7")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = signin["data"]["token"].as_str().unwrap();

    let response = app
        .get("/auth/session")
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["session"]["user_id"], user_id.as_str());
    assert_eq!(body["data"]["session"]["ip_address"], "203.0.113.7");
    assert_eq!(body["data"]["session"]["user_agent"], "integration-suite/1.0");
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_session_endpoint_is_synthetic_without_records() {
    // Signup issues a token but records no session.
    let app = TestApp::spawn().await;
    let (token, _) = app.signup("a@x.com", "StrongPass1").await;

    let response = app
        .get("/auth/session")
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["session"]["session_id"], "jwt-session");
}
