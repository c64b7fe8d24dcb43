//! HTTP-level tests on the in-memory stack: the full route table, the
//! identity extractors and the status-code mapping, end to end.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_core::ports::TokenService;
use quill_infra::auth::{JwtConfig, JwtTokenService};

use crate::handlers::configure_routes;
use crate::multipart_config;
use crate::state::AppState;

const BOUNDARY: &str = "----quill-test-boundary";

macro_rules! test_app {
    () => {{
        let state = AppState::in_memory("https://cdn.test");
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "quill-test".into(),
        }));
        test::init_service(
            App::new()
                .app_data(multipart_config())
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await
    }};
}

macro_rules! signup {
    ($app:expr, $email:expr) => {{
        let body = multipart_body(
            &[
                ("first_name", "Anne"),
                ("last_name", "Jarvi"),
                ("email", $email),
                ("dob", "1990-05-01"),
                ("password", "salis123"),
                ("password_confirm", "salis123"),
            ],
            None,
        );
        let resp = test::call_service(&$app, multipart_request("/api/signup", None, body).to_request()).await;
        assert_eq!(resp.status(), 201, "signup should succeed");
    }};
}

macro_rules! login {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": $email, "password": "salis123" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), 200, "login should succeed");
        let body: Value = test::read_body_json(resp).await;
        body["access_token"].as_str().unwrap().to_string()
    }};
}

macro_rules! create_post {
    ($app:expr, $token:expr, $published:expr) => {{
        let body = multipart_body(
            &[
                ("title", "A day at the lake"),
                (
                    "content",
                    "The water was perfectly still when we arrived at dawn.",
                ),
                ("description", "Notes from a quiet morning."),
                ("published", $published),
            ],
            None,
        );
        let resp = test::call_service(
            &$app,
            multipart_request("/api/auth/posts", Some($token.as_str()), body).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201, "post create should succeed");
        let body: Value = test::read_body_json(resp).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> test::TestRequest {
    let mut req = test::TestRequest::post().uri(uri).insert_header((
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    ));
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    req.set_payload(body)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_rt::test]
async fn liveness_and_health_respond() {
    let app = test_app!();

    let resp = test::call_service(&app, test::TestRequest::with_uri("/api").method(actix_web::http::Method::HEAD).to_request()).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn signup_login_profile_flow() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    let token = login!(app, "anne@example.fi");

    // Without a token the profile is unreachable.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/auth/user").to_request()).await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "anne@example.fi");
    assert_eq!(body["post_count"], 0);
    assert_eq!(body["comment_count"], 0);
    // The password never leaves the server.
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_rt::test]
async fn garbage_token_is_rejected() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(bearer("not-a-real-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn duplicate_signup_is_conflict() {
    let app = test_app!();
    signup!(app, "anne@example.fi");

    let body = multipart_body(
        &[
            ("first_name", "Anne"),
            ("last_name", "Jarvi"),
            ("email", "anne@example.fi"),
            ("dob", "1990-05-01"),
            ("password", "salis123"),
            ("password_confirm", "salis123"),
        ],
        None,
    );
    let resp = test::call_service(&app, multipart_request("/api/signup", None, body).to_request()).await;
    assert_eq!(resp.status(), 409);
}

#[actix_rt::test]
async fn underage_signup_is_rejected() {
    let app = test_app!();

    let body = multipart_body(
        &[
            ("first_name", "Kid"),
            ("last_name", "Jarvi"),
            ("email", "kid@example.fi"),
            ("dob", "2015-05-01"),
            ("password", "salis123"),
            ("password_confirm", "salis123"),
        ],
        None,
    );
    let resp = test::call_service(&app, multipart_request("/api/signup", None, body).to_request()).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "you must be over 18 years old");
}

#[actix_rt::test]
async fn post_and_comment_lifecycle() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    let token = login!(app, "anne@example.fi");

    let post_id = create_post!(app, &token, "true");

    // Visible in the public list.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    assert_eq!(resp.status(), 200);
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Comment on it.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/auth/posts/{post_id}/comments"))
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "First!" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .to_request(),
    )
    .await;
    let comments: Value = test::read_body_json(resp).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);

    // Deleting needs the exact title as confirmation.
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/auth/posts/{post_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "confirmation": "wrong title" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/auth/posts/{post_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "confirmation": "A day at the lake" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // The post and its comments are gone.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let listed: Value = test::read_body_json(resp).await;
    assert!(listed.as_array().unwrap().is_empty());
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .to_request(),
    )
    .await;
    let comments: Value = test::read_body_json(resp).await;
    assert!(comments.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn draft_is_visible_only_to_its_author() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    signup!(app, "bob@example.fi");
    let anne = login!(app, "anne@example.fi");
    let bob = login!(app, "bob@example.fi");

    let post_id = create_post!(app, &anne, "false");

    // Anonymous and non-author readers are turned away.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/api/posts/{post_id}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    // The author reads their own draft through the same public route.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&anne))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Drafts never appear in the public list.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let listed: Value = test::read_body_json(resp).await;
    assert!(listed.as_array().unwrap().is_empty());

    // A missing post is 404, not 401.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn published_post_cannot_be_unpublished_over_http() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    let token = login!(app, "anne@example.fi");
    let post_id = create_post!(app, &token, "true");

    let body = multipart_body(
        &[
            ("title", "A day at the lake"),
            (
                "content",
                "The water was perfectly still when we arrived at dawn.",
            ),
            ("description", "Notes from a quiet morning."),
            ("published", "false"),
        ],
        None,
    );
    let mut req = test::TestRequest::put()
        .uri(&format!("/api/auth/posts/{post_id}"))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ));
    req = req.insert_header(bearer(&token));
    let resp = test::call_service(&app, req.set_payload(body).to_request()).await;
    assert_eq!(resp.status(), 400);

    // Still published.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/api/posts/{post_id}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn only_the_comment_author_may_delete_it() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    signup!(app, "bob@example.fi");
    let anne = login!(app, "anne@example.fi");
    let bob = login!(app, "bob@example.fi");

    let post_id = create_post!(app, &anne, "true");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/auth/posts/{post_id}/comments"))
            .insert_header(bearer(&bob))
            .set_json(json!({ "content": "Wonderful!" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let comment: Value = test::read_body_json(resp).await;
    let comment_id = comment["id"].as_str().unwrap();

    // The post's author still can't delete Bob's comment.
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/auth/posts/{post_id}/comments/{comment_id}"))
            .insert_header(bearer(&anne))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/auth/posts/{post_id}/comments/{comment_id}"))
            .insert_header(bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn oversized_and_mistyped_uploads_are_rejected() {
    let app = test_app!();

    // 3 MiB PNG: over the 2 MiB cap.
    let big = vec![0u8; 3 * 1024 * 1024];
    let body = multipart_body(
        &[
            ("first_name", "Anne"),
            ("last_name", "Jarvi"),
            ("email", "anne@example.fi"),
            ("dob", "1990-05-01"),
            ("password", "salis123"),
            ("password_confirm", "salis123"),
        ],
        Some(("avatar", "big.png", "image/png", &big)),
    );
    let resp = test::call_service(&app, multipart_request("/api/signup", None, body).to_request()).await;
    assert_eq!(resp.status(), 413);

    // Wrong type is a validation failure, not a silent drop.
    let body = multipart_body(
        &[
            ("first_name", "Anne"),
            ("last_name", "Jarvi"),
            ("email", "anne@example.fi"),
            ("dob", "1990-05-01"),
            ("password", "salis123"),
            ("password_confirm", "salis123"),
        ],
        Some(("avatar", "notes.txt", "text/plain", b"hello")),
    );
    let resp = test::call_service(&app, multipart_request("/api/signup", None, body).to_request()).await;
    assert_eq!(resp.status(), 400);

    // Neither attempt created the account.
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": "anne@example.fi", "password": "salis123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn account_deletion_cascades_over_http() {
    let app = test_app!();
    signup!(app, "anne@example.fi");
    signup!(app, "bob@example.fi");
    let anne = login!(app, "anne@example.fi");
    let bob = login!(app, "bob@example.fi");

    let post_id = create_post!(app, &anne, "true");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/auth/posts/{post_id}/comments"))
            .insert_header(bearer(&bob))
            .set_json(json!({ "content": "from bob" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    // Wrong password leaves everything intact.
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/auth/user")
            .insert_header(bearer(&anne))
            .set_json(json!({ "email": "anne@example.fi", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Correct credentials take the account and its world away.
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/auth/user")
            .insert_header(bearer(&anne))
            .set_json(json!({ "email": "anne@example.fi", "password": "salis123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let listed: Value = test::read_body_json(resp).await;
    assert!(listed.as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": "anne@example.fi", "password": "salis123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
