//! End-to-end HTTP tests over the in-memory adapters.
//!
//! Each test builds the real routing table through `server::configure_api`
//! and drives it with `actix_web::test`, so these cover the full path from
//! request parsing through the services to the adapters.

use std::fmt::Debug;
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use backend::domain::ports::{UploadStore, UserRepository};
use backend::domain::{TokenSigner, User};
use backend::outbound::storage::DiskUploadStore;
use backend::server::{Repositories, build_http_state, configure_api};

const SECRET: &str = "integration-test-secret";
const TOKEN_TTL: i64 = 3600;

async fn spawn() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody<Error = impl Debug>>, Error = actix_web::Error>,
    Repositories,
    TempDir,
) {
    let repositories = Repositories::in_memory();
    let upload_dir = TempDir::new().expect("upload dir");
    let store: Arc<dyn UploadStore> = Arc::new(
        DiskUploadStore::new(upload_dir.path())
            .await
            .expect("upload store"),
    );
    let state = build_http_state(&repositories, store, SECRET, TOKEN_TTL);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_api),
    )
    .await;
    (app, repositories, upload_dir)
}

async fn call<S, B>(
    app: &S,
    mut req: test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    let response = test::call_service(app, req.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn get<S, B>(app: &S, path: &str, token: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    call(app, test::TestRequest::get().uri(path), Some(token)).await
}

async fn post<S, B>(app: &S, path: &str, token: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    call(
        app,
        test::TestRequest::post().uri(path).set_json(&body),
        Some(token),
    )
    .await
}

async fn put<S, B>(app: &S, path: &str, token: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    call(
        app,
        test::TestRequest::put().uri(path).set_json(&body),
        Some(token),
    )
    .await
}

/// Register an account and return its bearer token and id.
async fn register<S, B>(app: &S, username: &str) -> (String, Uuid)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let (status, body) = call(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": username, "password": "password123" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {username}: {body}");
    let token = body["token"].as_str().expect("token").to_owned();
    let id = body["user"]["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("user id");
    (token, id)
}

/// Insert an admin account directly and mint a token for it.
async fn seed_admin(repositories: &Repositories, username: &str) -> (String, Uuid) {
    let mut admin = User::new(username, "seeded-offline");
    admin.is_admin = true;
    repositories
        .users
        .insert(&admin)
        .await
        .expect("seed admin");
    let token = TokenSigner::new(SECRET, TOKEN_TTL)
        .sign(admin.id)
        .expect("admin token");
    (token, admin.id)
}

async fn create_post<S, B>(app: &S, token: &str, title: &str) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let (status, body) = post(
        app,
        "/api/posts",
        token,
        json!({ "title": title, "content": "some content" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create post: {body}");
    body["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("post id")
}

fn multipart(filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "test-upload-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn upload<S, B>(
    app: &S,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let (header, body) = multipart(filename, content_type, bytes);
    call(
        app,
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header(("content-type", header))
            .set_payload(body),
        Some(token),
    )
    .await
}

const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
];

#[actix_web::test]
async fn like_is_recorded_but_notification_suppressed_by_settings() {
    let (app, _repos, _dir) = spawn().await;
    let (author_token, _) = register(&app, "quiet_author").await;
    let (fan_token, _) = register(&app, "eager_fan").await;

    let (status, _) = put(
        &app,
        "/api/notifications/settings",
        &author_token,
        json!({ "likes": false, "comments": true, "replies": true, "messages": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let post_id = create_post(&app, &author_token, "Quiet post").await;
    let (status, liked) =
        post(&app, &format!("/api/posts/{post_id}/like"), &fan_token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"].as_array().expect("likes").len(), 1);

    let (status, inbox) = get(&app, "/api/notifications", &author_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox, json!([]));
}

#[actix_web::test]
async fn like_notifies_author_by_default() {
    let (app, _repos, _dir) = spawn().await;
    let (author_token, _) = register(&app, "plain_author").await;
    let (fan_token, fan_id) = register(&app, "plain_fan").await;

    let post_id = create_post(&app, &author_token, "Likeable").await;
    post(&app, &format!("/api/posts/{post_id}/like"), &fan_token, Value::Null).await;

    let (status, inbox) = get(&app, "/api/notifications", &author_token).await;
    assert_eq!(status, StatusCode::OK);
    let rows = inbox.as_array().expect("inbox");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["kind"], json!("like"));
    assert_eq!(rows[0]["senderId"], json!(fan_id.to_string()));
    assert_eq!(rows[0]["read"], json!(false));
}

#[actix_web::test]
async fn self_like_never_notifies() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "narcissist").await;

    let post_id = create_post(&app, &token, "My own post").await;
    let (status, _) = post(&app, &format!("/api/posts/{post_id}/like"), &token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (_, inbox) = get(&app, "/api/notifications", &token).await;
    assert_eq!(inbox, json!([]));
}

#[actix_web::test]
async fn unlike_retracts_the_like_notification() {
    let (app, _repos, _dir) = spawn().await;
    let (author_token, _) = register(&app, "retract_author").await;
    let (fan_token, _) = register(&app, "fickle_fan").await;

    let post_id = create_post(&app, &author_token, "Toggled").await;
    let path = format!("/api/posts/{post_id}/like");
    post(&app, &path, &fan_token, Value::Null).await;
    post(&app, &path, &fan_token, Value::Null).await;

    let (_, inbox) = get(&app, "/api/notifications", &author_token).await;
    assert_eq!(inbox, json!([]));
}

#[actix_web::test]
async fn disguised_executable_fails_the_signature_scan() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "uploader_a").await;

    // shell.exe renamed to shell.png: extension and MIME pass, the PE
    // magic bytes do not.
    let pe_bytes = [0x4d, 0x5a, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];
    let (status, body) = upload(&app, &token, "shell.png", "image/png", &pe_bytes).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("File failed security scan"));
}

#[actix_web::test]
async fn executable_extension_is_rejected_before_the_scan() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "uploader_b").await;

    let (status, body) = upload(&app, &token, "shell.exe", "image/png", PNG_BYTES).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("dangerous file type"));
}

#[actix_web::test]
async fn clean_png_is_stored_under_a_random_token_name() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "uploader_c").await;

    let (status, body) = upload(&app, &token, "pixel.png", "image/png", PNG_BYTES).await;
    assert_eq!(status, StatusCode::OK, "upload: {body}");

    let stored = body["filename"].as_str().expect("filename");
    assert_eq!(stored.len(), 32 + ".png".len());
    assert!(stored.ends_with(".png"));
    assert!(
        stored[..32].chars().all(|c| c.is_ascii_hexdigit()),
        "token is not hex: {stored}"
    );
    assert_ne!(stored, "pixel.png");
    assert_eq!(body["originalName"], json!("pixel.png"));
    assert_eq!(body["isImage"], json!(true));

    // The stored artifact is downloadable under its token name.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/download/{stored}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = test::read_body(response).await;
    assert_eq!(bytes.as_ref(), PNG_BYTES);
}

#[actix_web::test]
async fn declined_friendship_blocks_any_new_request() {
    let (app, _repos, _dir) = spawn().await;
    let (alice_token, _) = register(&app, "alice").await;
    let (bob_token, bob_id) = register(&app, "bob").await;

    let (status, friendship) = post(
        &app,
        "/api/friends/request",
        &alice_token,
        json!({ "userId": bob_id.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let friendship_id = friendship["id"].as_str().expect("friendship id");

    let (status, declined) = post(
        &app,
        &format!("/api/friends/decline/{friendship_id}"),
        &bob_token,
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(declined["status"], json!("declined"));

    // The tombstone blocks a second attempt.
    let (status, body) = post(
        &app,
        "/api/friends/request",
        &alice_token,
        json!({ "userId": bob_id.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Friend request already exists"));
}

#[actix_web::test]
async fn dm_gate_friends_only_rejects_stranger_without_persisting() {
    let (app, _repos, _dir) = spawn().await;
    let (sender_token, _) = register(&app, "stranger").await;
    let (recipient_token, recipient_id) = register(&app, "guarded").await;

    let (status, _) = put(
        &app,
        "/api/user/dm-settings",
        &recipient_token,
        json!({ "allowDms": false, "allowDmsFromFriends": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/messages",
        &sender_token,
        json!({ "recipientId": recipient_id.to_string(), "content": "hello?" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], json!("guarded has disabled direct messages"));

    let (_, conversations) = get(&app, "/api/messages/conversations", &recipient_token).await;
    assert_eq!(conversations, json!([]));
}

#[actix_web::test]
async fn accepted_friend_passes_the_friends_only_dm_gate() {
    let (app, _repos, _dir) = spawn().await;
    let (sender_token, _) = register(&app, "warm_sender").await;
    let (recipient_token, recipient_id) = register(&app, "warm_recipient").await;

    put(
        &app,
        "/api/user/dm-settings",
        &recipient_token,
        json!({ "allowDms": false, "allowDmsFromFriends": true }),
    )
    .await;

    let (_, friendship) = post(
        &app,
        "/api/friends/request",
        &sender_token,
        json!({ "userId": recipient_id.to_string() }),
    )
    .await;
    let friendship_id = friendship["id"].as_str().expect("friendship id");
    let (status, _) = post(
        &app,
        &format!("/api/friends/accept/{friendship_id}"),
        &recipient_token,
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, message) = post(
        &app,
        "/api/messages",
        &sender_token,
        json!({ "recipientId": recipient_id.to_string(), "content": "hello friend" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message["content"], json!("hello friend"));

    let (_, unread) = get(&app, "/api/messages/unread-count", &recipient_token).await;
    assert_eq!(unread["count"], json!(1));
}

#[actix_web::test]
async fn pinning_keeps_at_most_one_pinned_post_per_partition() {
    let (app, repositories, _dir) = spawn().await;
    let (admin_token, _) = seed_admin(&repositories, "site_admin").await;

    let first = create_post(&app, &admin_token, "First announcement").await;
    let second = create_post(&app, &admin_token, "Second announcement").await;

    let (status, _) = post(&app, &format!("/api/posts/{first}/pin"), &admin_token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&app, &format!("/api/posts/{second}/pin"), &admin_token, Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    // Admin posts land in the official partition.
    let (_, posts) = get(&app, "/api/posts", &admin_token).await;
    let pinned: Vec<&Value> = posts
        .as_array()
        .expect("posts")
        .iter()
        .filter(|p| p["pinned"] == json!(true))
        .collect();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0]["id"], json!(second.to_string()));
}

#[actix_web::test]
async fn pin_requires_an_admin_caller() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "mere_mortal").await;
    let post_id = create_post(&app, &token, "Unpinnable").await;

    let (status, _) = post(&app, &format!("/api/posts/{post_id}/pin"), &token, Value::Null).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn profile_karma_is_stable_across_consecutive_fetches() {
    let (app, _repos, _dir) = spawn().await;
    let (author_token, _) = register(&app, "steady_author").await;
    let (fan_token, _) = register(&app, "steady_fan").await;

    let post_id = create_post(&app, &author_token, "Karma source").await;
    post(&app, &format!("/api/posts/{post_id}/like"), &fan_token, Value::Null).await;

    let (status, first) = get(&app, "/api/users/steady_author", &fan_token).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = get(&app, "/api/users/steady_author", &fan_token).await;

    assert_eq!(first["totalKarma"], json!(1));
    assert_eq!(first["totalKarma"], second["totalKarma"]);
    assert_eq!(first["karma"], second["karma"]);
}

#[actix_web::test]
async fn admin_routes_refuse_non_admins() {
    let (app, _repos, _dir) = spawn().await;
    let (token, _) = register(&app, "curious_user").await;

    for path in ["/api/admin/stats", "/api/admin/users", "/api/admin/posts"] {
        let (status, _) = get(&app, path, &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
    }
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let (app, _repos, _dir) = spawn().await;
    let (status, _) = call(&app, test::TestRequest::get().uri("/api/notifications"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
