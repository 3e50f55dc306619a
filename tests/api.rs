use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use jobboard::{
    AppState, config::Config, database::MemoryDatabase, router::build_router, routes,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-0123456789";
const ADMIN_EMAIL: &str = "root@jobboard.test";
const ADMIN_PASSWORD: &str = "admin-pass";

struct TestApp {
    router: Router,
    state: AppState,
    _uploads: TempDir,
}

async fn setup() -> TestApp {
    setup_with_admin(ADMIN_EMAIL).await
}

async fn setup_with_admin(admin_email: &str) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = Config::for_memory(SECRET, uploads.path().to_path_buf());
    config.admin_email = Some(admin_email.into());
    config.admin_password = Some(ADMIN_PASSWORD.into());

    let state = AppState::new(Arc::new(MemoryDatabase::new()), config);
    routes::account::seed_admin(&state).await.unwrap();
    TestApp {
        router: build_router(state.clone()),
        state,
        _uploads: uploads,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(&self, login: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/accounts/login",
                None,
                Some(json!({ "login": login, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["resp_data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Returns (token, employer id).
    async fn employer(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/accounts/register/employer",
                None,
                Some(json!({
                    "email": format!("{}@corp.test", username),
                    "username": username,
                    "password": "password1",
                    "name": format!("{} Ltd", username),
                    "industry": "Software",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let token = body["resp_data"]["token"].as_str().unwrap().to_string();

        let (_, me) = self.send(Method::GET, "/api/accounts/me", Some(&token), None).await;
        let id = me["resp_data"]["employer"]["id"].as_str().unwrap().to_string();
        (token, id)
    }

    /// Returns (token, account id, candidate id).
    async fn candidate(&self, username: &str) -> (String, String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/accounts/register/candidate",
                None,
                Some(json!({
                    "email": format!("{}@mail.test", username),
                    "username": username,
                    "password": "password1",
                    "full_name": "Casey Candidate",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let token = body["resp_data"]["token"].as_str().unwrap().to_string();
        let account_id = body["resp_data"]["account"]["id"].as_str().unwrap().to_string();

        let (_, me) = self.send(Method::GET, "/api/accounts/me", Some(&token), None).await;
        let id = me["resp_data"]["candidate"]["id"].as_str().unwrap().to_string();
        (token, account_id, id)
    }

    async fn post_job(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/jobs",
                Some(token),
                Some(json!({
                    "title": title,
                    "location": "Hanoi",
                    "quantity": 1,
                    "expires_at": Utc::now() + Duration::days(10),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["resp_data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn register_login_and_me() {
    let app = setup().await;
    let (token, _, candidate_id) = app.candidate("casey").await;

    let by_email = app.login("CASEY@mail.test", "password1").await;
    assert!(!by_email.is_empty());
    let by_username = app.login("casey", "password1").await;
    assert!(!by_username.is_empty());

    let (status, body) = app.send(Method::GET, "/api/accounts/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["account"]["role"], "Candidate");
    assert_eq!(body["resp_data"]["candidate"]["id"], candidate_id.as_str());
    assert!(body["resp_data"]["account"].get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_duplicate_email_are_rejected() {
    let app = setup().await;
    app.candidate("casey").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/accounts/login",
            None,
            Some(json!({ "login": "casey", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/accounts/register/candidate",
            None,
            Some(json!({
                "email": "casey@mail.test",
                "username": "casey2",
                "password": "password1",
                "full_name": "Other",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn protected_routes_require_token_and_role() {
    let app = setup().await;
    let (candidate, _, _) = app.candidate("casey").await;

    let (status, body) = app.send(Method::GET, "/api/accounts/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, _) = app
        .send(Method::GET, "/api/accounts/me", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/jobs",
            Some(&candidate),
            Some(json!({
                "title": "Nope",
                "quantity": 1,
                "expires_at": Utc::now() + Duration::days(1),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, "/api/admin/accounts", Some(&candidate), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employer_jobs_list_only_their_postings() {
    let app = setup().await;
    let (acme, acme_id) = app.employer("acme").await;
    let (other, _) = app.employer("globex").await;

    let job_id = app.post_job(&acme, "Rust Engineer").await;
    app.post_job(&other, "Go Engineer").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/employers/{}/jobs", acme_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["resp_data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], job_id.as_str());
    assert_eq!(items[0]["status"], "Open");
    assert_eq!(items[0]["time_remaining"], "9 days left");

    let (_, mine) = app.send(Method::GET, "/api/employers/me/jobs", Some(&acme), None).await;
    assert_eq!(mine["resp_data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn job_listing_is_paginated() {
    let app = setup().await;
    let (acme, _) = app.employer("acme").await;
    for i in 0..15 {
        app.post_job(&acme, &format!("Job {}", i)).await;
    }

    let (_, first) = app.send(Method::GET, "/api/jobs", None, None).await;
    assert_eq!(first["resp_data"]["items"].as_array().unwrap().len(), 7);
    assert_eq!(first["resp_data"]["pagination"]["total"], 15);
    assert_eq!(first["resp_data"]["pagination"]["total_pages"], 3);

    let (_, last) = app.send(Method::GET, "/api/jobs?page=3", None, None).await;
    assert_eq!(last["resp_data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(last["resp_data"]["pagination"]["page"], 3);
}

#[tokio::test]
async fn apply_and_review_flow() {
    let app = setup().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, casey_id) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;

    let apply_uri = format!("/api/jobs/{}/apply", job_id);
    let (status, body) = app
        .send(
            Method::POST,
            &apply_uri,
            Some(&casey),
            Some(json!({ "cover_letter": "Hire me" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["resp_data"]["status"], "NotReviewed");

    let (status, _) = app
        .send(Method::POST, &apply_uri, Some(&casey), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["applications"]["total"], 1);
    assert_eq!(body["resp_data"]["applications"]["not_reviewed"], 1);
    assert_eq!(body["resp_data"]["employer"]["name"], "acme Ltd");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/jobs/{}/applications/{}", job_id, casey_id),
            Some(&acme),
            Some(json!({ "status": "Suitable" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["resp_data"]["status"], "Suitable");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/jobs/{}/applications", job_id),
            Some(&acme),
            None,
        )
        .await;
    let items = body["resp_data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["candidate"]["full_name"], "Casey Candidate");

    let (_, mine) = app
        .send(Method::GET, "/api/candidates/me/applications", Some(&casey), None)
        .await;
    assert_eq!(mine["resp_data"]["items"][0]["job"]["title"], "Rust Engineer");
}

#[tokio::test]
async fn job_with_applications_cannot_be_deleted() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;

    app.send(
        Method::POST,
        &format!("/api/jobs/{}/apply", job_id),
        Some(&casey),
        Some(json!({})),
    )
    .await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/admin/jobs/{}", job_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = app
        .send(Method::GET, "/api/candidates/me/applications", Some(&casey), None)
        .await;
    assert_eq!(mine["resp_data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn deleting_an_account_removes_its_candidate() {
    let app = setup().await;
    let admin = app.admin().await;
    let (_, account_id, candidate_id) = app.candidate("casey").await;

    let (status, _) = app
        .send(Method::GET, &format!("/api/candidates/{}", candidate_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/accounts/{}", account_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, &format!("/api/candidates/{}", candidate_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn locked_jobs_are_hidden_from_the_public() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/admin/jobs/{}/lock", job_id),
            Some(&admin),
            Some(json!({ "lock_flg": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["status"], "Locked");

    let detail = format!("/api/jobs/{}", job_id);
    let (status, _) = app.send(Method::GET, &detail, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send(Method::GET, &detail, Some(&acme), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.send(Method::GET, "/api/jobs", None, None).await;
    assert_eq!(list["resp_data"]["pagination"]["total"], 0);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/jobs/{}/apply", job_id),
            Some(&casey),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_jobs_close_and_can_be_purged() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;
    app.post_job(&acme, "Still open").await;

    app.send(
        Method::POST,
        &format!("/api/jobs/{}/apply", job_id),
        Some(&casey),
        Some(json!({})),
    )
    .await;

    let (status, body) = app
        .send(Method::POST, &format!("/api/jobs/{}/expire", job_id), Some(&acme), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["status"], "Expired");
    assert_eq!(body["resp_data"]["time_remaining"], "Expired");

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/jobs/{}/apply", job_id),
            Some(&casey),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/admin/jobs/purge-expired",
            Some(&admin),
            Some(json!({ "before": Utc::now() + Duration::seconds(1) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["resp_data"]["jobs"], 1);

    let (_, list) = app.send(Method::GET, "/api/jobs", None, None).await;
    assert_eq!(list["resp_data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn contacts_and_policies() {
    let app = setup().await;
    let admin = app.admin().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/contacts",
            None,
            Some(json!({ "name": "Visitor", "email": "v@site.test", "message": "Hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.send(Method::GET, "/api/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, contacts) = app.send(Method::GET, "/api/contacts", Some(&admin), None).await;
    assert_eq!(contacts["resp_data"]["items"][0]["name"], "Visitor");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/policies",
            Some(&admin),
            Some(json!({ "title": "Privacy", "content": "We keep little." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let policy_id = body["resp_data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/policies/{}", policy_id);

    let (status, _) = app
        .send(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "title": "Privacy", "content": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["content"], "We keep little.");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// One multipart part: field name, optional file name, content.
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_form(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let boundary = "jobboard-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        let disposition = match file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream",
                name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"", name),
        };
        body.extend_from_slice(format!("--{}\r\n{}\r\n\r\n", boundary, disposition).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn multipart_request(uri: &str, token: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    multipart_form(uri, token, &[("file", Some(file_name), data)])
}

#[tokio::test]
async fn cv_upload_is_stored_and_served() {
    let app = setup().await;
    let (casey, _, _) = app.candidate("casey").await;

    let (status, _) = app
        .dispatch(multipart_request("/api/candidates/me/cv", &casey, "cv.exe", b"MZ"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .dispatch(multipart_request(
            "/api/candidates/me/cv",
            &casey,
            "cv.pdf",
            b"%PDF-1.4 test",
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let url = body["resp_data"]["cv"].as_str().unwrap().to_string();
    assert!(url.starts_with("/images/") && url.ends_with(".pdf"));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 test");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = setup().await;
    let (acme, _) = app.employer("acme").await;
    let data = vec![0u8; 1024 * 1024 + 1];

    let (status, body) = app
        .dispatch(multipart_request("/api/employers/me/avatar", &acme, "logo.png", &data))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 1006);
}

#[tokio::test]
async fn purge_never_touches_open_jobs() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;
    app.send(
        Method::POST,
        &format!("/api/jobs/{}/apply", job_id),
        Some(&casey),
        Some(json!({})),
    )
    .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/admin/jobs/purge-expired",
            Some(&admin),
            Some(json!({ "before": Utc::now() + Duration::days(30) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["resp_data"]["jobs"], 0);
    assert_eq!(body["resp_data"]["applications"], 0);

    let (status, detail) = app
        .send(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["resp_data"]["applications"]["total"], 1);
}

#[tokio::test]
async fn admin_with_short_email_is_seeded() {
    let app = setup_with_admin("ad@corp.io").await;
    let token = app.login("ad@corp.io", ADMIN_PASSWORD).await;
    let (_, me) = app.send(Method::GET, "/api/accounts/me", Some(&token), None).await;
    assert_eq!(me["resp_data"]["account"]["role"], "Admin");
    assert_eq!(me["resp_data"]["account"]["username"], "admin");
}

#[tokio::test]
async fn seeding_picks_a_free_username() {
    let app = setup().await;
    app.candidate("admin").await;

    let mut config = app.state.config.clone();
    config.admin_email = Some("admin@other.test".into());
    let state = AppState::new(app.state.db.clone(), config);
    routes::account::seed_admin(&state).await.unwrap();

    let token = app.login("admin@other.test", ADMIN_PASSWORD).await;
    let (_, me) = app.send(Method::GET, "/api/accounts/me", Some(&token), None).await;
    assert_eq!(me["resp_data"]["account"]["username"], "admin1");
}

#[tokio::test]
async fn malformed_input_uses_the_error_envelope() {
    let app = setup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/accounts/register/candidate",
            None,
            Some(json!({
                "email": "casey@mail.test",
                "username": "casey",
                "password": "password1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1000);
    assert!(body["msg"].as_str().unwrap().contains("full_name"));

    let (status, body) = app.send(Method::GET, "/api/jobs?page=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1000);
}

#[tokio::test]
async fn accounts_referenced_by_applications_cannot_be_deleted() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, casey_account, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;
    app.send(
        Method::POST,
        &format!("/api/jobs/{}/apply", job_id),
        Some(&casey),
        Some(json!({})),
    )
    .await;

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/accounts/{}", casey_account),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1001);

    let (_, acme_me) = app.send(Method::GET, "/api/accounts/me", Some(&acme), None).await;
    let acme_account = acme_me["resp_data"]["account"]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/accounts/{}", acme_account),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, detail) = app
        .send(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["resp_data"]["applications"]["total"], 1);
}

#[tokio::test]
async fn only_the_owner_manages_a_job() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (globex, _) = app.employer("globex").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;
    let job_uri = format!("/api/jobs/{}", job_id);

    let (status, _) = app
        .send(
            Method::PUT,
            &job_uri,
            Some(&globex),
            Some(json!({
                "title": "Hijacked",
                "quantity": 1,
                "expires_at": Utc::now() + Duration::days(3),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let expire_uri = format!("{}/expire", job_uri);
    let (status, _) = app.send(Method::POST, &expire_uri, Some(&globex), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, detail) = app.send(Method::GET, &job_uri, None, None).await;
    assert_eq!(detail["resp_data"]["title"], "Rust Engineer");
    assert_eq!(detail["resp_data"]["status"], "Open");

    let (status, body) = app.send(Method::POST, &expire_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["status"], "Expired");
}

#[tokio::test]
async fn admin_job_list_filters_by_status_and_lock() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let open = app.post_job(&acme, "Open one").await;
    let expired = app.post_job(&acme, "Expired one").await;
    let locked = app.post_job(&acme, "Locked one").await;

    app.send(Method::POST, &format!("/api/jobs/{}/expire", expired), Some(&acme), None)
        .await;
    app.send(
        Method::PUT,
        &format!("/api/admin/jobs/{}/lock", locked),
        Some(&admin),
        Some(json!({ "lock_flg": 1 })),
    )
    .await;

    let ids = |body: &Value| -> Vec<String> {
        body["resp_data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, all) = app.send(Method::GET, "/api/admin/jobs", Some(&admin), None).await;
    assert_eq!(all["resp_data"]["pagination"]["total"], 3);

    let (_, body) = app
        .send(Method::GET, "/api/admin/jobs?status=Open", Some(&admin), None)
        .await;
    assert_eq!(ids(&body), vec![open]);

    let (_, body) = app
        .send(Method::GET, "/api/admin/jobs?status=Expired", Some(&admin), None)
        .await;
    assert_eq!(ids(&body), vec![expired]);

    let (_, body) = app
        .send(Method::GET, "/api/admin/jobs?lock_flg=1", Some(&admin), None)
        .await;
    assert_eq!(ids(&body), vec![locked]);

    let (status, _) = app.send(Method::GET, "/api/admin/jobs", Some(&acme), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn locked_jobs_are_hidden_from_applicants() {
    let app = setup().await;
    let admin = app.admin().await;
    let (acme, _) = app.employer("acme").await;
    let (casey, _, _) = app.candidate("casey").await;
    let job_id = app.post_job(&acme, "Rust Engineer").await;
    app.send(
        Method::POST,
        &format!("/api/jobs/{}/apply", job_id),
        Some(&casey),
        Some(json!({})),
    )
    .await;
    app.send(
        Method::PUT,
        &format!("/api/admin/jobs/{}/lock", job_id),
        Some(&admin),
        Some(json!({ "lock_flg": 1 })),
    )
    .await;

    let (_, mine) = app
        .send(Method::GET, "/api/candidates/me/applications", Some(&casey), None)
        .await;
    let item = &mine["resp_data"]["items"][0];
    assert_eq!(item["job_posting_id"], job_id.as_str());
    assert!(item["job"].is_null());
}

#[tokio::test]
async fn sample_cvs_are_published_and_removed_by_admins() {
    let app = setup().await;
    let admin = app.admin().await;
    let (casey, _, _) = app.candidate("casey").await;
    let parts: [Part<'_>; 4] = [
        ("title", None, &b"Backend CV"[..]),
        ("description", None, &b"Two pages"[..]),
        ("file", Some("sample.pdf"), &b"%PDF-1.4 sample"[..]),
        ("image", Some("preview.png"), &b"\x89PNG preview"[..]),
    ];

    let (status, _) = app
        .dispatch(multipart_form("/api/sample-cvs", &casey, &parts))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .dispatch(multipart_form("/api/sample-cvs", &admin, &parts))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let cv = &body["resp_data"];
    assert_eq!(cv["title"], "Backend CV");
    assert!(cv["file"].as_str().unwrap().ends_with(".pdf"));
    assert!(cv["image"].as_str().unwrap().ends_with(".png"));
    let id = cv["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .dispatch(multipart_form(
            "/api/sample-cvs",
            &admin,
            &[("title", None, &b"No file"[..])],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (_, list) = app.send(Method::GET, "/api/sample-cvs", None, None).await;
    assert_eq!(list["resp_data"]["pagination"]["total"], 1);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/sample-cvs/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.send(Method::GET, "/api/sample-cvs", None, None).await;
    assert_eq!(list["resp_data"]["pagination"]["total"], 0);
}
