#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use skudesk_core::thumbnail::ThumbnailSpec;
use tempfile::TempDir;
use tower::ServiceExt;

use skudesk_api::auth::jwt::{generate_access_token, JwtConfig};
use skudesk_api::auth::password::hash_password;
use skudesk_api::config::ServerConfig;
use skudesk_api::router::build_app_router;
use skudesk_api::state::AppState;

pub const TEST_PIN: &str = "8892";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test `ServerConfig` whose files all live under `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        data_file: dir.join("data.json"),
        uploads_dir: dir.join("uploads"),
        public_dir: dir.join("public"),
        credentials_file: dir.join("credentials.json"),
        admin_username: ADMIN_USERNAME.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        clear_pin: TEST_PIN.to_string(),
        thumbnail: ThumbnailSpec {
            width: 40,
            quality: 80,
        },
        max_upload_bytes: 10 * 1024 * 1024,
        sheets_base_url: "http://127.0.0.1:9".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// An isolated server: temp directory, state, and a token for the admin.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
    pub token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestContext::new`], with a chance to adjust the config first.
    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        adjust(&mut config);

        let state = AppState::new(config);
        state.uploads.ensure().await.unwrap();
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        state
            .credentials
            .reset_admin(ADMIN_USERNAME, &hash)
            .await
            .unwrap();

        let token = generate_access_token(ADMIN_USERNAME, &state.config.jwt).unwrap();
        Self { dir, state, token }
    }

    /// The full application router, with the production middleware stack.
    pub fn app(&self) -> Router {
        build_app_router(self.state.clone(), &self.state.config)
    }

    pub fn upload_path(&self, name: &str) -> std::path::PathBuf {
        self.state.config.uploads_dir.join(name)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn delete_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::DELETE, uri, Some(token), body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

/// POST a multipart form built with [`MultipartBody`].
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    form: MultipartBody,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, form.content_type())
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Import `rows` through the API and return the `data` of the response.
pub async fn import(ctx: &TestContext, rows: Value) -> Value {
    let response = post_json_auth(
        ctx.app(),
        "/api/v1/items/import/rows",
        &ctx.token,
        serde_json::json!({ "rows": rows }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// A small PNG, enough for the thumbnail renderer.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Minimal `multipart/form-data` encoder.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "skudesk-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}
