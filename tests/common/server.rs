//! In-process test server
//!
//! Builds the full router over an in-memory database and drives it with
//! `tower::ServiceExt::oneshot`, one request at a time.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use chirp::backend::routes::create_router;
use chirp::backend::server::config::connect_database;
use chirp::backend::server::{AppState, ServerConfig};

pub const PASSWORD: &str = "secret1";

pub struct TestServer {
    router: Router,
    pub uploads: TempDir,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// Value of a cookie set by this response
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies.iter().find_map(|c| {
            let pair = c.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

impl TestServer {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().expect("upload dir");
        let config = ServerConfig {
            bcrypt_cost: 4,
            upload_dir: uploads.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let pool = connect_database("sqlite::memory:").await.expect("database");
        let router = create_router(AppState::new(pool, config));
        Self { router, uploads }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            set_cookies,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register `username` (email `<username>@example.com`) and return the
    /// created profile
    pub async fn register(&self, username: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/users/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data().clone()
    }

    /// Log in and return the full login response
    pub async fn login(&self, username: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(serde_json::json!({ "username": username, "password": PASSWORD })),
        )
        .await
    }

    /// Register and log in; returns (user id, access token)
    pub async fn sign_up(&self, username: &str) -> (String, String) {
        let profile = self.register(username).await;
        let login = self.login(username).await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        (
            profile["id"].as_str().expect("id").to_string(),
            login.data()["accessToken"].as_str().expect("token").to_string(),
        )
    }
}

/// A `multipart/form-data` body with text fields and one optional file
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let boundary = "----chirp-integration-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, data)) = file {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                name, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}
