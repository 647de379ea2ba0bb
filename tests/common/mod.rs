#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use zeroize::Zeroizing;

use notes::{
    AppState,
    config::{Backend, Config},
    router,
};

pub const PASSWORD: &str = "correct horse battery";

/// An in-memory app driven through `oneshot`, one client per instance.
pub struct TestApp {
    pub state: AppState,
    app: Router,
}

/// A client with its own cookie jar.
#[derive(Default, Clone)]
pub struct Client {
    pub cookies: BTreeMap<String, String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn csrf_token(&self) -> Option<String> {
        extract_csrf(&self.body)
    }

    pub fn assert_redirect_to(&self, target: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(target));
    }
}

pub fn test_config() -> Config {
    Config {
        backend: Backend::Memory,
        database_url: String::new(),
        redis_url: String::new(),
        session_duration_days: 7,
        session_secret: Zeroizing::new(vec![42u8; 64]),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        request_timeout_secs: 30,
        secure_cookies: false,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory(test_config()).expect("in-memory state"))
    }

    pub fn with_state(state: AppState) -> Self {
        let app = router(state.clone());
        Self { state, app }
    }

    pub async fn send(&self, client: &mut Client, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().expect("ascii cookie");
            let pair = raw.split(';').next().unwrap_or_default();
            let (name, val) = pair.split_once('=').unwrap_or((pair, ""));
            let removed = val.is_empty() || raw.contains("Max-Age=0");
            if removed {
                client.cookies.remove(name.trim());
            } else {
                client.cookies.insert(name.trim().to_string(), val.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn cookie_header(client: &Client) -> String {
        client
            .cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub async fn get(&self, client: &mut Client, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::COOKIE, Self::cookie_header(client))
            .body(Body::empty())
            .expect("request");
        self.send(client, request).await
    }

    pub async fn post(&self, client: &mut Client, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("form encoding");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, Self::cookie_header(client))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request");
        self.send(client, request).await
    }

    /// Registers `username` and returns the logged-in client.
    pub async fn register(&self, username: &str) -> Client {
        let mut client = Client::default();
        let email = format!("{}@example.com", username);
        let response = self
            .post(
                &mut client,
                "/register",
                &[
                    ("username", username),
                    ("password", PASSWORD),
                    ("email", email.as_str()),
                    ("first_name", "First"),
                    ("last_name", "Last"),
                ],
            )
            .await;
        response.assert_redirect_to(&format!("/users/{}", username));
        client
    }

    /// Fetches the CSRF token from the client's user page.
    pub async fn csrf(&self, client: &mut Client, username: &str) -> String {
        self.get(client, &format!("/users/{}", username))
            .await
            .csrf_token()
            .expect("user page carries a CSRF token")
    }

    /// Creates a note through the form and returns its id.
    pub async fn add_note(&self, client: &mut Client, username: &str, title: &str, content: &str) -> String {
        let csrf = self.csrf(client, username).await;
        let before = note_ids(&self.get(client, &format!("/users/{}", username)).await.body);

        let response = self
            .post(
                client,
                &format!("/users/{}/notes/add", username),
                &[("title", title), ("content", content), ("csrf_token", csrf.as_str())],
            )
            .await;
        response.assert_redirect_to(&format!("/users/{}", username));

        let after = note_ids(&self.get(client, &format!("/users/{}", username)).await.body);
        after
            .into_iter()
            .find(|id| !before.contains(id))
            .expect("new note is listed")
    }
}

pub fn extract_csrf(html: &str) -> Option<String> {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

/// Ids of the notes linked from a user page, in page order.
pub fn note_ids(html: &str) -> Vec<String> {
    html.match_indices("/notes/")
        .filter_map(|(i, _)| {
            let rest = &html[i + "/notes/".len()..];
            let id = rest.split('/').next()?;
            rest[id.len()..]
                .starts_with("/update")
                .then(|| id.to_string())
        })
        .collect()
}
