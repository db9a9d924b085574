//! In-process stand-in for a workspace's Jobs API
//!
//! Responses are scripted per method and path and served in order; every
//! request is recorded for assertions. Available to other crates' tests
//! through the `test-util` feature.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::{DatabricksClient, WorkspaceConfig};

/// A request as seen by the fake workspace
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct Scripted {
    status: u16,
    body: String,
    content_type: &'static str,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<(String, String), VecDeque<Scripted>>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<Inner>>;

pub struct FakeWorkspace {
    addr: SocketAddr,
    inner: Shared,
    handle: JoinHandle<()>,
}

impl FakeWorkspace {
    pub async fn start() -> Self {
        let inner: Shared = Arc::new(Mutex::new(Inner::default()));
        let app = Router::new().fallback(handle).with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            inner,
            handle,
        }
    }

    pub fn client(&self) -> DatabricksClient {
        let config = WorkspaceConfig::new(format!("http://{}", self.addr), "dapi-test");
        DatabricksClient::new(&config).unwrap()
    }

    pub fn push_get(&self, path: &str, status: u16, body: serde_json::Value) {
        self.push("GET", path, status, body.to_string(), "application/json");
    }

    pub fn push_post(&self, path: &str, status: u16, body: serde_json::Value) {
        self.push("POST", path, status, body.to_string(), "application/json");
    }

    pub fn push_raw_get(&self, path: &str, status: u16, body: &str) {
        self.push("GET", path, status, body.to_string(), "text/plain");
    }

    fn push(&self, method: &str, path: &str, status: u16, body: String, content_type: &'static str) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(Scripted {
                status,
                body,
                content_type,
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Drop for FakeWorkspace {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(inner): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let mut inner = inner.lock().unwrap();

    inner.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().unwrap_or_default().to_string(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let scripted = inner
        .responses
        .get_mut(&(method.to_string(), path.clone()))
        .and_then(VecDeque::pop_front);

    match scripted {
        Some(s) => (
            StatusCode::from_u16(s.status).unwrap(),
            [(CONTENT_TYPE, s.content_type)],
            s.body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            format!(
                r#"{{"error_code":"ENDPOINT_NOT_FOUND","message":"no scripted response for {} {}"}}"#,
                method, path
            ),
        )
            .into_response(),
    }
}
