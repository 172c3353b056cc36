//! Test utilities for HTTP clients.
//!
//! [`RecordingServer`] is a local HTTP listener that answers every request
//! with a fixed status and JSON body and keeps what it received, so client
//! tests can assert on what actually went over the wire.
//!
//! # Example
//!
//! ```ignore
//! let server = RecordingServer::start(StatusCode::OK, json!({"ok": true})).await;
//! // point a client at server.url and make a call
//! let requests = server.requests();
//! assert_eq!(requests.len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::Value;

/// One request as the server received it
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    /// Path and query
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    /// Header value, or "" when absent
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body should be JSON")
    }

    /// Decode an `application/x-www-form-urlencoded` body, in field order
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let decode = |s: &str| {
            urlencoding::decode(&s.replace('+', " "))
                .expect("Form field should be valid UTF-8")
                .into_owned()
        };
        self.body_text()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (decode(name), decode(value)),
                None => (decode(pair), String::new()),
            })
            .collect()
    }
}

#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    body: Value,
}

/// Local HTTP server that records every request
pub struct RecordingServer {
    /// Base URL, e.g. `http://127.0.0.1:54321`
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl RecordingServer {
    /// Start a server on an ephemeral port answering `status` with `body`
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let recorder = Recorder {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            body,
        };
        let requests = recorder.requests.clone();
        let app = Router::new().fallback(record).with_state(recorder);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Test server has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    recorder.requests.lock().unwrap().push(CapturedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body,
    });
    (recorder.status, Json(recorder.body.clone()))
}
