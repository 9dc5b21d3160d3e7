//! In-process HTTP server for exercising the client without the real API.
//!
//! An axum router answers every request with the next canned response and
//! records what it received. The server runs on its own thread and runtime so
//! tests can keep using the blocking client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use axum::Router;
use neon_client::NeonClient;

pub const TEST_KEY: &str = "test-api-key";

#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query, as sent on the request line.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First value of a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of values sent for a header.
    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .count()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

struct Shared {
    responses: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<mpsc::Sender<RecordedRequest>>,
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };
    let _ = shared.requests.lock().unwrap().send(recorded);

    let (status, body) = shared
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, "no canned response left".to_string()));

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub struct MockServer {
    base_url: String,
    requests: mpsc::Receiver<RecordedRequest>,
}

impl MockServer {
    /// Serve `responses` in order, one per request.
    pub fn start(responses: Vec<(u16, &str)>) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(Shared {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| (status, body.to_string()))
                    .collect(),
            ),
            requests: Mutex::new(tx),
        });
        let app = Router::new().fallback(record).with_state(shared);

        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self {
            base_url: format!("http://{addr}/api/v2/"),
            requests: rx,
        }
    }

    /// Serve a single `200 OK` with `body`.
    pub fn ok(body: &str) -> Self {
        Self::start(vec![(200, body)])
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn client(&self) -> NeonClient {
        NeonClient::new(TEST_KEY, Some(&self.base_url)).expect("build client")
    }

    pub fn next_request(&self) -> RecordedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("no request reached the mock server")
    }

    pub fn assert_no_request(&self) {
        if let Ok(req) = self.requests.recv_timeout(Duration::from_millis(200)) {
            panic!("unexpected request: {} {}", req.method, req.target);
        }
    }
}
