//! In-process stand-in for the protogen web server.
//!
//! Serves plain-text values keyed by request path, stores PUT bodies so a
//! later GET sees them, records every request, and can inject failures and
//! per-request delays. Bound to `127.0.0.1:0`; dropped backends stop
//! serving.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Default)]
struct MockState {
    values: HashMap<String, String>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, VecDeque<Duration>>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

pub struct MockBackend {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: SharedState = Arc::new(Mutex::new(MockState::default()));

        let app = router(state.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!(error = %e, "mock backend stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL to hand to the client
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `value` for GET requests to `path`
    pub fn set(&self, path: &str, value: &str) {
        self.state
            .lock()
            .values
            .insert(path.to_string(), value.to_string());
    }

    pub fn remove(&self, path: &str) {
        self.state.lock().values.remove(path);
    }

    pub fn value(&self, path: &str) -> Option<String> {
        self.state.lock().values.get(path).cloned()
    }

    /// Answer every request to `path` with `status` until [`recover`](Self::recover)
    pub fn fail(&self, path: &str, status: u16) {
        self.state.lock().failures.insert(path.to_string(), status);
    }

    pub fn recover(&self, path: &str) {
        self.state.lock().failures.remove(path);
    }

    /// Delay the next response for `path`; delays queue up per path
    pub fn delay_next(&self, path: &str, delay: Duration) {
        self.state
            .lock()
            .delays
            .entry(path.to_string())
            .or_default()
            .push_back(delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: SharedState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri.path().to_string();

    // Resolve the answer at request time; the delay only holds it back
    let (delay, answer) = {
        let mut state = state.lock();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            body: body.clone(),
        });
        let delay = state.delays.get_mut(&path).and_then(|q| q.pop_front());

        let answer = if let Some(status) = state.failures.get(&path).copied() {
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                String::new(),
            )
        } else if method == Method::GET {
            match state.values.get(&path) {
                Some(value) => (StatusCode::OK, value.clone()),
                None => (StatusCode::NOT_FOUND, String::new()),
            }
        } else if method == Method::PUT {
            state.values.insert(path.clone(), body);
            (StatusCode::OK, String::new())
        } else if method == Method::DELETE {
            state.values.remove(&path);
            (StatusCode::OK, String::new())
        } else {
            (StatusCode::OK, String::new())
        };

        (delay, answer)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    answer.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn send(
        state: &SharedState,
        method: &str,
        path: &str,
        body: &str,
    ) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let state = SharedState::default();
        let (status, _) = send(&state, "GET", "/protogen/head/emotion", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(&state, "PUT", "/protogen/head/emotion", "happy").await;
        let (status, body) = send(&state, "GET", "/protogen/head/emotion", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "happy");
    }

    #[tokio::test]
    async fn test_delete_removes_value() {
        let state = SharedState::default();
        send(&state, "PUT", "/protogen/minecraft/players/steve", "").await;
        send(&state, "DELETE", "/protogen/minecraft/players/steve", "").await;
        let (status, _) = send(&state, "GET", "/protogen/minecraft/players/steve", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_injected_failure_wins_over_value() {
        let state = SharedState::default();
        state
            .lock()
            .values
            .insert("/protogen/apps".to_string(), "snake".to_string());
        state.lock().failures.insert("/protogen/apps".to_string(), 503);

        let (status, _) = send(&state, "GET", "/protogen/apps", "").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.lock().requests.len(), 1);
    }
}
