//! Local HTTP server for exercising the client against real sockets.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::auth::ServiceAccountKey;

pub const TEST_PRIVATE_KEY: &str = include_str!("testdata/test-key.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("testdata/test-key.pub.pem");

/// A service account key signed with the test RSA key.
pub fn service_account_key(token_uri: &str) -> ServiceAccountKey {
    let json = json!({
        "type": "service_account",
        "client_email": "drivestamp@test-project.iam.gserviceaccount.com",
        "private_key": TEST_PRIVATE_KEY,
        "private_key_id": "test-key-id",
        "token_uri": token_uri,
    });
    ServiceAccountKey::from_json(&json.to_string()).unwrap()
}

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(&self.body).into_owned().collect()
    }
}

#[derive(Default)]
struct ServerState {
    responses: HashMap<(String, String), VecDeque<(u16, Value)>>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<ServerState>>;

/// Serves scripted JSON responses and records every request.
pub struct MockServer {
    addr: SocketAddr,
    state: SharedState,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Queues one response for `method` and `path`; queued responses are served in order.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry((method.to_owned(), path.to_owned()))
            .or_default()
            .push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_owned(),
        query,
        authorization,
        body,
    });

    let key = (method.as_str().to_owned(), uri.path().to_owned());
    match state.responses.get_mut(&key).and_then(VecDeque::pop_front) {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, axum::Json(body)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"error": {"code": 404, "message": "No scripted response"}})),
        )
            .into_response(),
    }
}
