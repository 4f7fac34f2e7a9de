#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use livelaunch_admin::{adapters::ApiClient, application::services::CredentialProvider};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn path_and_query(&self) -> String {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// What the stub sends back: a status plus a JSON body, or no body at all.
pub enum Reply {
    Json(StatusCode, Value),
    Empty(StatusCode),
    Text(StatusCode, &'static str),
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

/// In-process stand-in for the admin backend and the bucket.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl StubServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub bind failed");
        let addr = listener.local_addr().expect("stub local addr failed");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: Arc::clone(&requests),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(record).with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// A stub answering every request with `{"ok": true}`.
    pub async fn ok() -> Self {
        Self::start(|_| Reply::Json(StatusCode::OK, json!({"ok": true}))).await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path() == path)
            .collect()
    }

    pub fn client(&self, token: Option<&'static str>) -> ApiClient {
        let provider = move || token.map(str::to_string);
        client_for(&self.base_url, Arc::new(provider))
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

pub fn client_for(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> ApiClient {
    ApiClient::with_http_client(reqwest::Client::new(), base_url, credentials)
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        uri,
        headers,
        body,
    };
    let reply = (state.responder)(&request);
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(request);

    match reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Empty(status) => status.into_response(),
        Reply::Text(status, text) => (status, text).into_response(),
    }
}
