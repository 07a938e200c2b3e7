//! In-process HTTP server answering every request with a canned body.
//!
//! Stands in for a GeoServer endpoint in resolver and CLI tests. Request URIs
//! (path and query) are recorded so tests can assert on what was asked for.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Arc<str>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// A running fixture server. Shuts down on drop.
pub struct FixtureServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Serve `body` with HTTP 200 on every path.
    pub async fn start(body: impl Into<String>) -> Self {
        Self::spawn(StatusCode::OK, body.into(), None).await
    }

    /// Serve `body` with the given status code.
    pub async fn start_with_status(status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).expect("valid HTTP status");
        Self::spawn(status, body.into(), None).await
    }

    /// Serve `body` after sleeping `delay` on every request.
    pub async fn start_delayed(delay: Duration, body: impl Into<String>) -> Self {
        Self::spawn(StatusCode::OK, body.into(), Some(delay)).await
    }

    async fn spawn(status: StatusCode, body: String, delay: Option<Duration>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let canned = Canned {
            status,
            body: Arc::from(body),
            delay,
            requests: requests.clone(),
        };
        let app = Router::new().fallback(respond).with_state(canned);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture server address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// `http://127.0.0.1:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A datasource host in dashboard form, ending in the `ows` endpoint.
    pub fn host(&self) -> String {
        format!("{}/geoserver/ows", self.base_url())
    }

    /// Path and query of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(State(canned): State<Canned>, uri: Uri) -> impl IntoResponse {
    canned
        .requests
        .lock()
        .expect("request log")
        .push(uri.to_string());

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    (
        canned.status,
        [(header::CONTENT_TYPE, "text/xml; charset=UTF-8")],
        canned.body.to_string(),
    )
}
