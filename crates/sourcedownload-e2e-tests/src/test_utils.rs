use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::stream::{self, StreamExt};
use serde_json::{Value, json};
use sourcedownload_lib::download::{FileDownloader, ProgressSink, SilentProgress};
use sourcedownload_lib::{CatalogClient, FetchPipeline};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

pub type ArtifactHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
enum Artifact {
    Complete(Vec<u8>),
    Chunked(Vec<Vec<u8>>),
    /// Sends the bytes, then aborts the body.
    Truncated(Vec<u8>),
}

#[derive(Default)]
struct ServerState {
    snaps: Mutex<HashMap<String, (StatusCode, String)>>,
    listing: Mutex<Option<(StatusCode, String)>>,
    artifacts: Mutex<HashMap<String, Artifact>>,
    requests: Mutex<Vec<String>>,
    artifact_hook: Mutex<Option<ArtifactHook>>,
}

/// In-process stand-in for both the compliance service and the artifact hosts.
pub struct MockServer {
    base_url: Url,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let router = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener
            .local_addr()
            .expect("Mock server has no local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock server failed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).expect("Invalid mock server URL"),
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .expect("Invalid artifact path")
            .to_string()
    }

    pub fn set_snap(&self, snap: &str, revision: u32, entry: Value) {
        self.set_snap_raw(
            snap,
            revision,
            StatusCode::OK,
            json!({ "snap": entry }).to_string(),
        );
    }

    pub fn set_snap_error(&self, snap: &str, revision: u32, status: StatusCode, message: &str) {
        self.set_snap_raw(snap, revision, status, json!({ "error": message }).to_string());
    }

    pub fn set_snap_raw(&self, snap: &str, revision: u32, status: StatusCode, body: String) {
        self.state
            .snaps
            .lock()
            .unwrap()
            .insert(format!("{snap}/{revision}"), (status, body));
    }

    pub fn set_listing(&self, status: StatusCode, body: String) {
        *self.state.listing.lock().unwrap() = Some((status, body));
    }

    pub fn add_artifact(&self, path: &str, content: &[u8]) {
        self.insert_artifact(path, Artifact::Complete(content.to_vec()));
    }

    pub fn add_chunked_artifact(&self, path: &str, chunks: Vec<Vec<u8>>) {
        self.insert_artifact(path, Artifact::Chunked(chunks));
    }

    pub fn add_truncated_artifact(&self, path: &str, content: &[u8]) {
        self.insert_artifact(path, Artifact::Truncated(content.to_vec()));
    }

    /// Run `hook` with the request path before an artifact body is served.
    pub fn on_artifact_request(&self, hook: ArtifactHook) {
        *self.state.artifact_hook.lock().unwrap() = Some(hook);
    }

    /// Every request path in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    fn insert_artifact(&self, path: &str, artifact: Artifact) {
        self.state
            .artifacts
            .lock()
            .unwrap()
            .insert(path.to_string(), artifact);
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_request(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    tracing::debug!(%path, "Mock server request");
    state.requests.lock().unwrap().push(path.clone());

    if path == "/v1/snaps" {
        let listing = state.listing.lock().unwrap().clone();
        let (status, body) =
            listing.unwrap_or((StatusCode::OK, json!({ "snaps": [] }).to_string()));
        return json_response(status, body);
    }

    if let Some(key) = path.strip_prefix("/v1/snaps/") {
        let snap = state.snaps.lock().unwrap().get(key).cloned();
        let (status, body) = snap.unwrap_or((
            StatusCode::NOT_FOUND,
            json!({ "error": "snap not found" }).to_string(),
        ));
        return json_response(status, body);
    }

    let artifact = state.artifacts.lock().unwrap().get(&path).cloned();
    let Some(artifact) = artifact else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    let hook = state.artifact_hook.lock().unwrap().clone();
    if let Some(hook) = hook {
        hook(&path);
    }

    match artifact {
        Artifact::Complete(content) => (StatusCode::OK, content).into_response(),
        Artifact::Chunked(chunks) => Response::new(Body::from_stream(stream::iter(
            chunks.into_iter().map(Ok::<_, std::io::Error>),
        ))),
        Artifact::Truncated(content) => {
            // Promise more than is sent so the client can't mistake the abort for a clean end.
            let declared_length = content.len() * 2 + 1;
            let body = stream::once(async move { Ok::<_, std::io::Error>(content) }).chain(
                stream::once(async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Err(std::io::Error::new(
                        std::io::ErrorKind::ConnectionAborted,
                        "connection closed prematurely",
                    ))
                }),
            );
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, declared_length)
                .body(Body::from_stream(body))
                .expect("Failed to build truncated response")
        }
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Records every progress callback for later assertions.
#[derive(Default)]
pub struct RecordingProgress {
    pub updates: Mutex<Vec<(String, u64)>>,
    pub finished: Mutex<Vec<(String, u64)>>,
}

impl ProgressSink for RecordingProgress {
    fn update(&self, file_name: &str, transferred: u64) {
        self.updates
            .lock()
            .unwrap()
            .push((file_name.to_string(), transferred));
    }

    fn finish(&self, file_name: &str, transferred: u64) {
        self.finished
            .lock()
            .unwrap()
            .push((file_name.to_string(), transferred));
    }
}

pub fn encode_manifest(manifest: &str) -> String {
    STANDARD.encode(manifest)
}

pub fn downloader(progress: Arc<dyn ProgressSink>) -> FileDownloader {
    FileDownloader::new(reqwest::Client::new(), progress)
}

pub fn catalog_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(reqwest::Client::new(), server.base_url())
        .expect("Mock server URL must be usable as a catalog base")
}

pub fn pipeline(server: &MockServer, root: &Path) -> FetchPipeline {
    FetchPipeline::new(
        catalog_client(server),
        downloader(Arc::new(SilentProgress)),
        root,
    )
}

/// A URL on a port nothing listens on.
pub async fn unreachable_url(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Reserved port has no address");
    drop(listener);
    format!("http://{addr}{path}")
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("sourcedownload_lib=debug,sourcedownload_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
