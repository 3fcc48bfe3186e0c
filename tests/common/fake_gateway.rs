//! In-process stand-in for a gateway
//!
//! Serves the `/apis` management collection and proxies any other path with
//! a 200 when it falls under a live listen path. Changes to the collection
//! only go live after `reload_delay`, so callers have to wait for
//! convergence the same way they would against a real hot-reloading gateway.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use gateway_operator::domain::Definition;

use super::TEST_SECRET;

const AUTH_HEADER: &str = "x-tyk-authorization";

#[derive(Default)]
struct Inner {
    apis: Vec<Definition>,
    live_paths: Vec<String>,
    generation: u64,
}

#[derive(Clone)]
struct GatewayState {
    inner: Arc<Mutex<Inner>>,
    reload_delay: Duration,
}

impl GatewayState {
    /// Publish the current collection after the reload delay, unless a newer
    /// change has been made in the meantime.
    fn schedule_reload(&self) {
        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            inner.generation
        };

        let state = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(state.reload_delay).await;
            let mut inner = state.inner.lock().unwrap();
            if inner.generation == generation {
                inner.live_paths = inner
                    .apis
                    .iter()
                    .filter(|api| api.active)
                    .map(|api| api.proxy.listen_path.clone())
                    .collect();
            }
        });
    }
}

/// A running fake gateway bound to an ephemeral local port
pub struct FakeGateway {
    addr: SocketAddr,
    state: GatewayState,
    handle: JoinHandle<()>,
}

impl FakeGateway {
    pub async fn start(reload_delay: Duration) -> Self {
        let state = GatewayState { inner: Arc::default(), reload_delay };

        let app = Router::new()
            .route("/apis", get(list_apis).post(create_api))
            .route("/apis/{id}", put(update_api).delete(delete_api))
            .fallback(proxy)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake gateway");
        let addr = listener.local_addr().expect("fake gateway address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake gateway server");
        });

        Self { addr, state, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Snapshot of the stored collection
    pub fn apis(&self) -> Vec<Definition> {
        self.state.inner.lock().unwrap().apis.clone()
    }
}

impl Drop for FakeGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()) == Some(TEST_SECRET)
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({"status": "error", "message": "Access to this resource has been disallowed"})))
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"status": "error", "message": "API not found"})))
        .into_response()
}

async fn list_apis(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let apis = state.inner.lock().unwrap().apis.clone();
    Json(apis).into_response()
}

async fn create_api(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(def): Json<Definition>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    let key = def.api_id.clone();
    state.inner.lock().unwrap().apis.push(def);
    state.schedule_reload();

    Json(json!({"status": "ok", "key": key, "action": "added"})).into_response()
}

async fn update_api(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(def): Json<Definition>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    {
        let mut inner = state.inner.lock().unwrap();
        let Some(slot) = inner.apis.iter_mut().find(|api| api.api_id == id) else {
            return not_found();
        };
        *slot = def;
    }
    state.schedule_reload();

    Json(json!({"status": "ok", "key": id, "action": "modified"})).into_response()
}

async fn delete_api(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    {
        let mut inner = state.inner.lock().unwrap();
        let before = inner.apis.len();
        inner.apis.retain(|api| api.api_id != id);
        if inner.apis.len() == before {
            return not_found();
        }
    }
    state.schedule_reload();

    Json(json!({"status": "ok", "key": id, "action": "deleted"})).into_response()
}

async fn proxy(State(state): State<GatewayState>, uri: Uri) -> Response {
    let path = uri.path();
    let inner = state.inner.lock().unwrap();
    let routed = inner.live_paths.iter().any(|listen_path| {
        let prefix = listen_path.trim_end_matches('/');
        path == prefix || path.starts_with(&format!("{}/", prefix))
    });

    if routed {
        (StatusCode::OK, Json(json!({"url": path}))).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}
