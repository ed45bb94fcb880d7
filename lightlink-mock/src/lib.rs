use std::collections::HashSet;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use lightlink_api::API_KEY_HEADER;
use lightlink_api::models::ControlRequest;
use serde_json::json;
use tokio::net::TcpListener;

use crate::settings::{MockDevice, Settings};

pub mod settings;

pub const DEVICES_PATH: &str = "/router/api/v1/user/devices";
pub const CONTROL_PATH: &str = "/v1/devices/control";

#[derive(Clone)]
struct MockState {
    api_key: Arc<String>,
    devices: Arc<Vec<MockDevice>>,
    failing: Arc<HashSet<String>>,
    commands: Arc<Mutex<Vec<ControlRequest>>>,
}

/// In-process stand-in for the Govee cloud.
#[derive(Clone)]
pub struct MockGovee {
    state: MockState,
}

impl MockGovee {
    pub fn new(api_key: &str, devices: Vec<MockDevice>) -> Self {
        Self {
            state: MockState {
                api_key: Arc::new(api_key.to_string()),
                devices: Arc::new(devices),
                failing: Arc::new(HashSet::new()),
                commands: Arc::new(Mutex::new(Vec::new())),
            },
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.account.api_key, settings.devices.clone())
            .with_failing(settings.account.failing_devices.iter().cloned())
    }

    /// Control requests for these devices answer with a server error.
    pub fn with_failing<I>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.state.failing = Arc::new(devices.into_iter().collect());
        self
    }

    /// Accepted control requests, oldest first.
    pub fn commands(&self) -> Vec<ControlRequest> {
        self.state
            .commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(DEVICES_PATH, get(list_devices))
            .route(CONTROL_PATH, put(control_device))
            .with_state(self.state.clone())
    }

    /// Serves on `address` in a background task and returns the bound address.
    pub async fn spawn(&self, address: SocketAddr) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(address).await?;
        let bound = listener.local_addr()?;
        let app = self.router();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock server stopped: {}", e);
            }
        });

        tracing::debug!("mock Govee API listening on {}", bound);

        Ok(bound)
    }
}

pub async fn run(settings: &Arc<Settings>) -> io::Result<()> {
    let ip_addr = settings
        .server
        .host
        .parse::<IpAddr>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, MockGovee::from_settings(settings).router()).await
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == state.api_key.as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": 401, "message": "Invalid API Key" })),
    )
        .into_response()
}

async fn list_devices(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    Json(json!({
        "code": 200,
        "message": "success",
        "data": state.devices.as_ref()
    }))
    .into_response()
}

async fn control_device(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(request): Json<ControlRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let known = state
        .devices
        .iter()
        .any(|device| device.device == request.device && device.sku == request.model);
    if !known {
        tracing::debug!("Rejecting control for unknown device {}", request.device);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 400, "message": "devices not exist" })),
        )
            .into_response();
    }

    if state.failing.contains(&request.device) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": 500, "message": "device offline" })),
        )
            .into_response();
    }

    tracing::debug!("Receive: {:?}", request);

    if let Ok(mut commands) = state.commands.lock() {
        commands.push(request);
    }

    Json(json!({ "code": 200, "message": "Success", "data": {} })).into_response()
}
