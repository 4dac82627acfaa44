// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # HTTP Backend
//!
//! * `GET /`: liveness and server time.
//! * `GET /discover`: Server-Sent Events, one `found` event per host. Cached
//!   hosts come first, then live discoveries for as long as the client stays.
//! * `POST /wake`: `{"mac": "..."}`, broadcasts a magic packet.
//!
//! Every error renders as `{"message": "..."}` with a matching status code.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lanwake_common::error::ScanError;
use lanwake_common::models::machine::WakeTarget;
use lanwake_common::{debug, error, info, interface};
use lanwake_core::registry::ScannerRegistry;
use lanwake_core::stream::ChannelSink;
use lanwake_core::wake;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;

pub const APP_NAME: &str = "lanwake";

/// Frames buffered between a session and the HTTP body.
const FRAME_BUFFER: usize = 16;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<ScannerRegistry>,
    iface: Option<Arc<str>>,
}

impl AppState {
    pub fn new(registry: Arc<ScannerRegistry>, iface: Option<String>) -> Self {
        Self {
            registry,
            iface: iface.map(Arc::from),
        }
    }

    fn iface(&self) -> Result<Arc<str>, AppError> {
        self.iface.clone().ok_or(AppError::InterfaceNotConfigured)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IFACE name is not set, please set this environment variable")]
    InterfaceNotConfigured,

    #[error("Invalid JSON body, check your MAC address")]
    InvalidBody(#[source] serde_json::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.status();
        match &self {
            Self::InvalidBody(e) => debug!(verbosity = 1, "Rejected request body: {e}"),
            _ => error!("{self}"),
        }
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct IndexResponse {
    up: bool,
    timestamp: u64,
    app_name: &'static str,
    message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/discover", get(discover))
        .route("/wake", post(wake_machine))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Json<IndexResponse> {
    let timestamp: u64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    Json(IndexResponse {
        up: true,
        timestamp,
        app_name: APP_NAME,
        message: format!("WOL backend is up! Server's UNIX time is: {timestamp}"),
    })
}

async fn discover(State(state): State<AppState>) -> Result<Response, AppError> {
    let iface: Arc<str> = state.iface()?;

    // Creating a scanner opens a raw socket under the registry lock.
    let registry = Arc::clone(&state.registry);
    let scanner = tokio::task::spawn_blocking(move || registry.get_or_create(&iface))
        .await
        .map_err(anyhow::Error::from)??;

    let session = scanner.attach();
    let (frames_tx, frames_rx) = mpsc::channel::<String>(FRAME_BUFFER);
    tokio::spawn(async move {
        let mut sink = ChannelSink::new(frames_tx);
        if let Err(e) = session.serve(&mut sink).await {
            debug!(verbosity = 1, "Event stream ended: {e}");
        }
    });

    let stream = ReceiverStream::new(frames_rx).map(Ok::<_, Infallible>);
    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.into()))
}

async fn wake_machine(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let iface: Arc<str> = state.iface()?;
    let target: WakeTarget = serde_json::from_slice(&body).map_err(AppError::InvalidBody)?;

    let info = interface::resolve(&iface)?;
    wake::send_magic_packet(info.broadcast(), target.mac).await?;

    let message: String = format!(
        "Sending wake-up message for {} to {}",
        target.mac,
        info.broadcast()
    );
    info!("{message}");
    Ok(Json(MessageResponse { message }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
