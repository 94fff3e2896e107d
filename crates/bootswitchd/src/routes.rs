//! API routes for bootswitchd
//!
//! Rename and hide always redirect back to the list, whether or not the
//! request was accepted. Boot and list failures show the tool diagnostic.

use crate::render;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use bootswitch_common::{BootOutcome, BootSwitchError, CommandRunner, OverrideStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

type AppStateArc<R, S> = Arc<AppState<R, S>>;

// ============================================================================
// Boot Routes
// ============================================================================

pub fn boot_routes<R, S>() -> Router<AppStateArc<R, S>>
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    Router::new()
        .route("/", get(index::<R, S>))
        .route("/rename", get(rename::<R, S>))
        .route("/hide", get(hide::<R, S>))
        .route("/boot/:id", post(boot::<R, S>))
}

/// Query of `/rename`. `bootnum` is accepted as an alias of `id`.
#[derive(Debug, Default, Deserialize)]
pub struct RenameParams {
    pub id: Option<String>,
    pub bootnum: Option<String>,
    pub label: Option<String>,
}

/// Query of `/hide`. Only `hidden=1` hides.
#[derive(Debug, Default, Deserialize)]
pub struct HideParams {
    pub id: Option<String>,
    pub bootnum: Option<String>,
    pub hidden: Option<String>,
}

fn requested_id(id: Option<String>, bootnum: Option<String>) -> String {
    id.or(bootnum).unwrap_or_default()
}

async fn index<R, S>(State(state): State<AppStateArc<R, S>>) -> Response
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    let platform = state.switch.platform();
    match state.switch.list().await {
        Ok(view) => Html(render::index_page(&view)).into_response(),
        Err(BootSwitchError::ToolExecution { command, diagnostic }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::list_failed_page(platform, &command, &diagnostic)),
        )
            .into_response(),
        Err(e) => {
            error!("  Listing failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::list_failed_page(platform, platform.enumerate_command(), &e.to_string())),
            )
                .into_response()
        }
    }
}

async fn rename<R, S>(
    State(state): State<AppStateArc<R, S>>,
    Query(params): Query<RenameParams>,
) -> Redirect
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    let id = requested_id(params.id, params.bootnum);
    let label = params.label.unwrap_or_default();
    info!("  /rename {{ id: {:?}, label: {:?} }}", id, label);

    report_action("rename", state.switch.rename(&id, &label));
    Redirect::to("/")
}

async fn hide<R, S>(
    State(state): State<AppStateArc<R, S>>,
    Query(params): Query<HideParams>,
) -> Redirect
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    let id = requested_id(params.id, params.bootnum);
    let hidden = params.hidden.as_deref() == Some("1");
    info!("  /hide {{ id: {:?}, hidden: {} }}", id, hidden);

    report_action("hide", state.switch.set_hidden(&id, hidden));
    Redirect::to("/")
}

fn report_action(action: &str, result: bootswitch_common::Result<()>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_validation() => warn!("  /{} ignored: {}", action, e),
        Err(e) => error!("  /{} failed: {}", action, e),
    }
}

async fn boot<R, S>(State(state): State<AppStateArc<R, S>>, Path(id): Path<String>) -> Response
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    let platform = state.switch.platform();
    match state.switch.boot(&id).await {
        Ok(BootOutcome::Succeeded { target_label }) => {
            Html(render::rebooting_page(&target_label)).into_response()
        }
        Ok(BootOutcome::Failed {
            target_label,
            diagnostic,
        }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::boot_failed_page(platform, &target_label, &diagnostic)),
        )
            .into_response(),
        Err(e) if e.is_validation() => {
            warn!("  /boot rejected: {}", e);
            (StatusCode::BAD_REQUEST, platform.invalid_id_message()).into_response()
        }
        Err(e) => {
            error!("  /boot failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub platform: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub fn health_routes<R, S>() -> Router<AppStateArc<R, S>>
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    Router::new().route("/health", get(health::<R, S>))
}

async fn health<R, S>(State(state): State<AppStateArc<R, S>>) -> Json<HealthResponse>
where
    R: CommandRunner + 'static,
    S: OverrideStore + 'static,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        platform: state.switch.platform().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
