//! REST API handlers.
//!
//! Each handler makes one scheduler call and serializes the result. Every
//! failure is a 500 except an unknown host id, which is a 404.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, warn};

use tie_core::WorkloadRequest;
use tie_scheduler::SchedulerError;

use crate::ApiState;

/// Body of every error response.
#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

fn scheduler_error(e: SchedulerError) -> axum::response::Response {
    match e {
        SchedulerError::HostNotFound(_) => {
            warn!(error = %e, "request failed");
            error_response(&e.to_string(), StatusCode::NOT_FOUND).into_response()
        }
        _ => {
            error!(error = %e, "request failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// GET /
pub async fn banner() -> &'static str {
    "Hello Dockertie"
}

// ── Hosts ──────────────────────────────────────────────────────

/// GET /hosts
pub async fn list_hosts(State(state): State<ApiState>) -> impl IntoResponse {
    match state.scheduler.hosts().await {
        Ok(hosts) => Json(hosts).into_response(),
        Err(e) => scheduler_error(e),
    }
}

/// GET /hosts/:id/containers
pub async fn list_host_containers(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.scheduler.host_workloads(&id).await {
        Ok(workloads) => Json(workloads).into_response(),
        Err(e) => scheduler_error(e),
    }
}

// ── Containers ─────────────────────────────────────────────────

/// GET /containers
pub async fn list_containers(State(state): State<ApiState>) -> impl IntoResponse {
    match state.scheduler.all_workloads().await {
        Ok(workloads) => Json(workloads).into_response(),
        Err(e) => scheduler_error(e),
    }
}

/// POST /containers
pub async fn create_container(
    State(state): State<ApiState>,
    Json(req): Json<WorkloadRequest>,
) -> impl IntoResponse {
    match state.scheduler.launch(&req).await {
        Ok(workload) => Json(workload).into_response(),
        Err(e) => scheduler_error(e),
    }
}
