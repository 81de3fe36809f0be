//! tie-api — REST API for dockertie.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Banner |
//! | GET | `/hosts` | List the inventory |
//! | GET | `/hosts/{id}/containers` | List workloads on one host |
//! | GET | `/containers` | List workloads on every reachable host |
//! | POST | `/containers` | Place and launch a workload |

pub mod handlers;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use tie_scheduler::Scheduler;
use tracing::info;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub scheduler: Scheduler,
}

/// Build the complete API router.
pub fn build_router(scheduler: Scheduler) -> Router {
    let state = ApiState { scheduler };

    Router::new()
        .route("/", get(handlers::banner))
        .route("/hosts", get(handlers::list_hosts))
        .route("/hosts/{id}/containers", get(handlers::list_host_containers))
        .route(
            "/containers",
            get(handlers::list_containers).post(handlers::create_container),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    info!(method = %req.method(), uri = %req.uri(), "request");
    next.run(req).await
}
