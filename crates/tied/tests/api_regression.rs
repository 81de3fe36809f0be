//! API regression tests.
//!
//! Drives the full router (file inventory + in-memory backend) through
//! `tower::ServiceExt::oneshot`, the same way the daemon serves it.

use std::io::Write;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tie_api::build_router;
use tie_backend::{ExecutionBackend, MemoryBackend};
use tie_core::{Host, WorkloadRequest, ledger};
use tie_inventory::FileInventory;
use tie_scheduler::Scheduler;

const INVENTORY: &str = r#"[
    {"id": "h1", "name": "one", "addr": "10.0.0.1", "cpu_capacity": 4, "memory_capacity": 8},
    {"id": "h2", "name": "two", "addr": "10.0.0.2", "cpu_capacity": 4, "memory_capacity": 8},
    {"id": "h3", "name": "three", "addr": "10.0.0.3", "cpu_capacity": 4, "memory_capacity": 8}
]"#;

struct Fixture {
    router: Router,
    backend: Arc<MemoryBackend>,
    hosts: Vec<Host>,
    _inventory: tempfile::NamedTempFile,
}

fn fixture() -> Fixture {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INVENTORY.as_bytes()).unwrap();

    let backend = Arc::new(MemoryBackend::new());
    let scheduler = Scheduler::new(Arc::new(FileInventory::new(file.path())), backend.clone());

    Fixture {
        router: build_router(scheduler),
        backend,
        hosts: serde_json::from_str(INVENTORY).unwrap(),
        _inventory: file,
    }
}

fn broken_router() -> Router {
    let scheduler = Scheduler::new(
        Arc::new(FileInventory::new("/nonexistent/dockertie/hosts.json")),
        Arc::new(MemoryBackend::new()),
    );
    build_router(scheduler)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn banner_is_served_at_root() {
    let f = fixture();
    let resp = f.router.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Hello Dockertie");
}

#[tokio::test]
async fn hosts_lists_inventory_in_order() {
    let f = fixture();
    let resp = f.router.oneshot(get("/hosts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["h1", "h2", "h3"]);
}

#[tokio::test]
async fn hosts_discovery_failure_is_500() {
    let resp = broken_router().oneshot(get("/hosts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("discovery error"));
}

#[tokio::test]
async fn host_containers_lists_that_host_only() {
    let f = fixture();
    let req = WorkloadRequest {
        image: "busybox".to_string(),
        cpu_capacity: 1,
        memory_capacity: 1,
        ..Default::default()
    };
    f.backend.launch_workload(&f.hosts[1], &req).await.unwrap();
    f.backend.launch_workload(&f.hosts[2], &req).await.unwrap();

    let resp = f.router.oneshot(get("/hosts/h2/containers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let workloads = body.as_array().unwrap();
    assert_eq!(workloads.len(), 1);
    assert_eq!(workloads[0]["host"]["id"], "h2");
}

#[tokio::test]
async fn unknown_host_containers_is_404() {
    let f = fixture();
    let resp = f.router.oneshot(get("/hosts/nope/containers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn containers_aggregate_skips_failing_host() {
    let f = fixture();
    let req = WorkloadRequest {
        image: "busybox".to_string(),
        ..Default::default()
    };
    for host in &f.hosts {
        f.backend.launch_workload(host, &req).await.unwrap();
    }
    f.backend.fail_host("h3");

    let resp = f.router.oneshot(get("/containers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let mut hosts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["host"]["id"].as_str().unwrap())
        .collect();
    hosts.sort();
    assert_eq!(hosts, ["h1", "h2"]);
}

#[tokio::test]
async fn containers_discovery_failure_is_500() {
    let resp = broken_router().oneshot(get("/containers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn post_places_on_first_host_with_room() {
    let f = fixture();
    let resident = WorkloadRequest {
        image: "busybox".to_string(),
        cpu_capacity: 3,
        memory_capacity: 4,
        ..Default::default()
    };
    f.backend.launch_workload(&f.hosts[0], &resident).await.unwrap();

    let resp = f
        .router
        .oneshot(post_json(
            "/containers",
            &json!({"image": "nginx", "cpu_capacity": 2, "memory_capacity": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["host"]["id"], "h2");
    assert_eq!(body["cpu_capacity"], 2);
    assert_eq!(body["memory_capacity"], 2);
}

#[tokio::test]
async fn post_round_trips_capacity_and_tags() {
    let f = fixture();
    let resp = f
        .router
        .clone()
        .oneshot(post_json(
            "/containers",
            &json!({
                "image": "redis:7",
                "cmd": ["redis-server"],
                "env": {"MODE": "cache"},
                "tags": {"team name": "infra"},
                "cpu_capacity": 2,
                "memory_capacity": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["env"]["MODE"], "cache");
    assert_eq!(body["env"]["DOCKERTIE_TEAM_NAME"], "infra");

    let env = serde_json::from_value(body["env"].clone()).unwrap();
    assert_eq!(ledger::decode(&env).unwrap(), ledger::Capacity::new(2, 1));

    // The new workload is visible to the aggregate.
    let resp = f.router.oneshot(get("/containers")).await.unwrap();
    let listed = json_body(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn post_without_room_is_500() {
    let f = fixture();
    let resp = f
        .router
        .oneshot(post_json(
            "/containers",
            &json!({"image": "nginx", "cpu_capacity": 5, "memory_capacity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("cannot find available host"));
}

#[tokio::test]
async fn post_with_undecodable_body_is_rejected() {
    let f = fixture();
    let resp = f
        .router
        .oneshot(post_json("/containers", &json!({"cpu_capacity": "two"})))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let f = fixture();
    let req = Request::builder()
        .method("DELETE")
        .uri("/containers")
        .body(Body::empty())
        .unwrap();

    let resp = f.router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
