//! Docker Engine backend.
//!
//! Talks plain HTTP/1.1 to the Docker daemon on each host
//! (`tcp://<addr>:<port>`). One connection is opened per request; the
//! daemon is the only state.
//!
//! | Operation | Calls |
//! |---|---|
//! | list | `GET /containers/json`, then `GET /containers/{id}/json` per container |
//! | launch | `POST /containers/create`, `POST /containers/{id}/start`, `GET /containers/{id}/json` |

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tracing::{debug, info};

use tie_core::{Host, Workload, WorkloadRequest, ledger};

use crate::ExecutionBackend;
use crate::error::{BackendError, BackendResult};

/// `backend_info` key overriding the Docker port for one host.
pub const DOCKER_PORT_KEY: &str = "DockerPort";

#[derive(Debug, Clone)]
pub struct DockerBackend {
    default_port: u16,
    timeout: Option<Duration>,
}

impl DockerBackend {
    pub fn new(default_port: u16) -> Self {
        Self {
            default_port,
            timeout: None,
        }
    }

    /// Bound every request to the Docker daemon.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `addr:port` of the Docker daemon on `host`.
    pub fn endpoint(&self, host: &Host) -> BackendResult<String> {
        let port = match host.backend_info.get(DOCKER_PORT_KEY) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                BackendError::HostConfig(format!(
                    "host {} has invalid {DOCKER_PORT_KEY} {raw:?}",
                    host.id
                ))
            })?,
            None => self.default_port,
        };
        Ok(format!("{}:{port}", host.addr))
    }

    async fn send(
        &self,
        endpoint: &str,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> BackendResult<Bytes> {
        let call = send_request(endpoint, method, path, body);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| BackendError::Timeout {
                    endpoint: endpoint.to_string(),
                })?,
            None => call.await,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
    ) -> BackendResult<T> {
        let bytes = self.send(endpoint, Method::GET, path, None).await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(format!("{path}: {e}")))
    }

    async fn inspect(&self, host: &Host, endpoint: &str, id: &str) -> BackendResult<Workload> {
        let inspection: ContainerInspect = self
            .get_json(endpoint, &format!("/containers/{id}/json"))
            .await?;
        workload_from_inspect(host, inspection)
    }
}

#[async_trait]
impl ExecutionBackend for DockerBackend {
    async fn list_workloads(&self, host: &Host) -> BackendResult<Vec<Workload>> {
        let endpoint = self.endpoint(host)?;
        debug!(host = %host.id, %endpoint, "listing containers");

        let summaries: Vec<ContainerSummary> =
            self.get_json(&endpoint, "/containers/json").await?;

        let mut workloads = Vec::with_capacity(summaries.len());
        for summary in summaries {
            workloads.push(self.inspect(host, &endpoint, &summary.id).await?);
        }
        Ok(workloads)
    }

    async fn launch_workload(
        &self,
        host: &Host,
        req: &WorkloadRequest,
    ) -> BackendResult<Workload> {
        let endpoint = self.endpoint(host)?;

        let body = serde_json::to_vec(&CreateContainer::from_request(req))
            .map_err(|e| BackendError::Request(format!("encode create body: {e}")))?;
        let created = self
            .send(&endpoint, Method::POST, "/containers/create", Some(body))
            .await?;
        let created: CreateResponse = serde_json::from_slice(&created)
            .map_err(|e| BackendError::Decode(format!("/containers/create: {e}")))?;

        self.send(
            &endpoint,
            Method::POST,
            &format!("/containers/{}/start", created.id),
            None,
        )
        .await?;

        info!(host = %host.id, container = %created.id, image = %req.image, "container started");
        self.inspect(host, &endpoint, &created.id).await
    }
}

async fn send_request(
    endpoint: &str,
    method: Method,
    path: &str,
    body: Option<Vec<u8>>,
) -> BackendResult<Bytes> {
    let stream = TcpStream::connect(endpoint)
        .await
        .map_err(|e| BackendError::Connect {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = http1::handshake(io)
        .await
        .map_err(|e| BackendError::Connect {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "docker connection closed with error");
        }
    });

    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(HOST, endpoint)
        .header(USER_AGENT, "dockertie/0.1");
    if body.is_some() {
        builder = builder.header(CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(Full::new(Bytes::from(body.unwrap_or_default())))
        .map_err(|e| BackendError::Request(e.to_string()))?;

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| BackendError::Request(e.to_string()))?;

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| BackendError::Request(e.to_string()))?
        .to_bytes();

    // 304 is how the daemon answers "already started".
    if !status.is_success() && status != StatusCode::NOT_MODIFIED {
        return Err(BackendError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).trim().to_string(),
        });
    }

    Ok(bytes)
}

// ── Wire types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerSummary {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerInspect {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    args: Option<Vec<String>>,
    #[serde(default)]
    config: Option<InspectConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    env: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateContainer {
    image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cmd: Vec<String>,
    env: Vec<String>,
}

impl CreateContainer {
    fn from_request(req: &WorkloadRequest) -> Self {
        let mut env: Vec<String> = ledger::encode(req)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        env.sort();

        Self {
            image: req.image.clone(),
            cmd: req.cmd.clone(),
            env,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateResponse {
    id: String,
}

/// Split `KEY=value` entries. An entry without `=` maps to an empty value.
fn parse_env(entries: &[String]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (entry.clone(), String::new()),
        })
        .collect()
}

fn workload_from_inspect(host: &Host, inspection: ContainerInspect) -> BackendResult<Workload> {
    let env = inspection
        .config
        .and_then(|c| c.env)
        .map(|entries| parse_env(&entries))
        .unwrap_or_default();
    let capacity = ledger::decode(&env)?;

    Ok(Workload {
        id: inspection.id,
        name: inspection.name.trim_start_matches('/').to_string(),
        path: inspection.path,
        args: inspection.args.unwrap_or_default(),
        env,
        host: host.to_ref(),
        cpu_capacity: capacity.cpu,
        memory_capacity: capacity.memory,
    })
}
