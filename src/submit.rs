//! Remote submission channel.
//!
//! A resolved callback policy is handed to a `PolicySubmitter`, which sends it to
//! the backend solver together with a snapshot of the context store. Submission
//! is fire-and-forget: nothing flows back into the interpreter.

use crate::config::BackendConfig;
use crate::context::{ContextEntry, ContextStore};
use crate::error::{ApiError, SubmitError};
use crate::registry::ElementNode;
use crate::types::Policy;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Body of `POST /solver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverRequest {
    /// Fully resolved policy expression
    pub function: String,
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

impl SolverRequest {
    pub fn new(policy: &Policy, context: Vec<ContextEntry>) -> Self {
        Self {
            function: policy.policy.clone(),
            context,
        }
    }
}

/// Remote submission interface
pub trait PolicySubmitter: Send + Sync {
    fn policy_post(&self, policy: &Policy);
}

fn context_snapshot(context: Option<&Arc<dyn ContextStore>>) -> Vec<ContextEntry> {
    context.map(|store| store.entries()).unwrap_or_default()
}

/// A submission captured by `RecordingSubmitter`
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub request: SolverRequest,
    pub submitted_at: DateTime<Utc>,
}

/// Keeps every request in memory instead of sending it
#[derive(Default)]
pub struct RecordingSubmitter {
    context: Option<Arc<dyn ContextStore>>,
    records: Mutex<Vec<SubmissionRecord>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: Arc<dyn ContextStore>) -> Self {
        Self {
            context: Some(context),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().clone()
    }

    /// Submitted function strings, in order
    pub fn functions(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.request.function.clone())
            .collect()
    }
}

impl PolicySubmitter for RecordingSubmitter {
    fn policy_post(&self, policy: &Policy) {
        let request = SolverRequest::new(policy, context_snapshot(self.context.as_ref()));
        debug!(function = %request.function, "Recorded policy submission");
        self.records.lock().push(SubmissionRecord {
            request,
            submitted_at: Utc::now(),
        });
    }
}

/// Posts policies to the backend over HTTP
pub struct HttpSubmitter {
    client: Client,
    base_url: String,
    context: Option<Arc<dyn ContextStore>>,
    runtime: Handle,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpSubmitter {
    pub fn new(
        config: &BackendConfig,
        context: Option<Arc<dyn ContextStore>>,
        runtime: Handle,
    ) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            context,
            runtime,
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Attach the context store whose entries ride along with every submission
    pub fn with_context(self, context: Arc<dyn ContextStore>) -> Self {
        Self {
            context: Some(context),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /` on the backend: the current element tree
    pub async fn fetch_tree(&self) -> Result<ElementNode, ApiError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(SubmitError::from)?;
        let body = read_json(response).await?;
        serde_json::from_value(body).map_err(|e| ApiError::InvalidTree(e.to_string()))
    }

    /// Wait for every in-flight submission to finish
    pub async fn flush(&self) {
        let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.pending.lock());
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Submission task aborted");
            }
        }
    }

    /// `GET /health` on the backend
    pub async fn health(&self) -> Result<serde_json::Value, SubmitError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }
}

impl PolicySubmitter for HttpSubmitter {
    fn policy_post(&self, policy: &Policy) {
        let request = SolverRequest::new(policy, context_snapshot(self.context.as_ref()));
        let client = self.client.clone();
        let base_url = self.base_url.clone();

        let handle = self.runtime.spawn(async move {
            match post_solver_request(&client, &base_url, &request).await {
                Ok(_) => debug!(function = %request.function, "Policy submitted"),
                Err(e) => warn!(
                    function = %request.function,
                    error = %e,
                    "Policy submission failed"
                ),
            }
        });
        self.pending.lock().push(handle);
    }
}

async fn post_solver_request(
    client: &Client,
    base_url: &str,
    request: &SolverRequest,
) -> Result<serde_json::Value, SubmitError> {
    let body = serde_json::to_vec(request)?;
    let response = client
        .post(format!("{}/solver", base_url))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await?;
    read_json(response).await
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, SubmitError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(SubmitError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
