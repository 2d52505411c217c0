//! Agent lifecycle management (`/api/agents`).
//!
//! Heartbeats and metrics are separate channels: a heartbeat proves
//! liveness and carries no resource data; metrics carry telemetry only.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::transport::{path_segment, ApiRequest, Transport};
use crate::Result;

const AGENTS_PATH: &str = "/api/agents";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentState {
    New,
    Provisioned,
    Active,
    Draining,
    Terminated,
    Killed,
}

impl AgentState {
    /// True once the agent can no longer be scheduled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Terminated | AgentState::Killed)
    }
}

/// Liveness mode reported with a heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeartbeatMode {
    Emergency,
    Idle,
    Sleep,
}

impl fmt::Display for HeartbeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeartbeatMode::Emergency => "EMERGENCY",
            HeartbeatMode::Idle => "IDLE",
            HeartbeatMode::Sleep => "SLEEP",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub dns_name: Option<String>,
    pub state: AgentState,
    #[serde(default)]
    pub kubernetes_namespace: Option<String>,
    #[serde(default)]
    pub kubernetes_deployment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub provisioned_at: Option<String>,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub terminated_at: Option<String>,
    #[serde(default)]
    pub last_heartbeat_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Kubernetes resource requests and limits, e.g. `"500m"`, `"256Mi"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub mode: HeartbeatMode,
    pub uptime_seconds: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Resource telemetry for one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub cpu_percent: f64,
    pub memory_mb: f64,
    pub requests_handled: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub custom_metrics: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub event_type: String,
    #[serde(default)]
    pub from_state: Option<String>,
    pub to_state: String,
    pub timestamp: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// An agent plus its recent telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetails {
    pub agent: Agent,
    #[serde(default)]
    pub recent_heartbeats: Vec<Heartbeat>,
    #[serde(default)]
    pub recent_metrics: Vec<AgentMetrics>,
    #[serde(default)]
    pub lifecycle_events: Vec<LifecycleEvent>,
    #[serde(default)]
    pub kubernetes_status: Option<Value>,
}

/// Agent operations bound to a transport.
#[derive(Clone)]
pub struct Agents {
    transport: Arc<dyn Transport>,
}

impl Agents {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Agent>> {
        let payload = self.call(ApiRequest::get(AGENTS_PATH)).await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn create(&self, request: &CreateAgentRequest) -> Result<Value> {
        let body = serde_json::to_value(request)?;
        self.call(ApiRequest::post(AGENTS_PATH).with_json(body)).await
    }

    pub async fn get(&self, agent_id: &str) -> Result<AgentDetails> {
        let payload = self.call(ApiRequest::get(agent_path(agent_id, "")?)).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Terminates the agent's deployment.
    pub async fn delete(&self, agent_id: &str) -> Result<Value> {
        self.call(ApiRequest::delete(agent_path(agent_id, "")?)).await
    }

    /// Export agent data. The server defaults are `include_telemetry = true`
    /// and `telemetry_limit = 100`.
    pub async fn export(
        &self,
        agent_id: &str,
        include_telemetry: bool,
        telemetry_limit: u32,
    ) -> Result<Value> {
        let request = ApiRequest::post(agent_path(agent_id, "/export")?).with_json(json!({
            "include_telemetry": include_telemetry,
            "telemetry_limit": telemetry_limit,
        }));
        self.call(request).await
    }

    pub async fn heartbeat(
        &self,
        agent_id: &str,
        mode: HeartbeatMode,
        uptime_seconds: f64,
    ) -> Result<Value> {
        let request = ApiRequest::post(agent_path(agent_id, "/heartbeat")?).with_json(json!({
            "mode": mode,
            "uptime_seconds": uptime_seconds,
        }));
        self.call(request).await
    }

    pub async fn metrics(&self, agent_id: &str, metrics: &AgentMetrics) -> Result<Value> {
        let request = ApiRequest::post(agent_path(agent_id, "/metrics")?).with_json(json!({
            "cpu_percent": metrics.cpu_percent,
            "memory_mb": metrics.memory_mb,
            "requests_handled": metrics.requests_handled,
            "custom_metrics": metrics.custom_metrics,
        }));
        self.call(request).await
    }

    async fn call(&self, request: ApiRequest) -> Result<Value> {
        self.transport.send(request).await?.into_payload(false)
    }
}

fn agent_path(agent_id: &str, suffix: &str) -> Result<String> {
    let id = path_segment("agent_id", agent_id)?;
    Ok(format!("{}/{}{}", AGENTS_PATH, id, suffix))
}
