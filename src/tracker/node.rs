use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a [`ProcessNode`].
///
/// `Completed` and `Error` are terminal for display purposes, though the
/// reducer does not guard terminal nodes against late events. `Pending` is
/// part of the declared vocabulary but is never assigned: nodes only come
/// into existence on a run-start event, already `InProgress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl NodeStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeStatus::Completed | NodeStatus::Error)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Pending => write!(f, "pending"),
            NodeStatus::InProgress => write!(f, "in_progress"),
            NodeStatus::Completed => write!(f, "completed"),
            NodeStatus::Error => write!(f, "error"),
        }
    }
}

/// Lifecycle status of a [`NodeStep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::InProgress => write!(f, "in_progress"),
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A sub-unit of work inside a [`ProcessNode`].
///
/// Steps are owned by their parent node, appended in arrival order and
/// never removed. `id` is the composite key (`step <label> - <runId>`)
/// that finish events use to find the step again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStep {
    pub id: String,
    pub name: String,
    pub status: StepStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NodeStep {
    /// Step as created by a step-start event.
    pub fn started(id: String, name: String, timestamp: DateTime<Utc>) -> Self {
        let message = format!("Running {name}...");
        Self {
            id,
            name,
            status: StepStatus::InProgress,
            message,
            timestamp,
        }
    }
}

/// Live status record for one top-level unit of pipeline work.
///
/// Created on a run-start event and kept for the lifetime of the viewing
/// session; there is no eviction. `run_id` is the only lookup key, `name`
/// is the pipeline's thread identifier used as the display label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessNode {
    pub id: String,
    pub run_id: String,
    pub thread_id: String,
    pub name: String,
    pub status: NodeStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub steps: Vec<NodeStep>,
    /// Accumulating token buffer; present only while a text-message stream
    /// is open. Finalized into `result` when the stream ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_tokens: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessNode {
    /// Node as created by a run-start event: `InProgress`, no steps.
    pub fn started(run_id: String, thread_id: String, timestamp: DateTime<Utc>) -> Self {
        let message = format!("Executing {thread_id}...");
        Self {
            id: run_id.clone(),
            run_id,
            name: thread_id.clone(),
            thread_id,
            status: NodeStatus::InProgress,
            message,
            timestamp,
            steps: Vec::new(),
            streaming_tokens: None,
            result: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_node_is_in_progress_with_thread_name() {
        let node = ProcessNode::started("cv_scoring".into(), "CV Scoring Process".into(), Utc::now());
        assert_eq!(node.status, NodeStatus::InProgress);
        assert_eq!(node.name, "CV Scoring Process");
        assert_eq!(node.message, "Executing CV Scoring Process...");
        assert!(node.steps.is_empty());
        assert!(node.streaming_tokens.is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(NodeStatus::Completed.is_terminal());
        assert!(NodeStatus::Error.is_terminal());
        assert!(!NodeStatus::InProgress.is_terminal());
        assert!(!NodeStatus::Pending.is_terminal());
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&NodeStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
