use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::events::{RunErrorKey, StepKey, WireEvent};

use super::node::{NodeStatus, NodeStep, ProcessNode, StepStatus};

/// Run id the pipeline uses for the document-extraction stage. A finished
/// run under this id carries the structured candidate profile.
pub const RUN_DOCUMENT_EXTRACTION: &str = "document_extraction";

/// Run id for the interview-question generation stage. A finished run under
/// this id carries the raw question groups.
pub const RUN_QUESTION_GENERATION: &str = "question_generation";

/// Session-level projection requested by a fold step.
///
/// The tracker performs no I/O; when a finished run carries one of the
/// well-known payloads, the caller receives the payload here and is
/// responsible for handing it to the session store.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEffect {
    /// Candidate-profile fields extracted from the CV; shallow-merge into
    /// the session's candidate record.
    CandidateExtracted(Value),
    /// Raw interview-question groups; flatten into the typed question list.
    QuestionsGenerated(Value),
}

/// Ordered collection of process nodes plus the fold that maintains it.
///
/// One event at a time: `apply` mutates the collection in place and returns
/// any projection the caller must run. Lookup is exclusively by `run_id`
/// (or `message_id == run_id` for token streams); events referencing an
/// unknown run touch nothing.
#[derive(Clone, Debug, Default)]
pub struct ProcessTracker {
    nodes: Vec<ProcessNode>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current collection, in creation order.
    pub fn nodes(&self) -> &[ProcessNode] {
        &self.nodes
    }

    /// Owned copy of the current collection for snapshot readers.
    pub fn snapshot(&self) -> Vec<ProcessNode> {
        self.nodes.clone()
    }

    /// Fold one event into the collection.
    ///
    /// Never panics: malformed composite keys and unknown run ids degrade
    /// to no-ops (logged at debug level), unrecognized event types are
    /// ignored with a warning.
    pub fn apply(&mut self, event: WireEvent) -> Option<SessionEffect> {
        match event {
            WireEvent::RunStarted {
                run_id,
                thread_id,
                timestamp,
            } => {
                if self.nodes.iter().any(|n| n.run_id == run_id) {
                    // Upstream re-emissions append a second node; display
                    // tolerates it and dedup would hide real re-runs.
                    debug!(run_id = %run_id, "duplicate RUN_STARTED, appending node");
                }
                self.nodes.push(ProcessNode::started(
                    run_id,
                    thread_id,
                    resolve_timestamp(timestamp),
                ));
                None
            }

            WireEvent::RunFinished {
                run_id,
                thread_id,
                status,
                result,
                error,
                timestamp,
            } => {
                let effect = session_effect(&run_id, result.as_ref());
                let when = resolve_timestamp(timestamp);
                let mut matched = false;
                for node in self.nodes.iter_mut().filter(|n| n.run_id == run_id) {
                    matched = true;
                    node.status = NodeStatus::Completed;
                    node.message = format!("{thread_id} executed successfully");
                    node.timestamp = when;
                    node.result = result.clone().filter(Value::is_object);
                    node.error = if status.as_deref() == Some("failed") {
                        error.clone()
                    } else {
                        None
                    };
                }
                if !matched {
                    debug!(run_id = %run_id, "RUN_FINISHED for unknown run, ignoring");
                }
                effect
            }

            WireEvent::StepStarted {
                step_name,
                timestamp,
            } => {
                let Some(key) = StepKey::parse(&step_name) else {
                    debug!(step_name = %step_name, "unroutable STEP_STARTED, ignoring");
                    return None;
                };
                let when = resolve_timestamp(timestamp);
                for node in self.nodes.iter_mut().filter(|n| n.run_id == key.run_id) {
                    node.steps.push(NodeStep::started(
                        key.step_id(),
                        step_name.clone(),
                        when,
                    ));
                }
                None
            }

            WireEvent::StepFinished {
                step_name,
                timestamp,
            } => {
                let Some(key) = StepKey::parse(&step_name) else {
                    debug!(step_name = %step_name, "unroutable STEP_FINISHED, ignoring");
                    return None;
                };
                let step_id = key.step_id();
                let when = resolve_timestamp(timestamp);
                for node in self.nodes.iter_mut().filter(|n| n.run_id == key.run_id) {
                    for step in node.steps.iter_mut().filter(|s| s.id == step_id) {
                        step.status = StepStatus::Completed;
                        step.message = step_name.clone();
                        step.timestamp = when;
                    }
                }
                None
            }

            WireEvent::TextMessageStart { message_id } => {
                for node in self.nodes.iter_mut().filter(|n| n.run_id == message_id) {
                    node.streaming_tokens = Some(String::new());
                    node.status = NodeStatus::InProgress;
                }
                None
            }

            WireEvent::TextMessageContent { message_id, delta } => {
                // Content before its start event still accumulates: the
                // buffer reads as empty when absent.
                for node in self.nodes.iter_mut().filter(|n| n.run_id == message_id) {
                    node.streaming_tokens
                        .get_or_insert_with(String::new)
                        .push_str(&delta);
                }
                None
            }

            WireEvent::TextMessageEnd { message_id } => {
                for node in self.nodes.iter_mut().filter(|n| n.run_id == message_id) {
                    node.result = node.streaming_tokens.take().map(Value::String);
                    node.status = NodeStatus::Completed;
                }
                None
            }

            WireEvent::RunError { message } => {
                let key = RunErrorKey::parse(&message);
                let when = Utc::now();
                for node in self.nodes.iter_mut().filter(|n| n.run_id == key.run_id) {
                    node.status = NodeStatus::Error;
                    node.message = "An error occurred during the node run".to_string();
                    node.timestamp = when;
                    node.error = Some(if key.detail.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        key.detail.clone()
                    });
                }
                None
            }

            WireEvent::Unknown => {
                warn!("unrecognized workflow event, ignoring");
                None
            }
        }
    }
}

fn resolve_timestamp(timestamp: Option<DateTime<Utc>>) -> DateTime<Utc> {
    timestamp.unwrap_or_else(Utc::now)
}

fn session_effect(run_id: &str, result: Option<&Value>) -> Option<SessionEffect> {
    let payload = result.filter(|v| v.is_object())?;
    match run_id {
        RUN_DOCUMENT_EXTRACTION => Some(SessionEffect::CandidateExtracted(payload.clone())),
        RUN_QUESTION_GENERATION => Some(SessionEffect::QuestionsGenerated(payload.clone())),
        _ => None,
    }
}
