use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding an inbound frame.
#[derive(Debug, Error, Diagnostic)]
pub enum DecodeError {
    /// The frame was not a valid JSON record of any recognized shape.
    #[error("undecodable workflow event: {source}")]
    #[diagnostic(code(screenflow::events::decode))]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// One record from the screening pipeline's event channel.
///
/// The discriminant is the upstream `type` field. Field names arrive in
/// camelCase; snake_case spellings are accepted as aliases because older
/// pipeline builds emitted them.
///
/// Any record with an unrecognized `type` decodes to [`WireEvent::Unknown`]
/// and is a no-op for every consumer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireEvent {
    /// A top-level pipeline stage began executing.
    #[serde(rename = "RUN_STARTED")]
    RunStarted {
        #[serde(rename = "runId", alias = "run_id")]
        run_id: String,
        #[serde(rename = "threadId", alias = "thread_id")]
        thread_id: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// A top-level pipeline stage finished.
    ///
    /// `result` is an arbitrary structured payload; `error` is only
    /// meaningful when `status` is `"failed"`.
    #[serde(rename = "RUN_FINISHED")]
    RunFinished {
        #[serde(rename = "runId", alias = "run_id")]
        run_id: String,
        #[serde(rename = "threadId", alias = "thread_id")]
        thread_id: String,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// A sub-step inside a run began. `step_name` carries the composite
    /// routing key, see [`super::StepKey`].
    #[serde(rename = "STEP_STARTED")]
    StepStarted {
        #[serde(rename = "stepName", alias = "step_name")]
        step_name: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// A sub-step finished. Same composite key as its start event.
    #[serde(rename = "STEP_FINISHED")]
    StepFinished {
        #[serde(rename = "stepName", alias = "step_name")]
        step_name: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// A token stream opened for the run whose id equals `message_id`.
    #[serde(rename = "TEXT_MESSAGE_START")]
    TextMessageStart {
        #[serde(rename = "messageId", alias = "message_id")]
        message_id: String,
    },

    /// One token-stream delta. Delivery order is append order.
    #[serde(rename = "TEXT_MESSAGE_CONTENT")]
    TextMessageContent {
        #[serde(rename = "messageId", alias = "message_id")]
        message_id: String,
        delta: String,
    },

    /// The token stream closed; the accumulated text becomes the result.
    #[serde(rename = "TEXT_MESSAGE_END")]
    TextMessageEnd {
        #[serde(rename = "messageId", alias = "message_id")]
        message_id: String,
    },

    /// A run failed. `message` carries the composite routing key, see
    /// [`super::RunErrorKey`].
    #[serde(rename = "RUN_ERROR")]
    RunError { message: String },

    /// Any discriminant this build does not recognize. Tolerated so that
    /// protocol drift degrades to staleness instead of a dead view.
    #[serde(other)]
    Unknown,
}

impl WireEvent {
    /// Upstream discriminant for this event, or `"UNKNOWN"`.
    pub fn kind(&self) -> &'static str {
        match self {
            WireEvent::RunStarted { .. } => "RUN_STARTED",
            WireEvent::RunFinished { .. } => "RUN_FINISHED",
            WireEvent::StepStarted { .. } => "STEP_STARTED",
            WireEvent::StepFinished { .. } => "STEP_FINISHED",
            WireEvent::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            WireEvent::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            WireEvent::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            WireEvent::RunError { .. } => "RUN_ERROR",
            WireEvent::Unknown => "UNKNOWN",
        }
    }
}

/// Decode one raw frame from the event channel.
pub fn decode_event(frame: &str) -> Result<WireEvent, DecodeError> {
    Ok(serde_json::from_str(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_run_started_camel_case() {
        let event = decode_event(
            r#"{"type":"RUN_STARTED","runId":"cv_scoring","threadId":"CV Scoring Process"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            WireEvent::RunStarted {
                run_id: "cv_scoring".into(),
                thread_id: "CV Scoring Process".into(),
                timestamp: None,
            }
        );
    }

    #[test]
    fn decodes_snake_case_aliases() {
        let event = decode_event(
            r#"{"type":"RUN_STARTED","run_id":"world_check","thread_id":"World Check Process"}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            WireEvent::RunStarted { run_id, .. } if run_id == "world_check"
        ));
    }

    #[test]
    fn decodes_run_finished_with_result() {
        let frame = json!({
            "type": "RUN_FINISHED",
            "runId": "cv_scoring",
            "threadId": "CV Scoring Process",
            "result": {"score": 82},
        })
        .to_string();
        match decode_event(&frame).unwrap() {
            WireEvent::RunFinished { result, status, .. } => {
                assert_eq!(result, Some(json!({"score": 82})));
                assert_eq!(status, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_type_decodes_to_unknown() {
        let event = decode_event(r#"{"type":"NODE_HEARTBEAT","runId":"x"}"#).unwrap();
        assert_eq!(event, WireEvent::Unknown);
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        assert!(decode_event(r#"{"type":"RUN_STARTED","threadId":"t"}"#).is_err());
        assert!(decode_event("not json").is_err());
    }

    #[test]
    fn delta_round_trips() {
        let event = WireEvent::TextMessageContent {
            message_id: "cv_scoring".into(),
            delta: "partial ".into(),
        };
        let frame = serde_json::to_string(&event).unwrap();
        assert_eq!(decode_event(&frame).unwrap(), event);
    }
}
