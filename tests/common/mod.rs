#![allow(dead_code)]

//! Shared frame builders: raw JSON records the way the pipeline emits them.

use serde_json::{json, Value};

pub fn run_started(run_id: &str, thread_id: &str) -> String {
    json!({"type": "RUN_STARTED", "runId": run_id, "threadId": thread_id}).to_string()
}

pub fn run_finished(run_id: &str, thread_id: &str, result: Value) -> String {
    json!({
        "type": "RUN_FINISHED",
        "runId": run_id,
        "threadId": thread_id,
        "result": result,
    })
    .to_string()
}

pub fn run_finished_bare(run_id: &str, thread_id: &str) -> String {
    json!({"type": "RUN_FINISHED", "runId": run_id, "threadId": thread_id}).to_string()
}

pub fn step_started(step_name: &str) -> String {
    json!({"type": "STEP_STARTED", "stepName": step_name}).to_string()
}

pub fn step_finished(step_name: &str) -> String {
    json!({"type": "STEP_FINISHED", "stepName": step_name}).to_string()
}

pub fn text_message_start(message_id: &str) -> String {
    json!({"type": "TEXT_MESSAGE_START", "messageId": message_id}).to_string()
}

pub fn text_message_content(message_id: &str, delta: &str) -> String {
    json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": message_id, "delta": delta}).to_string()
}

pub fn text_message_end(message_id: &str) -> String {
    json!({"type": "TEXT_MESSAGE_END", "messageId": message_id}).to_string()
}

pub fn run_error(message: &str) -> String {
    json!({"type": "RUN_ERROR", "message": message}).to_string()
}
