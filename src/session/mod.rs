//! Session projections fed by the workflow-event fold.
//!
//! Two finished runs carry structured payloads that outlive the process
//! tree: the extracted candidate profile and the generated interview
//! questions. [`SessionStore`] owns the per-session records and applies
//! [`SessionEffect`]s handed back by the tracker; it is the only writer.

mod questions;

pub use questions::{map_interview_response, Difficulty, Question, QuestionKind, QuestionSet};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tracker::SessionEffect;

/// Candidate record built up from the document-extraction payload.
///
/// Every field is optional: extraction quality varies per CV, and a merge
/// only overwrites the fields actually present in the payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Free-form: the extractor emits either prose or structured entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Value>,
}

impl CandidateProfile {
    /// Shallow-merge the extraction payload: fields present in the payload
    /// overwrite, fields absent from it are preserved.
    pub fn merge_extracted(&mut self, extracted: &Value) {
        merge_str(&mut self.name, extracted, "name");
        merge_str(&mut self.email, extracted, "email");
        merge_str(&mut self.phone, extracted, "phone");
        merge_str(&mut self.address, extracted, "address");
        merge_str(&mut self.summary, extracted, "summary");
        merge_str(&mut self.linkedin_url, extracted, "linkedin_url");

        if let Some(skills) = extracted.get("skills").and_then(Value::as_array) {
            self.skills = Some(
                skills
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            );
        }
        merge_value(&mut self.experience, extracted, "experience");
        merge_value(&mut self.education, extracted, "education");
    }
}

fn merge_str(slot: &mut Option<String>, payload: &Value, field: &str) {
    if let Some(value) = payload.get(field).and_then(Value::as_str) {
        *slot = Some(value.to_string());
    }
}

fn merge_value(slot: &mut Option<Value>, payload: &Value, field: &str) {
    match payload.get(field) {
        Some(Value::Null) | None => {}
        Some(value) => *slot = Some(value.clone()),
    }
}

/// One screening session: the candidate under review plus whatever the
/// pipeline has produced for them so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub candidate: CandidateProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<QuestionSet>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            candidate: CandidateProfile::default(),
            questions: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// In-memory session registry. Single-writer: only the event-feed loop
/// mutates it, readers take clones of individual records.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: FxHashMap<String, SessionRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, replacing any record under the same id.
    pub fn create_session(&mut self, id: impl Into<String>) -> &SessionRecord {
        let record = SessionRecord::new(id);
        let id = record.id.clone();
        self.sessions.insert(id.clone(), record);
        &self.sessions[&id]
    }

    pub fn session(&self, id: &str) -> Option<&SessionRecord> {
        self.sessions.get(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Merge extracted candidate fields into a session's candidate record.
    /// Returns `false` (and leaves everything untouched) for an unknown
    /// session id.
    pub fn update_candidate_from_extraction(&mut self, session_id: &str, extracted: &Value) -> bool {
        let Some(record) = self.sessions.get_mut(session_id) else {
            debug!(session_id, "candidate extraction for unknown session, ignoring");
            return false;
        };
        record.candidate.merge_extracted(extracted);
        record.updated_at = Utc::now();
        true
    }

    /// Flatten raw question groups into the session's typed question list.
    pub fn store_interview_questions(&mut self, session_id: &str, raw: &Value) -> bool {
        let Some(record) = self.sessions.get_mut(session_id) else {
            debug!(session_id, "interview questions for unknown session, ignoring");
            return false;
        };
        record.questions = Some(map_interview_response(raw));
        record.updated_at = Utc::now();
        true
    }

    /// Apply a projection handed back by the tracker fold.
    pub fn apply_effect(&mut self, session_id: &str, effect: &SessionEffect) -> bool {
        match effect {
            SessionEffect::CandidateExtracted(payload) => {
                self.update_candidate_from_extraction(session_id, payload)
            }
            SessionEffect::QuestionsGenerated(payload) => {
                self.store_interview_questions(session_id, payload)
            }
        }
    }
}
