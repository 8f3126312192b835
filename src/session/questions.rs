use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category a generated interview question belongs to.
///
/// Mirrors the named arrays the question-generation stage emits; the raw
/// payload groups questions per category and this enum tags them after
/// flattening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Technical,
    Behavioral,
    Experience,
    Situational,
    CulturalFit,
    RedFlag,
    ProbeArea,
}

impl QuestionKind {
    /// Every category, in the order the flat list is assembled.
    pub const ALL: [QuestionKind; 7] = [
        QuestionKind::Technical,
        QuestionKind::Behavioral,
        QuestionKind::Experience,
        QuestionKind::Situational,
        QuestionKind::CulturalFit,
        QuestionKind::RedFlag,
        QuestionKind::ProbeArea,
    ];

    /// Field name of this category's array in the raw payload.
    pub fn source_field(&self) -> &'static str {
        match self {
            QuestionKind::Technical => "technical_questions",
            QuestionKind::Behavioral => "behavioral_questions",
            QuestionKind::Experience => "experience_questions",
            QuestionKind::Situational => "situational_questions",
            QuestionKind::CulturalFit => "cultural_fit_questions",
            QuestionKind::RedFlag => "red_flag_questions",
            QuestionKind::ProbeArea => "areas_to_probe",
        }
    }

    /// Prefix for the per-category sequential question ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            QuestionKind::Technical => "tech",
            QuestionKind::Behavioral => "behavioral",
            QuestionKind::Experience => "experience",
            QuestionKind::Situational => "situational",
            QuestionKind::CulturalFit => "cultural",
            QuestionKind::RedFlag => "red-flag",
            QuestionKind::ProbeArea => "probe",
        }
    }
}

/// Difficulty tag shown next to a question. The generator does not rate
/// difficulty, so mapped questions default to `Medium`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// One interview question in the flat, typed list the interview flow
/// consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Sequential per-category id, e.g. `tech-1`, `behavioral-2`.
    pub id: String,
    pub question: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    /// Model answer, when the generator provides one. The current generator
    /// emits bare question strings, so this stays unset after mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
}

/// Flattened question list plus the generator's recommended duration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
    /// Copied through from the payload unchanged, e.g. `"45-60 minutes"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_duration: Option<String>,
}

impl QuestionSet {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Flatten the raw question groups into a [`QuestionSet`].
///
/// The payload is either the group object itself or wraps it under an
/// `interview_questions` field; both shapes occur upstream. Missing groups
/// and non-string entries are skipped, never an error.
pub fn map_interview_response(raw: &Value) -> QuestionSet {
    let groups = raw.get("interview_questions").unwrap_or(raw);

    let mut questions = Vec::new();
    for kind in QuestionKind::ALL {
        let Some(entries) = groups.get(kind.source_field()).and_then(Value::as_array) else {
            continue;
        };
        for (index, entry) in entries.iter().enumerate() {
            let Some(text) = entry.as_str() else {
                continue;
            };
            questions.push(Question {
                id: format!("{}-{}", kind.id_prefix(), index + 1),
                question: text.to_string(),
                kind,
                difficulty: Difficulty::default(),
                expected_answer: None,
            });
        }
    }

    QuestionSet {
        questions,
        interview_duration: groups
            .get("interview_duration")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_all_categories_with_sequential_ids() {
        let raw = json!({
            "technical_questions": ["T1", "T2"],
            "behavioral_questions": ["B1"],
            "experience_questions": ["E1"],
            "situational_questions": ["S1"],
            "cultural_fit_questions": ["C1"],
            "red_flag_questions": ["R1"],
            "areas_to_probe": ["P1"],
            "interview_duration": "45-60 minutes",
        });
        let set = map_interview_response(&raw);
        assert_eq!(set.questions.len(), 8);
        assert_eq!(set.questions[0].id, "tech-1");
        assert_eq!(set.questions[1].id, "tech-2");
        assert_eq!(set.questions[2].id, "behavioral-1");
        assert_eq!(set.questions[2].kind, QuestionKind::Behavioral);
        assert!(set
            .questions
            .iter()
            .all(|q| q.difficulty == Difficulty::Medium));
        assert_eq!(set.interview_duration.as_deref(), Some("45-60 minutes"));
    }

    #[test]
    fn accepts_payload_nested_under_interview_questions() {
        let raw = json!({
            "interview_questions": {
                "technical_questions": ["Explain ownership in Rust."],
                "interview_duration": "30 minutes",
            }
        });
        let set = map_interview_response(&raw);
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].question, "Explain ownership in Rust.");
        assert_eq!(set.interview_duration.as_deref(), Some("30 minutes"));
    }

    #[test]
    fn missing_groups_and_non_string_entries_are_skipped() {
        let raw = json!({
            "technical_questions": ["ok", 42, null],
            "behavioral_questions": "not an array",
        });
        let set = map_interview_response(&raw);
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].question, "ok");
        assert_eq!(set.interview_duration, None);
    }

    #[test]
    fn empty_payload_maps_to_empty_set() {
        let set = map_interview_response(&json!({}));
        assert!(set.is_empty());
        assert_eq!(set.interview_duration, None);
    }
}
