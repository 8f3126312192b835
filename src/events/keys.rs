//! Composite routing keys embedded in `stepName` and `RUN_ERROR` messages.
//!
//! The pipeline encodes correlation as `"<label> - <runId>"` strings. The
//! delimiter is the literal three-character sequence `" - "`; this is an
//! exact boundary contract with the upstream emitter and must not change.

/// Literal delimiter used by every composite key on the wire.
pub const KEY_DELIMITER: &str = " - ";

/// Parsed `stepName` key: `"<label> - <runId>"`, possibly followed by
/// further delimited text that plays no part in routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepKey {
    pub label: String,
    pub run_id: String,
}

impl StepKey {
    /// Split a `stepName` on [`KEY_DELIMITER`]. Routing uses the second
    /// token as the owning run id; anything after it is ignored.
    ///
    /// Returns `None` when no second token exists, in which case the event
    /// carrying the key degrades to a no-op.
    pub fn parse(step_name: &str) -> Option<Self> {
        let mut parts = step_name.split(KEY_DELIMITER);
        let label = parts.next()?.to_string();
        let run_id = parts.next()?.to_string();
        Some(Self { label, run_id })
    }

    /// Composite step identifier, also used to correlate the finish event
    /// with the step created by the start event.
    pub fn step_id(&self) -> String {
        format!("step {} - {}", self.label, self.run_id)
    }
}

/// Parsed `RUN_ERROR` message: `"<runId> - <detail>"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunErrorKey {
    pub run_id: String,
    pub detail: String,
}

impl RunErrorKey {
    /// Split on the first [`KEY_DELIMITER`]. A message without a delimiter
    /// routes on the whole string; an empty remainder falls back to the
    /// whole message as the error detail, matching the upstream fallback.
    pub fn parse(message: &str) -> Self {
        match message.split_once(KEY_DELIMITER) {
            Some((run_id, detail)) => Self {
                run_id: run_id.to_string(),
                detail: if detail.is_empty() {
                    message.to_string()
                } else {
                    detail.to_string()
                },
            },
            None => Self {
                run_id: message.to_string(),
                detail: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_key_routes_on_second_token() {
        let key = StepKey::parse("Parse Resume - run-42").unwrap();
        assert_eq!(key.label, "Parse Resume");
        assert_eq!(key.run_id, "run-42");
        assert_eq!(key.step_id(), "step Parse Resume - run-42");
    }

    #[test]
    fn step_key_ignores_trailing_tokens() {
        // Real emissions look like "1 - document_extraction - Parsing CV contents ...".
        let key = StepKey::parse("1 - document_extraction - Parsing CV contents ...").unwrap();
        assert_eq!(key.label, "1");
        assert_eq!(key.run_id, "document_extraction");
        assert_eq!(key.step_id(), "step 1 - document_extraction");
    }

    #[test]
    fn step_key_requires_two_tokens() {
        assert_eq!(StepKey::parse("no delimiter here"), None);
        assert_eq!(StepKey::parse(""), None);
    }

    #[test]
    fn hyphens_without_spaces_are_not_delimiters() {
        assert_eq!(StepKey::parse("a-b"), None);
        let key = StepKey::parse("extract-skills - run-42").unwrap();
        assert_eq!(key.label, "extract-skills");
        assert_eq!(key.run_id, "run-42");
    }

    #[test]
    fn run_error_key_splits_on_first_delimiter() {
        let key = RunErrorKey::parse("document_extraction - timeout contacting provider");
        assert_eq!(key.run_id, "document_extraction");
        assert_eq!(key.detail, "timeout contacting provider");
    }

    #[test]
    fn run_error_key_keeps_later_delimiters_in_detail() {
        let key = RunErrorKey::parse("world_check - upstream said: a - b");
        assert_eq!(key.run_id, "world_check");
        assert_eq!(key.detail, "upstream said: a - b");
    }

    #[test]
    fn run_error_key_without_delimiter_uses_whole_message() {
        let key = RunErrorKey::parse("catastrophic failure");
        assert_eq!(key.run_id, "catastrophic failure");
        assert_eq!(key.detail, "catastrophic failure");
    }

    #[test]
    fn run_error_key_with_empty_remainder_falls_back() {
        let key = RunErrorKey::parse("cv_scoring - ");
        assert_eq!(key.run_id, "cv_scoring");
        assert_eq!(key.detail, "cv_scoring - ");
    }
}
