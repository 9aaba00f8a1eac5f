use crate::model::{Question, QuestionVersion};

/// Selects the version of a question to display or edit.
///
/// Prefers the entry matching `current_version`; a stale pointer falls back
/// to the last entry in array order so a bookkeeping mismatch never prevents
/// rendering. `None` only when the version log is empty.
pub fn resolve(question: &Question) -> Option<&QuestionVersion> {
    question
        .versions
        .iter()
        .find(|entry| entry.version == question.current_version)
        .or_else(|| question.versions.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseType;

    fn entry(version: u32) -> QuestionVersion {
        QuestionVersion {
            version,
            question_text: format!("text v{version}"),
            response_type: ResponseType::ShortText,
            options: None,
            category_tags: Default::default(),
            survey_themes: Default::default(),
            is_reusable: false,
            is_active: true,
            priority: 3,
            usage_count: 0,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn matching_pointer_returns_exact_version() {
        let question = Question {
            id: "q1".into(),
            current_version: 2,
            versions: vec![entry(1), entry(2)],
        };
        assert_eq!(resolve(&question).map(|v| v.version), Some(2));
    }

    #[test]
    fn stale_pointer_falls_back_to_last_entry() {
        let question = Question {
            id: "q1".into(),
            current_version: 5,
            versions: vec![entry(1), entry(2)],
        };
        assert_eq!(resolve(&question).map(|v| v.version), Some(2));
    }

    #[test]
    fn fallback_follows_array_order_not_version_order() {
        let question = Question {
            id: "q1".into(),
            current_version: 9,
            versions: vec![entry(3), entry(1)],
        };
        assert_eq!(resolve(&question).map(|v| v.version), Some(1));
    }

    #[test]
    fn empty_log_yields_none() {
        let question = Question {
            id: "q1".into(),
            current_version: 1,
            versions: Vec::new(),
        };
        assert!(resolve(&question).is_none());
    }
}
