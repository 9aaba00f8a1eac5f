use std::collections::BTreeMap;

use thiserror::Error;

use survey_spec::{AnswerSet, Question, QuestionVersion, Section};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question '{0}' not found")]
    QuestionNotFound(String),
    #[error("section '{0}' not found")]
    SectionNotFound(String),
    #[error("question '{id}' already has version {version}")]
    DuplicateVersion { id: String, version: u32 },
    #[error("question '{id}' has no version {version}")]
    UnknownVersion { id: String, version: u32 },
    #[error("answer set for session '{0}' not found")]
    AnswerSetNotFound(String),
}

/// Persistence seam for survey documents and respondent answer sets.
///
/// Versions are append-only: a published version is never mutated in place,
/// since other sessions may be mid-flight reading it by number. Advancing
/// `currentVersion` is a separate pointer update so `publish_version` can
/// order the two writes.
pub trait SurveyStore {
    fn question(&self, id: &str) -> Result<Question, StoreError>;
    fn section(&self, id: &str) -> Result<Section, StoreError>;

    /// Appends a new version to a question's log. Rejects a version number
    /// the log already carries.
    fn append_version(&mut self, question_id: &str, version: QuestionVersion)
    -> Result<(), StoreError>;

    /// Moves the current-version pointer. Rejects a version number the log
    /// does not carry, so a session can never read a pointer without a
    /// matching entry.
    fn advance_current_version(&mut self, question_id: &str, version: u32)
    -> Result<(), StoreError>;

    fn save_answer_set(&mut self, session_id: &str, answers: &AnswerSet) -> Result<(), StoreError>;
    fn answer_set(&self, session_id: &str) -> Result<AnswerSet, StoreError>;

    /// Publishes a new version: append first, then advance the pointer.
    fn publish_version(
        &mut self,
        question_id: &str,
        version: QuestionVersion,
    ) -> Result<(), StoreError> {
        let number = version.version;
        self.append_version(question_id, version)?;
        self.advance_current_version(question_id, number)
    }
}

/// In-memory store backing tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    questions: BTreeMap<String, Question>,
    sections: BTreeMap<String, Section>,
    answer_sets: BTreeMap<String, AnswerSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_question(&mut self, question: Question) {
        self.questions.insert(question.id.clone(), question);
    }

    pub fn insert_section(&mut self, section: Section) {
        self.sections.insert(section.id.clone(), section);
    }
}

impl SurveyStore for MemoryStore {
    fn question(&self, id: &str) -> Result<Question, StoreError> {
        self.questions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::QuestionNotFound(id.to_string()))
    }

    fn section(&self, id: &str) -> Result<Section, StoreError> {
        self.sections
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SectionNotFound(id.to_string()))
    }

    fn append_version(
        &mut self,
        question_id: &str,
        version: QuestionVersion,
    ) -> Result<(), StoreError> {
        let question = self
            .questions
            .get_mut(question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?;
        if question
            .versions
            .iter()
            .any(|entry| entry.version == version.version)
        {
            return Err(StoreError::DuplicateVersion {
                id: question_id.to_string(),
                version: version.version,
            });
        }
        question.versions.push(version);
        Ok(())
    }

    fn advance_current_version(
        &mut self,
        question_id: &str,
        version: u32,
    ) -> Result<(), StoreError> {
        let question = self
            .questions
            .get_mut(question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?;
        if !question.versions.iter().any(|entry| entry.version == version) {
            return Err(StoreError::UnknownVersion {
                id: question_id.to_string(),
                version,
            });
        }
        question.current_version = version;
        Ok(())
    }

    fn save_answer_set(&mut self, session_id: &str, answers: &AnswerSet) -> Result<(), StoreError> {
        self.answer_sets
            .insert(session_id.to_string(), answers.clone());
        Ok(())
    }

    fn answer_set(&self, session_id: &str) -> Result<AnswerSet, StoreError> {
        self.answer_sets
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::AnswerSetNotFound(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_spec::{AnswerValue, ResponseType};

    fn version(number: u32) -> QuestionVersion {
        QuestionVersion {
            version: number,
            question_text: format!("text v{number}"),
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

    fn store_with_question() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_question(Question {
            id: "q1".into(),
            current_version: 1,
            versions: vec![version(1)],
        });
        store
    }

    #[test]
    fn publish_appends_then_advances() {
        let mut store = store_with_question();
        store.publish_version("q1", version(2)).expect("publish");
        let question = store.question("q1").expect("question");
        assert_eq!(question.current_version, 2);
        assert_eq!(question.versions.len(), 2);
    }

    #[test]
    fn append_rejects_duplicate_version_numbers() {
        let mut store = store_with_question();
        let err = store.append_version("q1", version(1)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateVersion { .. }));
    }

    #[test]
    fn advance_rejects_pointer_without_entry() {
        let mut store = store_with_question();
        let err = store.advance_current_version("q1", 7).unwrap_err();
        assert!(matches!(err, StoreError::UnknownVersion { .. }));
        // The pointer is unchanged after the rejected advance.
        assert_eq!(store.question("q1").expect("question").current_version, 1);
    }

    #[test]
    fn answer_sets_round_trip_by_session_id() {
        let mut store = MemoryStore::new();
        let mut answers = AnswerSet::new("survey-1", "1.0.0");
        answers.record("q1", AnswerValue::from("yes"));
        store.save_answer_set("session-1", &answers).expect("save");
        assert_eq!(store.answer_set("session-1").expect("load"), answers);
        assert!(matches!(
            store.answer_set("session-2"),
            Err(StoreError::AnswerSetNotFound(_))
        ));
    }
}
