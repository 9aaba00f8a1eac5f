use survey_spec::{AnswerSet, AnswerValue, FlowOutcome, Section, Survey, flow, visibility};

/// Where a respondent session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    InSection(String),
    Complete,
}

/// Section counters for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub sections_done: usize,
    pub sections_total: usize,
}

/// Thin stateful shell over the pure flow functions.
///
/// Holds the survey snapshot, the accumulating answer set, and the history
/// of departed sections. All routing decisions are delegated to `flow` on
/// every transition; nothing is memoized.
pub struct SurveySession {
    survey: Survey,
    answers: AnswerSet,
    history: Vec<String>,
    state: SessionState,
}

impl SurveySession {
    pub fn new(survey: Survey) -> Self {
        let answers = AnswerSet::new(&survey.id, &survey.version);
        Self::with_answers(survey, answers)
    }

    /// Resumes a session from previously collected answers.
    pub fn with_answers(survey: Survey, answers: AnswerSet) -> Self {
        let state = match flow::start(&answers, &survey) {
            FlowOutcome::Section(id) => SessionState::InSection(id),
            FlowOutcome::Complete => SessionState::Complete,
        };
        Self {
            survey,
            answers,
            history: Vec::new(),
            state,
        }
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete)
    }

    pub fn current_section(&self) -> Option<&Section> {
        match &self.state {
            SessionState::InSection(id) => self.survey.section(id),
            SessionState::Complete => None,
        }
    }

    pub fn record_answer(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.answers.record(question_id, value);
    }

    /// Leaves the current section and moves to the next one.
    ///
    /// Loop guard: when a skip rule targets a section already departed this
    /// traversal, the session takes the default-order successor instead, so
    /// a cyclic skip configuration cannot stall the respondent. Backward
    /// navigation pops sections off the history, which keeps deliberate
    /// revisits after `back` unaffected.
    pub fn advance(&mut self) {
        let SessionState::InSection(current) = &self.state else {
            return;
        };
        let current = current.clone();

        let mut outcome = flow::next(&current, &self.answers, &self.survey);
        if let FlowOutcome::Section(target) = &outcome
            && self.history.iter().any(|past| past == target)
        {
            outcome = flow::next_in_order(&current, &self.answers, &self.survey);
        }

        self.history.push(current);
        self.state = match outcome {
            FlowOutcome::Section(id) => SessionState::InSection(id),
            FlowOutcome::Complete => SessionState::Complete,
        };
    }

    /// Returns to the most recently departed section.
    ///
    /// Collected answers are kept; only the position moves.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = SessionState::InSection(previous);
                true
            }
            None => false,
        }
    }

    pub fn progress(&self) -> SessionProgress {
        let visibility = visibility::resolve_visibility(&self.survey, &self.answers);
        let sections_total = self
            .survey
            .sections
            .iter()
            .filter(|section| {
                section.is_active && visibility.get(&section.id).copied().unwrap_or(true)
            })
            .count();
        SessionProgress {
            sections_done: self.history.len().min(sections_total),
            sections_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_spec::{ConditionKind, SkipLogic, SkipRule};

    fn fixture() -> Survey {
        serde_json::from_str(include_str!(
            "../../survey-spec/tests/fixtures/onboarding_survey.json"
        ))
        .expect("deserialize")
    }

    #[test]
    fn session_starts_in_first_visible_section() {
        let session = SurveySession::new(fixture());
        assert_eq!(session.state(), &SessionState::InSection("intro".into()));
        assert_eq!(session.current_section().map(|s| s.id.as_str()), Some("intro"));
    }

    #[test]
    fn advancing_follows_visibility_and_skip_rules() {
        let mut session = SurveySession::new(fixture());
        session.record_answer("q_role", AnswerValue::from("designer"));
        session.record_answer("q_experience", AnswerValue::Number(2.0));
        session.advance();
        assert_eq!(session.state(), &SessionState::InSection("advanced".into()));

        session.record_answer("q_stack", AnswerValue::Many(vec![AnswerValue::from("infra")]));
        session.advance();
        assert_eq!(session.state(), &SessionState::InSection("wrapup".into()));

        session.advance();
        assert!(session.is_complete());
    }

    #[test]
    fn back_returns_without_dropping_answers() {
        let mut session = SurveySession::new(fixture());
        session.record_answer("q_role", AnswerValue::from("engineer"));
        session.record_answer("q_experience", AnswerValue::Number(2.0));
        session.advance();
        assert_eq!(session.state(), &SessionState::InSection("basics".into()));

        assert!(session.back());
        assert_eq!(session.state(), &SessionState::InSection("intro".into()));
        assert_eq!(
            session.answers().answer("q_role"),
            Some(&AnswerValue::from("engineer"))
        );
        assert!(!session.back());
    }

    #[test]
    fn backward_skip_is_broken_by_the_loop_guard() {
        let mut survey = fixture();
        let wrapup = survey
            .sections
            .iter_mut()
            .find(|section| section.id == "wrapup")
            .expect("wrapup");
        wrapup.skip_logic = Some(SkipLogic {
            enabled: true,
            rules: vec![SkipRule {
                question_id: "q_feedback".into(),
                condition: ConditionKind::Contains,
                value: AnswerValue::from("again"),
                skip_to_section_id: "intro".into(),
            }],
        });

        let mut session = SurveySession::new(survey);
        session.record_answer("q_role", AnswerValue::from("designer"));
        session.record_answer("q_experience", AnswerValue::Number(10.0));
        session.advance(); // intro -> advanced (skip rule)
        session.advance(); // advanced -> wrapup
        assert_eq!(session.state(), &SessionState::InSection("wrapup".into()));

        session.record_answer("q_feedback", AnswerValue::from("again and again"));
        session.advance();
        // The skip points back at intro, already departed; the session takes
        // the default-order successor instead, which is completion.
        assert!(session.is_complete());
    }

    #[test]
    fn revisit_after_back_is_not_blocked() {
        let mut session = SurveySession::new(fixture());
        session.record_answer("q_role", AnswerValue::from("engineer"));
        session.record_answer("q_experience", AnswerValue::Number(2.0));
        session.advance();
        assert!(session.back());
        session.advance();
        assert_eq!(session.state(), &SessionState::InSection("basics".into()));
    }

    #[test]
    fn progress_tracks_visible_sections() {
        let mut session = SurveySession::new(fixture());
        session.record_answer("q_role", AnswerValue::from("engineer"));
        session.record_answer("q_experience", AnswerValue::Number(2.0));
        let progress = session.progress();
        assert_eq!(progress.sections_total, 4);
        assert_eq!(progress.sections_done, 0);

        session.advance();
        assert_eq!(session.progress().sections_done, 1);
    }

    #[test]
    fn empty_survey_completes_immediately() {
        let survey = Survey {
            id: "empty".into(),
            title: "Empty".into(),
            version: "1.0".into(),
            description: None,
            sections: Vec::new(),
            questions: Vec::new(),
        };
        let session = SurveySession::new(survey);
        assert!(session.is_complete());
    }
}
