use survey_spec::{
    AnswerSet, AnswerValue, FlowOutcome, RenderStatus, Survey, build_section_payload, flow,
    render_json, render_text,
};

fn fixture() -> Survey {
    serde_json::from_str(include_str!("fixtures/onboarding_survey.json")).expect("deserialize")
}

#[test]
fn payload_carries_the_current_section_view() {
    let survey = fixture();
    let answers = AnswerSet::new(&survey.id, &survey.version);
    let outcome = flow::start(&answers, &survey);

    let payload = build_section_payload(&survey, &answers, &outcome);
    assert_eq!(payload.status, RenderStatus::InProgress);
    let section = payload.section.as_ref().expect("section view");
    assert_eq!(section.id, "intro");
    assert_eq!(section.questions.len(), 2);
    // The resolved current version of q_role is v2.
    assert_eq!(section.questions[0].text, "Which role are you joining as?");
}

#[test]
fn progress_counts_only_visible_sections() {
    let survey = fixture();
    let mut answers = AnswerSet::new(&survey.id, &survey.version);
    answers.record("q_role", AnswerValue::from("designer"));

    let payload =
        build_section_payload(&survey, &answers, &FlowOutcome::Section("advanced".into()));
    // basics stays hidden: intro(2) + advanced(1) + wrapup(1).
    assert_eq!(payload.progress.total, 4);
    assert_eq!(payload.progress.answered, 1);
}

#[test]
fn render_json_uses_camel_case_keys() {
    let survey = fixture();
    let answers = AnswerSet::new(&survey.id, &survey.version);
    let outcome = flow::start(&answers, &survey);
    let payload = build_section_payload(&survey, &answers, &outcome);

    let json = render_json(&payload);
    assert_eq!(json["surveyId"], "onboarding");
    assert_eq!(json["status"], "in_progress");
    let questions = json["section"]["questions"].as_array().expect("questions");
    assert_eq!(questions[0]["id"], "q_role");
    assert_eq!(questions[0]["responseType"], "singleSelect");
    assert!(questions[0]["options"].is_array());
}

#[test]
fn render_text_lists_questions_and_choices() {
    let survey = fixture();
    let mut answers = AnswerSet::new(&survey.id, &survey.version);
    answers.record("q_role", AnswerValue::from("engineer"));
    let payload = build_section_payload(&survey, &answers, &FlowOutcome::Section("intro".into()));

    let text = render_text(&payload);
    assert!(text.contains("Survey: Team Onboarding (onboarding)"));
    assert!(text.contains("Section: Introduction [required]"));
    assert!(text.contains("= engineer"));
    assert!(text.contains("Choices: engineer, designer, manager"));
}

#[test]
fn completion_payload_has_no_section() {
    let survey = fixture();
    let answers = AnswerSet::new(&survey.id, &survey.version);
    let payload = build_section_payload(&survey, &answers, &FlowOutcome::Complete);

    assert_eq!(payload.status, RenderStatus::Complete);
    assert!(payload.section.is_none());
    assert!(render_text(&payload).contains("All sections are complete."));
    assert!(render_json(&payload)["section"].is_null());
}
