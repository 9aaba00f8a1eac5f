use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, AnswerValue};
use crate::model::{Question, QuestionVersion, ResponseOptions, Section, Survey};
use crate::version;
use crate::visibility::resolve_visibility;

/// Validation error metadata reported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Result returned from answer validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

/// Validates a full answer set against the survey's visible sections.
///
/// Hidden and inactive sections are exempt from the required check; answers
/// already collected for them are kept and not reported as unknown.
pub fn validate_answers(survey: &Survey, answers: &AnswerSet) -> ValidationResult {
    let visibility = resolve_visibility(survey, answers);
    let questions = survey.questions_by_id();

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for section in &survey.sections {
        if !section.is_active || !visibility.get(&section.id).copied().unwrap_or(true) {
            continue;
        }
        check_section(
            section,
            answers,
            &questions,
            &mut errors,
            &mut missing_required,
        );
    }

    let known: BTreeSet<&str> = survey
        .questions
        .iter()
        .map(|question| question.id.as_str())
        .collect();
    let unknown_fields: Vec<String> = answers
        .answers
        .keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

/// Validates the answers of one section, as collected at section boundaries.
pub fn validate_section(survey: &Survey, section: &Section, answers: &AnswerSet) -> ValidationResult {
    let questions = survey.questions_by_id();
    let mut errors = Vec::new();
    let mut missing_required = Vec::new();
    check_section(
        section,
        answers,
        &questions,
        &mut errors,
        &mut missing_required,
    );
    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty(),
        errors,
        missing_required,
        unknown_fields: Vec::new(),
    }
}

fn check_section(
    section: &Section,
    answers: &AnswerSet,
    questions: &std::collections::BTreeMap<&str, &Question>,
    errors: &mut Vec<ValidationError>,
    missing_required: &mut Vec<String>,
) {
    for question_id in &section.question_ids {
        match answers.answer(question_id) {
            None => {
                if section.is_required {
                    missing_required.push(question_id.clone());
                }
            }
            Some(value) => {
                if let Some(question) = questions.get(question_id.as_str())
                    && let Some(current) = version::resolve(question)
                    && let Some(error) = check_value(question_id, current, value)
                {
                    errors.push(error);
                }
            }
        }
    }
}

fn check_value(
    question_id: &str,
    current: &QuestionVersion,
    value: &AnswerValue,
) -> Option<ValidationError> {
    if !matches_kind(current, value) {
        return Some(answer_error(
            question_id,
            "answer does not match the question's response type",
            "type_mismatch",
        ));
    }

    if current.response_type.is_choice()
        && let Some(choices) = current.options.as_ref().and_then(ResponseOptions::choices)
        && !within_choices(value, choices)
    {
        return Some(answer_error(
            question_id,
            "answer is not one of the configured choices",
            "choice_mismatch",
        ));
    }

    if current.response_type.is_numeric()
        && let Some((min, max)) = current.options.as_ref().and_then(ResponseOptions::range)
        && let Some(number) = value.as_number()
    {
        if number < min {
            return Some(answer_error(question_id, "answer below minimum", "min"));
        }
        if number > max {
            return Some(answer_error(question_id, "answer above maximum", "max"));
        }
    }

    None
}

fn matches_kind(current: &QuestionVersion, value: &AnswerValue) -> bool {
    if current.response_type.is_multi() {
        return matches!(value, AnswerValue::Many(_));
    }
    if current.response_type.is_numeric() {
        return matches!(value, AnswerValue::Number(_));
    }
    matches!(value, AnswerValue::Text(_))
}

fn within_choices(value: &AnswerValue, choices: &[String]) -> bool {
    match value {
        AnswerValue::Many(items) => items.iter().all(|item| within_choices(item, choices)),
        scalar => choices.iter().any(|choice| *choice == scalar.normalized()),
    }
}

fn answer_error(question_id: &str, message: &str, code: &str) -> ValidationError {
    ValidationError {
        question_id: Some(question_id.to_string()),
        path: Some(format!("/{}", question_id)),
        message: message.into(),
        code: Some(code.into()),
    }
}

/// Authoring-time lint over a survey document.
///
/// The evaluation core tolerates every condition reported here; the lint
/// exists so authors can fix dangling references and cycles before
/// respondents hit the defensive fallbacks.
pub fn lint_survey(survey: &Survey) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    let mut seen_sections = BTreeSet::new();
    for section in &survey.sections {
        if !seen_sections.insert(section.id.as_str()) {
            findings.push(lint_error(
                &section.id,
                format!("duplicate section id '{}'", section.id),
                "duplicate_section",
            ));
        }
    }

    let mut seen_questions = BTreeSet::new();
    for question in &survey.questions {
        if !seen_questions.insert(question.id.as_str()) {
            findings.push(lint_error(
                &question.id,
                format!("duplicate question id '{}'", question.id),
                "duplicate_question",
            ));
        }
        lint_question(question, &mut findings);
    }

    let sections = survey.sections_by_id();
    let questions = survey.questions_by_id();

    for section in &survey.sections {
        for question_id in &section.question_ids {
            if !questions.contains_key(question_id.as_str()) {
                findings.push(lint_error(
                    &section.id,
                    format!(
                        "section '{}' references unknown question '{}'",
                        section.id, question_id
                    ),
                    "unknown_question",
                ));
            }
        }

        if let Some(rule) = &section.visibility_condition {
            if rule.depends_on_section_id == section.id {
                findings.push(lint_error(
                    &section.id,
                    format!("section '{}' depends on itself", section.id),
                    "self_dependency",
                ));
            }
            match sections.get(rule.depends_on_section_id.as_str()) {
                None => findings.push(lint_error(
                    &section.id,
                    format!(
                        "section '{}' depends on unknown section '{}'",
                        section.id, rule.depends_on_section_id
                    ),
                    "unknown_dependency_section",
                )),
                Some(dependency) => {
                    if !dependency.question_ids.contains(&rule.depends_on_question_id) {
                        findings.push(lint_error(
                            &section.id,
                            format!(
                                "dependency question '{}' is not part of section '{}'",
                                rule.depends_on_question_id, dependency.id
                            ),
                            "dependency_outside_section",
                        ));
                    }
                }
            }
        }

        if let Some(logic) = &section.skip_logic {
            for rule in &logic.rules {
                if !questions.contains_key(rule.question_id.as_str()) {
                    findings.push(lint_error(
                        &section.id,
                        format!(
                            "skip rule in section '{}' references unknown question '{}'",
                            section.id, rule.question_id
                        ),
                        "unknown_skip_question",
                    ));
                }
                match sections.get(rule.skip_to_section_id.as_str()) {
                    None => findings.push(lint_error(
                        &section.id,
                        format!(
                            "skip rule in section '{}' targets unknown section '{}'",
                            section.id, rule.skip_to_section_id
                        ),
                        "unknown_skip_target",
                    )),
                    Some(target) if !target.is_active => findings.push(lint_error(
                        &section.id,
                        format!(
                            "skip rule in section '{}' targets inactive section '{}'",
                            section.id, target.id
                        ),
                        "inactive_skip_target",
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    lint_visibility_cycles(survey, &mut findings);
    lint_skip_cycles(survey, &mut findings);

    findings
}

fn lint_question(question: &Question, findings: &mut Vec<ValidationError>) {
    if question.versions.is_empty() {
        findings.push(lint_error(
            &question.id,
            format!("question '{}' has no versions", question.id),
            "empty_versions",
        ));
        return;
    }
    if !question
        .versions
        .iter()
        .any(|entry| entry.version == question.current_version)
    {
        findings.push(lint_error(
            &question.id,
            format!(
                "question '{}' points at missing version {}",
                question.id, question.current_version
            ),
            "stale_current_version",
        ));
    }
    for entry in &question.versions {
        if entry.response_type.is_choice()
            && entry
                .options
                .as_ref()
                .and_then(ResponseOptions::choices)
                .is_none_or(|choices| choices.is_empty())
        {
            findings.push(lint_error(
                &question.id,
                format!(
                    "choice question '{}' v{} has no choices",
                    question.id, entry.version
                ),
                "missing_choices",
            ));
        }
        if let Some((min, max)) = entry.options.as_ref().and_then(ResponseOptions::range)
            && min > max
        {
            findings.push(lint_error(
                &question.id,
                format!(
                    "question '{}' v{} has an inverted range",
                    question.id, entry.version
                ),
                "inverted_range",
            ));
        }
    }
}

/// Follows each section's dependency chain; a revisit means a cycle.
fn lint_visibility_cycles(survey: &Survey, findings: &mut Vec<ValidationError>) {
    let sections = survey.sections_by_id();
    for section in &survey.sections {
        let mut visited = BTreeSet::new();
        visited.insert(section.id.as_str());
        let mut current = section;
        while let Some(rule) = &current.visibility_condition {
            let Some(next) = sections.get(rule.depends_on_section_id.as_str()) else {
                break;
            };
            if !visited.insert(next.id.as_str()) {
                findings.push(lint_error(
                    &section.id,
                    format!(
                        "visibility dependencies of section '{}' form a cycle",
                        section.id
                    ),
                    "visibility_cycle",
                ));
                break;
            }
            current = next;
        }
    }
}

/// Reports each section that can skip back to itself through skip targets.
fn lint_skip_cycles(survey: &Survey, findings: &mut Vec<ValidationError>) {
    let sections = survey.sections_by_id();
    for section in &survey.sections {
        let mut visited = BTreeSet::new();
        let mut frontier = vec![section.id.as_str()];
        let mut cyclic = false;
        while let Some(id) = frontier.pop() {
            let Some(node) = sections.get(id) else {
                continue;
            };
            let Some(logic) = &node.skip_logic else {
                continue;
            };
            if !logic.enabled {
                continue;
            }
            for rule in &logic.rules {
                let target = rule.skip_to_section_id.as_str();
                if target == section.id {
                    cyclic = true;
                } else if visited.insert(target) {
                    frontier.push(target);
                }
            }
            if cyclic {
                break;
            }
        }
        if cyclic {
            findings.push(lint_error(
                &section.id,
                format!("skip rules reachable from section '{}' form a cycle", section.id),
                "skip_cycle",
            ));
        }
    }
}

fn lint_error(id: &str, message: String, code: &str) -> ValidationError {
    ValidationError {
        question_id: None,
        path: Some(format!("/{}", id)),
        message,
        code: Some(code.into()),
    }
}
