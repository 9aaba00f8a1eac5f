use serde_json::{Map, Value, json};

use crate::answers::{AnswerSet, AnswerValue};
use crate::flow::FlowOutcome;
use crate::model::{ResponseOptions, Section, Survey};
use crate::version;
use crate::visibility::resolve_visibility;

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// More sections remain.
    InProgress,
    /// Every active, visible section has been presented.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::InProgress => "in_progress",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Progress counters over the questions of active, visible sections.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub answered: usize,
    pub total: usize,
}

/// One question of the current section, with its resolved current version.
#[derive(Debug, Clone)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub response_type: &'static str,
    pub options: Option<ResponseOptions>,
    pub answer: Option<AnswerValue>,
}

/// The current section as the UI collaborator should present it.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub questions: Vec<QuestionView>,
}

/// Data-only payload consumed by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct SectionPayload {
    pub survey_id: String,
    pub survey_title: String,
    pub status: RenderStatus,
    pub progress: RenderProgress,
    pub section: Option<SectionView>,
}

/// Builds the render payload for a flow outcome.
///
/// Questions with no document or an empty version log are left out of the
/// view rather than failing the render.
pub fn build_section_payload(
    survey: &Survey,
    answers: &AnswerSet,
    outcome: &FlowOutcome,
) -> SectionPayload {
    let visibility = resolve_visibility(survey, answers);

    let mut answered = 0;
    let mut total = 0;
    for section in &survey.sections {
        if !section.is_active || !visibility.get(&section.id).copied().unwrap_or(true) {
            continue;
        }
        for question_id in &section.question_ids {
            total += 1;
            if answers.is_answered(question_id) {
                answered += 1;
            }
        }
    }

    let section = outcome
        .section_id()
        .and_then(|id| survey.section(id))
        .map(|section| section_view(survey, answers, section));

    let status = match outcome {
        FlowOutcome::Section(_) => RenderStatus::InProgress,
        FlowOutcome::Complete => RenderStatus::Complete,
    };

    SectionPayload {
        survey_id: survey.id.clone(),
        survey_title: survey.title.clone(),
        status,
        progress: RenderProgress { answered, total },
        section,
    }
}

fn section_view(survey: &Survey, answers: &AnswerSet, section: &Section) -> SectionView {
    let questions = section
        .question_ids
        .iter()
        .filter_map(|question_id| {
            let question = survey.question(question_id)?;
            let current = version::resolve(question)?;
            Some(QuestionView {
                id: question.id.clone(),
                text: current.question_text.clone(),
                response_type: current.response_type.as_str(),
                options: current.options.clone(),
                answer: answers.answer(question_id).cloned(),
            })
        })
        .collect();

    SectionView {
        id: section.id.clone(),
        name: section.name.clone(),
        description: section.description.clone(),
        required: section.is_required,
        questions,
    }
}

/// Renders the payload as a camelCase JSON value.
pub fn render_json(payload: &SectionPayload) -> Value {
    let section = payload.section.as_ref().map(|section| {
        let questions = section
            .questions
            .iter()
            .map(|question| {
                let mut map = Map::new();
                map.insert("id".into(), Value::String(question.id.clone()));
                map.insert("questionText".into(), Value::String(question.text.clone()));
                map.insert(
                    "responseType".into(),
                    Value::String(question.response_type.to_string()),
                );
                if let Some(options) = &question.options {
                    map.insert(
                        "options".into(),
                        serde_json::to_value(options).unwrap_or(Value::Null),
                    );
                }
                if let Some(answer) = &question.answer {
                    map.insert(
                        "answer".into(),
                        serde_json::to_value(answer).unwrap_or(Value::Null),
                    );
                }
                Value::Object(map)
            })
            .collect::<Vec<_>>();

        json!({
            "id": section.id,
            "name": section.name,
            "description": section.description,
            "required": section.required,
            "questions": questions,
        })
    });

    json!({
        "surveyId": payload.survey_id,
        "surveyTitle": payload.survey_title,
        "status": payload.status.as_str(),
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
        },
        "section": section,
    })
}

/// Renders the payload as human-friendly text.
pub fn render_text(payload: &SectionPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Survey: {} ({})",
        payload.survey_title, payload.survey_id
    ));
    lines.push(format!(
        "Status: {} ({}/{})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total
    ));

    match &payload.section {
        Some(section) => {
            let mut header = format!("Section: {}", section.name);
            if section.required {
                header.push_str(" [required]");
            }
            lines.push(header);
            if let Some(description) = &section.description {
                lines.push(format!("  {}", description));
            }
            lines.push("Questions:".to_string());
            for question in &section.questions {
                let mut entry = format!(
                    " - {}: {} ({})",
                    question.id, question.text, question.response_type
                );
                if let Some(answer) = &question.answer {
                    entry.push_str(&format!(" = {}", answer.normalized()));
                }
                lines.push(entry);
                if let Some(choices) = question.options.as_ref().and_then(ResponseOptions::choices) {
                    lines.push(format!("   Choices: {}", choices.join(", ")));
                }
            }
        }
        None => {
            lines.push("All sections are complete.".to_string());
        }
    }

    lines.join("\n")
}
