use serde_json::{Map, Value, json};

use crate::model::{QuestionVersion, ResponseOptions, ResponseType, Survey};
use crate::version;
use crate::visibility::VisibilityMap;

/// Generates a JSON Schema describing the answers of the currently visible,
/// active sections.
///
/// Questions of visible required sections are listed in `required`. Hidden
/// or inactive sections contribute nothing, so the schema tightens as
/// answers change visibility.
pub fn answers_schema(survey: &Survey, visibility: &VisibilityMap) -> Value {
    let questions = survey.questions_by_id();
    let mut properties = Map::new();
    let mut required = Vec::new();

    for section in &survey.sections {
        if !section.is_active || !visibility.get(&section.id).copied().unwrap_or(true) {
            continue;
        }
        for question_id in &section.question_ids {
            let Some(question) = questions.get(question_id.as_str()) else {
                continue;
            };
            let Some(current) = version::resolve(question) else {
                continue;
            };
            properties.insert(question_id.clone(), question_schema(current));
            if section.is_required {
                required.push(Value::String(question_id.clone()));
            }
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn question_schema(current: &QuestionVersion) -> Value {
    match current.response_type {
        ResponseType::ShortText | ResponseType::LongText | ResponseType::FreeText => {
            json!({ "type": "string" })
        }
        ResponseType::Date => json!({ "type": "string", "format": "date" }),
        ResponseType::Number | ResponseType::Scale | ResponseType::Likert => {
            let mut schema = Map::new();
            schema.insert("type".into(), Value::String("number".into()));
            if let Some((min, max)) = current.options.as_ref().and_then(ResponseOptions::range) {
                schema.insert("minimum".into(), json!(min));
                schema.insert("maximum".into(), json!(max));
            }
            Value::Object(schema)
        }
        ResponseType::SingleSelect | ResponseType::Dropdown => {
            choice_schema(current, |choices| {
                json!({ "type": "string", "enum": choices })
            })
        }
        ResponseType::MultiSelect | ResponseType::Checkbox => {
            choice_schema(current, |choices| {
                json!({
                    "type": "array",
                    "items": { "type": "string", "enum": choices },
                })
            })
        }
    }
}

fn choice_schema(current: &QuestionVersion, build: fn(&[String]) -> Value) -> Value {
    match current.options.as_ref().and_then(ResponseOptions::choices) {
        Some(choices) => build(choices),
        None => json!({ "type": "string" }),
    }
}
