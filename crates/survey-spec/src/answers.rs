use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_cbor::{to_vec, value::to_value};

/// A loosely typed answer or condition target.
///
/// Respondent answers and authored comparison literals share this shape so
/// the condition evaluator can pattern-match instead of guessing at runtime
/// coercions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Many(Vec<AnswerValue>),
}

impl AnswerValue {
    /// String normalization used for equality and substring comparisons.
    ///
    /// `5` and `"5"` normalize identically, as do `true` and `"true"`.
    /// `Many` joins its elements with a comma; kept total rather than
    /// rejected so the evaluator never errors.
    pub fn normalized(&self) -> String {
        match self {
            AnswerValue::Bool(flag) => flag.to_string(),
            AnswerValue::Number(value) => format_number(*value),
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Many(items) => items
                .iter()
                .map(AnswerValue::normalized)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Numeric coercion for ordered comparisons.
    ///
    /// Text parses after trimming, with blank input treated as no value.
    /// A single-element list coerces like its element; longer lists never
    /// coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse().ok()
                }
            }
            AnswerValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            AnswerValue::Many(items) if items.len() == 1 => items[0].as_number(),
            AnswerValue::Many(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[AnswerValue]> {
        match self {
            AnswerValue::Many(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Number(value as f64)
    }
}

impl From<Vec<AnswerValue>> for AnswerValue {
    fn from(items: Vec<AnswerValue>) -> Self {
        AnswerValue::Many(items)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Optional metadata paired with an `AnswerSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The accumulated responses for one respondent session.
///
/// Grows monotonically; backward navigation never deletes collected answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSet {
    pub survey_id: String,
    pub spec_version: String,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl AnswerSet {
    /// Creates a fresh empty answer set for a survey.
    pub fn new(survey_id: impl Into<String>, spec_version: impl Into<String>) -> Self {
        Self {
            survey_id: survey_id.into(),
            spec_version: spec_version.into(),
            answers: BTreeMap::new(),
            meta: None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn record(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.answers.insert(question_id.into(), value);
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Serializes the answer set as canonical CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        let canonical = to_value(self)?;
        to_vec(&canonical)
    }

    /// Serializes the answer set as indented JSON for debugging.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
