use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A question document: a stable id plus an append-only log of versions.
///
/// Array order of `versions` is insertion order and is not guaranteed to
/// match the `version` field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub current_version: u32,
    #[serde(default)]
    pub versions: Vec<QuestionVersion>,
}

/// An immutable snapshot of a question's text and configuration.
///
/// Versions are never mutated in place; authoring appends a new entry and
/// advances the parent's `current_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionVersion {
    pub version: u32,
    pub question_text: String,
    pub response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ResponseOptions>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub category_tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub survey_themes: BTreeSet<String>,
    #[serde(default)]
    pub is_reusable: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

fn default_active() -> bool {
    true
}

/// 1 is highest, 5 lowest.
fn default_priority() -> u8 {
    3
}

/// How a respondent answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    ShortText,
    LongText,
    SingleSelect,
    MultiSelect,
    Scale,
    Likert,
    Dropdown,
    Checkbox,
    Date,
    Number,
    FreeText,
}

impl ResponseType {
    /// Types answered by picking from an ordered list of choice labels.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            ResponseType::SingleSelect
                | ResponseType::MultiSelect
                | ResponseType::Dropdown
                | ResponseType::Checkbox
        )
    }

    /// Types whose answer is a list of selections rather than one value.
    pub fn is_multi(&self) -> bool {
        matches!(self, ResponseType::MultiSelect | ResponseType::Checkbox)
    }

    /// Types whose answer is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ResponseType::Scale | ResponseType::Likert | ResponseType::Number
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::ShortText => "shortText",
            ResponseType::LongText => "longText",
            ResponseType::SingleSelect => "singleSelect",
            ResponseType::MultiSelect => "multiSelect",
            ResponseType::Scale => "scale",
            ResponseType::Likert => "likert",
            ResponseType::Dropdown => "dropdown",
            ResponseType::Checkbox => "checkbox",
            ResponseType::Date => "date",
            ResponseType::Number => "number",
            ResponseType::FreeText => "freeText",
        }
    }
}

/// Per-type answer options: either ordered choice labels or a numeric range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResponseOptions {
    Choices(Vec<String>),
    Range {
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
}

impl ResponseOptions {
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            ResponseOptions::Choices(labels) => Some(labels),
            ResponseOptions::Range { .. } => None,
        }
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            ResponseOptions::Choices(_) => None,
            ResponseOptions::Range { min, max, .. } => Some((*min, *max)),
        }
    }
}
