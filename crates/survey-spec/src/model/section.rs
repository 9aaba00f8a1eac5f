use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerValue;

/// A named, orderable group of questions shown together to a respondent.
///
/// `priority` defines the default linear order, lower first; ties keep
/// document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub question_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_condition: Option<VisibilityCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_logic: Option<SkipLogic>,
}

fn default_active() -> bool {
    true
}

/// Makes a section's presentation conditional on a previously given answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
    pub depends_on_section_id: String,
    pub depends_on_question_id: String,
    pub condition: ConditionKind,
    pub value: AnswerValue,
}

/// Redirects survey flow to a non-default section based on an answer.
///
/// Rules are ordered; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkipLogic {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SkipRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkipRule {
    pub question_id: String,
    pub condition: ConditionKind,
    pub value: AnswerValue,
    pub skip_to_section_id: String,
}

/// The comparison vocabulary shared by visibility conditions and skip rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}
