use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::question::Question;
use crate::model::section::Section;

/// Lookup table from section id to section, borrowed from a `Survey`.
pub type SectionIndex<'a> = BTreeMap<&'a str, &'a Section>;

/// The delivery snapshot handed to the flow engine: all sections and the
/// question documents they reference, as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn sections_by_id(&self) -> SectionIndex<'_> {
        self.sections
            .iter()
            .map(|section| (section.id.as_str(), section))
            .collect()
    }

    pub fn questions_by_id(&self) -> BTreeMap<&str, &Question> {
        self.questions
            .iter()
            .map(|question| (question.id.as_str(), question))
            .collect()
    }
}
