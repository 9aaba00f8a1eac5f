use crate::answers::AnswerSet;
use crate::condition;
use crate::model::{Section, SectionIndex, Survey};

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Decides whether one section is visible under the answers collected so far.
///
/// A section without a condition is always visible. A condition whose
/// `dependsOnSectionId` is unknown resolves to hidden rather than erroring.
/// Visibility is not transitive: the depended-on section's own visibility is
/// never consulted, only the presence and value of the dependency answer.
pub fn is_visible(section: &Section, answers: &AnswerSet, sections: &SectionIndex<'_>) -> bool {
    let Some(rule) = &section.visibility_condition else {
        return true;
    };
    if !sections.contains_key(rule.depends_on_section_id.as_str()) {
        return false;
    }
    let answer = answers.answer(&rule.depends_on_question_id);
    condition::evaluate(answer, rule.condition, &rule.value)
}

/// Resolves visibility for every section of a survey in one pass.
pub fn resolve_visibility(survey: &Survey, answers: &AnswerSet) -> VisibilityMap {
    let index = survey.sections_by_id();
    let mut map = VisibilityMap::new();
    for section in &survey.sections {
        map.insert(section.id.clone(), is_visible(section, answers, &index));
    }
    map
}
