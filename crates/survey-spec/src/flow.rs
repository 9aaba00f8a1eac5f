use crate::answers::AnswerSet;
use crate::model::{Section, SectionIndex, Survey};
use crate::skip;
use crate::visibility;

/// What the flow controller decided: another section to render, or done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Section(String),
    Complete,
}

impl FlowOutcome {
    pub fn section_id(&self) -> Option<&str> {
        match self {
            FlowOutcome::Section(id) => Some(id),
            FlowOutcome::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FlowOutcome::Complete)
    }
}

/// The first active, visible section under the given answers.
pub fn start(answers: &AnswerSet, survey: &Survey) -> FlowOutcome {
    let index = survey.sections_by_id();
    ordered(survey)
        .into_iter()
        .find(|section| section.is_active && visibility::is_visible(section, answers, &index))
        .map(|section| FlowOutcome::Section(section.id.clone()))
        .unwrap_or(FlowOutcome::Complete)
}

/// The section to present after leaving `current_section_id`.
///
/// Skip logic is consulted first; a skip target is taken only when it exists
/// and is active. Otherwise the default order applies: the next active,
/// visible section by ascending priority. Every call recomputes from the
/// full current answer set, so revising an earlier answer mid-survey changes
/// downstream routing immediately. An unknown current id degrades to
/// `start`.
pub fn next(current_section_id: &str, answers: &AnswerSet, survey: &Survey) -> FlowOutcome {
    let sections = ordered(survey);
    let Some(position) = sections
        .iter()
        .position(|section| section.id == current_section_id)
    else {
        return start(answers, survey);
    };

    let index = survey.sections_by_id();
    if let Some(target) = skip::next_section_id(sections[position], answers)
        && let Some(section) = index.get(target)
        && section.is_active
    {
        return FlowOutcome::Section(section.id.clone());
    }

    successor_in_order(&sections, position, answers, &index)
}

/// The default-order successor of `current_section_id`, skip logic ignored.
pub fn next_in_order(current_section_id: &str, answers: &AnswerSet, survey: &Survey) -> FlowOutcome {
    let sections = ordered(survey);
    let Some(position) = sections
        .iter()
        .position(|section| section.id == current_section_id)
    else {
        return start(answers, survey);
    };
    let index = survey.sections_by_id();
    successor_in_order(&sections, position, answers, &index)
}

fn successor_in_order(
    sections: &[&Section],
    position: usize,
    answers: &AnswerSet,
    index: &SectionIndex<'_>,
) -> FlowOutcome {
    sections[position + 1..]
        .iter()
        .find(|section| section.is_active && visibility::is_visible(section, answers, index))
        .map(|section| FlowOutcome::Section(section.id.clone()))
        .unwrap_or(FlowOutcome::Complete)
}

/// All sections stable-sorted by ascending priority; ties keep document order.
fn ordered(survey: &Survey) -> Vec<&Section> {
    let mut sections: Vec<&Section> = survey.sections.iter().collect();
    sections.sort_by_key(|section| section.priority);
    sections
}
