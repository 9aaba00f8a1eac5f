use crate::answers::AnswerSet;
use crate::condition;
use crate::model::Section;

/// Determines the non-default successor a completed section jumps to.
///
/// `None` means "use the default linear order": skip logic absent, disabled,
/// empty, or no rule matched. Rules are consulted in array order and the
/// first match wins; later rules are never evaluated once one matches.
pub fn next_section_id<'a>(section: &'a Section, answers: &AnswerSet) -> Option<&'a str> {
    let logic = section.skip_logic.as_ref()?;
    if !logic.enabled {
        return None;
    }
    logic
        .rules
        .iter()
        .find(|rule| condition::evaluate(answers.answer(&rule.question_id), rule.condition, &rule.value))
        .map(|rule| rule.skip_to_section_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerValue;
    use crate::model::{ConditionKind, SkipLogic, SkipRule};

    fn section_with_rules(enabled: bool, rules: Vec<SkipRule>) -> Section {
        Section {
            id: "a".into(),
            name: "A".into(),
            description: None,
            priority: 1,
            is_active: true,
            is_required: false,
            question_ids: vec!["q1".into()],
            visibility_condition: None,
            skip_logic: Some(SkipLogic { enabled, rules }),
        }
    }

    fn rule(question: &str, target: &str) -> SkipRule {
        SkipRule {
            question_id: question.into(),
            condition: ConditionKind::Equals,
            value: AnswerValue::from("yes"),
            skip_to_section_id: target.into(),
        }
    }

    #[test]
    fn disabled_logic_falls_through() {
        let section = section_with_rules(false, vec![rule("q1", "d")]);
        let mut answers = AnswerSet::new("s", "1");
        answers.record("q1", AnswerValue::from("yes"));
        assert_eq!(next_section_id(&section, &answers), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        let section = section_with_rules(true, vec![rule("q1", "d"), rule("q1", "e")]);
        let mut answers = AnswerSet::new("s", "1");
        answers.record("q1", AnswerValue::from("yes"));
        assert_eq!(next_section_id(&section, &answers), Some("d"));
    }

    #[test]
    fn no_match_returns_none() {
        let section = section_with_rules(true, vec![rule("q1", "d")]);
        let mut answers = AnswerSet::new("s", "1");
        answers.record("q1", AnswerValue::from("no"));
        assert_eq!(next_section_id(&section, &answers), None);
    }

    #[test]
    fn numeric_rule_matches_coerced_answer() {
        let section = section_with_rules(
            true,
            vec![SkipRule {
                question_id: "q2".into(),
                condition: ConditionKind::GreaterThan,
                value: AnswerValue::Number(5.0),
                skip_to_section_id: "d".into(),
            }],
        );
        let mut answers = AnswerSet::new("s", "1");
        answers.record("q2", AnswerValue::Number(10.0));
        assert_eq!(next_section_id(&section, &answers), Some("d"));
    }
}
