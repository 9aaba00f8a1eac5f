use crate::answers::AnswerValue;
use crate::model::ConditionKind;

/// Evaluates one comparison between a stored answer and an authored target.
///
/// Total over every combination of answer shape and condition kind. An
/// unanswered dependency satisfies only `notEquals`; failed numeric coercion
/// evaluates to `false` rather than erroring.
pub fn evaluate(answer: Option<&AnswerValue>, condition: ConditionKind, target: &AnswerValue) -> bool {
    let Some(answer) = answer else {
        return matches!(condition, ConditionKind::NotEquals);
    };

    match condition {
        ConditionKind::Equals => matches_target(answer, target),
        ConditionKind::NotEquals => !matches_target(answer, target),
        ConditionKind::Contains => match answer {
            AnswerValue::Many(items) => {
                let target = target.normalized();
                items.iter().any(|item| item.normalized() == target)
            }
            scalar => scalar.normalized().contains(&target.normalized()),
        },
        ConditionKind::GreaterThan => compare(answer, target, |left, right| left > right),
        ConditionKind::LessThan => compare(answer, target, |left, right| left < right),
    }
}

/// Scalar answers compare by normalized text; list answers by membership.
fn matches_target(answer: &AnswerValue, target: &AnswerValue) -> bool {
    match answer {
        AnswerValue::Many(items) => {
            let target = target.normalized();
            items.iter().any(|item| item.normalized() == target)
        }
        scalar => scalar.normalized() == target.normalized(),
    }
}

fn compare(answer: &AnswerValue, target: &AnswerValue, ordered: fn(f64, f64) -> bool) -> bool {
    match (answer.as_number(), target.as_number()) {
        (Some(left), Some(right)) => ordered(left, right),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AnswerValue {
        AnswerValue::Text(value.into())
    }

    #[test]
    fn equals_is_string_normalized() {
        assert!(evaluate(Some(&text("yes")), ConditionKind::Equals, &text("yes")));
        assert!(!evaluate(Some(&text("Yes")), ConditionKind::Equals, &text("yes")));
        assert!(evaluate(
            Some(&AnswerValue::Number(5.0)),
            ConditionKind::Equals,
            &text("5")
        ));
        assert!(evaluate(
            Some(&AnswerValue::Bool(true)),
            ConditionKind::Equals,
            &text("true")
        ));
    }

    #[test]
    fn equals_on_list_answer_is_membership() {
        let answer = AnswerValue::Many(vec![text("a"), text("b")]);
        assert!(evaluate(Some(&answer), ConditionKind::Equals, &text("b")));
        assert!(!evaluate(Some(&answer), ConditionKind::Equals, &text("c")));
        assert!(!evaluate(Some(&answer), ConditionKind::NotEquals, &text("b")));
    }

    #[test]
    fn contains_is_substring_for_scalars_membership_for_lists() {
        assert!(evaluate(Some(&text("abcdef")), ConditionKind::Contains, &text("cde")));
        assert!(!evaluate(Some(&text("abc")), ConditionKind::Contains, &text("xyz")));
        let answer = AnswerValue::Many(vec![text("red"), text("green")]);
        assert!(evaluate(Some(&answer), ConditionKind::Contains, &text("green")));
        assert!(!evaluate(Some(&answer), ConditionKind::Contains, &text("gre")));
    }

    #[test]
    fn ordered_comparisons_coerce_numerically() {
        assert!(evaluate(
            Some(&text("10")),
            ConditionKind::GreaterThan,
            &AnswerValue::Number(5.0)
        ));
        assert!(evaluate(
            Some(&AnswerValue::Number(3.0)),
            ConditionKind::LessThan,
            &text("4")
        ));
    }

    #[test]
    fn failed_coercion_evaluates_false() {
        assert!(!evaluate(
            Some(&text("abc")),
            ConditionKind::GreaterThan,
            &AnswerValue::Number(5.0)
        ));
        assert!(!evaluate(
            Some(&AnswerValue::Number(5.0)),
            ConditionKind::LessThan,
            &text("abc")
        ));
    }

    #[test]
    fn unanswered_satisfies_only_not_equals() {
        let target = text("yes");
        assert!(!evaluate(None, ConditionKind::Equals, &target));
        assert!(!evaluate(None, ConditionKind::Contains, &target));
        assert!(!evaluate(None, ConditionKind::GreaterThan, &target));
        assert!(!evaluate(None, ConditionKind::LessThan, &target));
        assert!(evaluate(None, ConditionKind::NotEquals, &target));
    }

    #[test]
    fn never_panics_across_shape_and_kind_grid() {
        let answers = [
            None,
            Some(AnswerValue::Bool(true)),
            Some(AnswerValue::Number(1.5)),
            Some(text("sample")),
            Some(AnswerValue::Many(vec![text("a"), AnswerValue::Number(2.0)])),
        ];
        let kinds = [
            ConditionKind::Equals,
            ConditionKind::NotEquals,
            ConditionKind::Contains,
            ConditionKind::GreaterThan,
            ConditionKind::LessThan,
        ];
        for answer in &answers {
            for kind in kinds {
                let _ = evaluate(answer.as_ref(), kind, &text("x"));
                let _ = evaluate(answer.as_ref(), kind, &AnswerValue::Number(0.0));
            }
        }
    }
}
