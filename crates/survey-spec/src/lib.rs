#![allow(missing_docs)]

pub mod answers;
pub mod condition;
pub mod flow;
pub mod model;
pub mod render;
pub mod schema;
pub mod skip;
pub mod validate;
pub mod version;
pub mod visibility;

pub use answers::{AnswerSet, AnswerValue, Meta};
pub use condition::evaluate;
pub use flow::{FlowOutcome, next, next_in_order, start};
pub use model::{
    ConditionKind, Question, QuestionVersion, ResponseOptions, ResponseType, Section, SectionIndex,
    SkipLogic, SkipRule, Survey, VisibilityCondition,
};
pub use render::{
    QuestionView, RenderProgress, RenderStatus, SectionPayload, SectionView,
    build_section_payload, render_json, render_text,
};
pub use schema::answers_schema;
pub use validate::{
    ValidationError, ValidationResult, lint_survey, validate_answers, validate_section,
};
pub use version::resolve;
pub use visibility::{VisibilityMap, is_visible, resolve_visibility};
