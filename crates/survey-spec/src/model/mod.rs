pub mod question;
pub mod section;
pub mod survey;

pub use question::{Question, QuestionVersion, ResponseOptions, ResponseType};
pub use section::{ConditionKind, Section, SkipLogic, SkipRule, VisibilityCondition};
pub use survey::{SectionIndex, Survey};
