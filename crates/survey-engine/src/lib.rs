#![allow(missing_docs)]

pub mod session;
pub mod store;

pub use session::{SessionProgress, SessionState, SurveySession};
pub use store::{MemoryStore, StoreError, SurveyStore};
