//! Core consent-record model
//!
//! This crate holds the form state shared by every surface of the app:
//! party names, answers to the fixed consent checklist, and user-added
//! detail items. All mutators are pure (old record in, new record out);
//! the owning UI layer holds the current value and re-renders on change.

pub mod error;
pub mod questions;
pub mod record;

pub use error::RecordError;
pub use questions::{ChecklistQuestion, QuestionId, CONSENT_QUESTIONS};
pub use record::{Answer, ConsentRecord, DetailItem, Party};
