use thiserror::Error;

/// Errors raised by record mutations at the dynamic boundary.
///
/// Every rejected mutation leaves the record exactly as it was; there is
/// no partial update to roll back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The id is not one of the five fixed checklist question ids.
    #[error("unknown checklist question id: {0}")]
    InvalidQuestionId(String),

    /// A detail-item index pointed outside the current list.
    #[error("detail item index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
