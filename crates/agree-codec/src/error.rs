use thiserror::Error;

/// Decode failures. All of them are non-fatal: the caller keeps the
/// current record and surfaces a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input was neither a payload URL carrying a `data` parameter nor a
    /// JSON object of the expected shape.
    #[error("malformed payload")]
    MalformedPayload,
}
