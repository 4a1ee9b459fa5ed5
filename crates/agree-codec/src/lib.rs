//! Payload codec for QR / URL sharing
//!
//! Serializes the *sharable* subset of a consent record (names and detail
//! items, never checklist answers) into the `data` query parameter of a
//! fixed base URL, and turns inbound text back into a typed payload.
//!
//! The exclusion of checklist answers is a privacy boundary, not an
//! oversight: consent answers are only ever captured locally and only
//! used for local PDF export.

pub mod error;
pub mod merge;
pub mod payload;

pub use error::DecodeError;
pub use merge::apply_payload;
pub use payload::{decode, encode_json, encode_url, SharedPayload, DEFAULT_BASE_URL};
