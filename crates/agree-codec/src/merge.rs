//! Merge-on-decode policy.
//!
//! Policy: keep existing on empty. Each sharable field of the current
//! record is replaced only when the decoded value actually carries data,
//! so a half-filled inbound payload can never blank out locally entered
//! values. Checklist answers are not part of the payload and are never
//! touched here.

use agree_core::ConsentRecord;

use crate::payload::SharedPayload;

/// Apply a decoded payload to the current record.
pub fn apply_payload(record: ConsentRecord, payload: &SharedPayload) -> ConsentRecord {
    let mut record = record;
    if !payload.name1.trim().is_empty() {
        record.name1 = payload.name1.clone();
    }
    if !payload.name2.trim().is_empty() {
        record.name2 = payload.name2.clone();
    }
    if !payload.detail_items.is_empty() {
        record.detail_items = payload.detail_items.clone();
    }
    record
}
