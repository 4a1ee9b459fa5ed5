//! The sharable payload and its text forms.

use agree_core::{ConsentRecord, DetailItem};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DecodeError;

/// Base URL the payload is embedded into when no deployment origin is
/// known (the web app substitutes its own origin).
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Exactly the fields that may leave the device: names and detail items.
///
/// Checklist answers have no representation here, so no code path can
/// leak them into a QR code or URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharedPayload {
    pub name1: String,
    pub name2: String,
    pub detail_items: Vec<DetailItem>,
}

impl SharedPayload {
    /// Project the sharable subset out of a record.
    pub fn from_record(record: &ConsentRecord) -> Self {
        Self {
            name1: record.name1.clone(),
            name2: record.name2.clone(),
            detail_items: record.detail_items.clone(),
        }
    }
}

/// Canonical JSON text of the payload. Key order follows the struct
/// declaration and is stable across runs.
pub fn encode_json(payload: &SharedPayload) -> serde_json::Result<String> {
    serde_json::to_string(payload)
}

/// Embed the payload as the single `data` query parameter on `base`.
/// The resulting URL string is what goes into the QR symbol and what the
/// app accepts back on load.
pub fn encode_url(payload: &SharedPayload, base: &Url) -> serde_json::Result<Url> {
    let json = encode_json(payload)?;
    let mut url = base.clone();
    url.query_pairs_mut().clear().append_pair("data", &json);
    Ok(url)
}

/// Decode inbound text into a typed payload.
///
/// Accepts either the canonical URL form (anything with a `data` query
/// parameter) or a raw JSON object. Absent keys take their defaults;
/// unknown keys are ignored; anything else is `MalformedPayload` and the
/// caller keeps its current record.
pub fn decode(text: &str) -> Result<SharedPayload, DecodeError> {
    let json = match extract_data_param(text) {
        Some(data) => data,
        None => text.to_string(),
    };
    serde_json::from_str(&json).map_err(|err| {
        tracing::warn!(%err, "rejected inbound payload");
        DecodeError::MalformedPayload
    })
}

/// Pull the `data` parameter out of a payload URL, if the text is one.
fn extract_data_param(text: &str) -> Option<String> {
    let url = Url::parse(text).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "data")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use agree_core::{Answer, Party, QuestionId};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_payload() -> SharedPayload {
        SharedPayload {
            name1: "れん".to_string(),
            name2: "あおい".to_string(),
            detail_items: vec![
                DetailItem {
                    question: "避妊具を着用する".to_string(),
                    answer: Some(Answer::Yes),
                },
                DetailItem {
                    question: "挿入する".to_string(),
                    answer: None,
                },
            ],
        }
    }

    #[test]
    fn url_round_trip_reproduces_payload() {
        let payload = sample_payload();
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let url = encode_url(&payload, &base).unwrap();
        assert_eq!(decode(url.as_str()).unwrap(), payload);
    }

    #[test]
    fn raw_json_and_url_form_decode_identically() {
        let payload = sample_payload();
        let json = encode_json(&payload).unwrap();
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let url = encode_url(&payload, &base).unwrap();
        assert_eq!(decode(&json).unwrap(), decode(url.as_str()).unwrap());
    }

    #[test]
    fn encode_never_includes_checklist_answers() {
        // Even a record with every checklist answer populated must not
        // leak them into the payload.
        let mut record = ConsentRecord::new()
            .set_name(Party::One, "A")
            .set_name(Party::Two, "B");
        for id in QuestionId::ALL {
            record = record.set_answer(id, Answer::No);
        }
        let json = encode_json(&SharedPayload::from_record(&record)).unwrap();

        assert!(json.starts_with(r#"{"name1":"#));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["detailItems", "name1", "name2"]);
    }

    #[test]
    fn non_json_text_is_malformed() {
        assert_eq!(decode("not json"), Err(DecodeError::MalformedPayload));
    }

    #[test]
    fn url_without_data_param_is_malformed() {
        assert_eq!(
            decode("http://localhost:3000/?other=1"),
            Err(DecodeError::MalformedPayload)
        );
    }

    #[test]
    fn absent_keys_take_defaults() {
        assert_eq!(decode("{}").unwrap(), SharedPayload::default());

        let payload = decode(r#"{"name1":"A"}"#).unwrap();
        assert_eq!(payload.name1, "A");
        assert_eq!(payload.name2, "");
        assert!(payload.detail_items.is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let payload = decode(r#"{"name1":"A","answers":{"freeWill":"no"},"v":2}"#).unwrap();
        assert_eq!(payload.name1, "A");
    }

    #[test]
    fn out_of_range_detail_answer_is_malformed() {
        let text = r#"{"detailItems":[{"question":"q","answer":"maybe"}]}"#;
        assert_eq!(decode(text), Err(DecodeError::MalformedPayload));
    }

    #[test]
    fn null_detail_answer_decodes_as_unanswered() {
        let text = r#"{"detailItems":[{"question":"q","answer":null}]}"#;
        let payload = decode(text).unwrap();
        assert_eq!(payload.detail_items[0].answer, None);
    }
}
