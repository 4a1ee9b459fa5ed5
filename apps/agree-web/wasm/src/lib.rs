//! Agree — client-side consent confirmation (browser shell)
//!
//! Owns the single in-memory [`ConsentRecord`] and exposes it to the JS
//! view layer. No business logic lives here: mutations go through
//! `agree-core`, sharing through `agree-codec`/`agree-qr`, export
//! through `agree-pdf`. Every failing operation leaves the record
//! exactly as it was.

use wasm_bindgen::prelude::*;

pub mod download;
pub mod fonts;
pub mod scanner;

use agree_codec::{apply_payload, decode, encode_url, SharedPayload, DEFAULT_BASE_URL};
use agree_core::{Answer, ConsentRecord, Party};
use url::Url;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

fn parse_party(party: u32) -> Result<Party, String> {
    match party {
        1 => Ok(Party::One),
        2 => Ok(Party::Two),
        other => Err(format!("invalid party: {other}")),
    }
}

fn parse_answer(value: &str) -> Result<Answer, String> {
    match value {
        "yes" => Ok(Answer::Yes),
        "no" => Ok(Answer::No),
        other => Err(format!("invalid answer: {other}")),
    }
}

fn js_err(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Share-link base: the page's own origin, falling back to the fixed
/// default outside a browser context.
fn base_url() -> Result<Url, String> {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    let text = origin.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    Url::parse(&text)
        .or_else(|_| Url::parse(DEFAULT_BASE_URL))
        .map_err(|err| err.to_string())
}

/// The application state: one record, plus the edit lock that marks a
/// record loaded from an inbound QR/URL payload.
#[wasm_bindgen]
pub struct ConsentApp {
    record: ConsentRecord,
    locked: bool,
}

impl Default for ConsentApp {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ConsentApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            record: ConsentRecord::seeded(),
            locked: false,
        }
    }

    // ---- mutations ------------------------------------------------

    pub fn set_name(&mut self, party: u32, value: &str) -> Result<(), JsValue> {
        let party = parse_party(party).map_err(js_err)?;
        self.record = self.record.clone().set_name(party, value);
        Ok(())
    }

    pub fn set_answer(&mut self, question_id: &str, value: &str) -> Result<(), JsValue> {
        let answer = parse_answer(value).map_err(js_err)?;
        self.record = self
            .record
            .clone()
            .set_answer_by_id(question_id, answer)
            .map_err(js_err)?;
        Ok(())
    }

    pub fn add_detail_item(&mut self, question: &str) {
        self.record = self.record.clone().add_detail_item(question);
    }

    pub fn remove_detail_item(&mut self, index: usize) -> Result<(), JsValue> {
        self.record = self
            .record
            .clone()
            .remove_detail_item(index)
            .map_err(js_err)?;
        Ok(())
    }

    pub fn set_detail_item_answer(&mut self, index: usize, value: &str) -> Result<(), JsValue> {
        let answer = parse_answer(value).map_err(js_err)?;
        self.record = self
            .record
            .clone()
            .set_detail_item_answer(index, answer)
            .map_err(js_err)?;
        Ok(())
    }

    /// Discard everything and return to the seeded session-start state.
    pub fn reset(&mut self) {
        self.record = ConsentRecord::seeded();
        self.locked = false;
    }

    // ---- queries --------------------------------------------------

    pub fn is_export_eligible(&self) -> bool {
        self.record.is_export_eligible()
    }

    pub fn has_shareable_data(&self) -> bool {
        self.record.has_shareable_data()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// JSON snapshot of the record for the view layer.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.record).map_err(js_err)
    }

    // ---- sharing --------------------------------------------------

    /// The share URL carrying the sharable subset as its `data`
    /// parameter.
    pub fn share_url(&self) -> Result<String, JsValue> {
        let base = base_url().map_err(js_err)?;
        let payload = SharedPayload::from_record(&self.record);
        let url = encode_url(&payload, &base).map_err(js_err)?;
        Ok(url.into())
    }

    /// SVG QR symbol of the share URL, or `None` while there is nothing
    /// to share.
    pub fn qr_svg(&self) -> Result<Option<String>, JsValue> {
        if !self.record.has_shareable_data() {
            return Ok(None);
        }
        let url = self.share_url()?;
        agree_qr::encode_svg(&url).map(Some).map_err(js_err)
    }

    /// Load an inbound `data` payload (full URL or raw parameter value)
    /// and lock editing, as when the page is opened from a scanned link.
    /// A malformed payload is an error and leaves the record untouched.
    pub fn load_inbound(&mut self, text: &str) -> Result<(), JsValue> {
        let payload = decode(text).map_err(js_err)?;
        self.record = apply_payload(self.record.clone(), &payload);
        self.locked = true;
        Ok(())
    }

    /// Apply text decoded from a scanned QR symbol.
    pub fn apply_scanned(&mut self, text: &str) -> Result<(), JsValue> {
        let payload = decode(text).map_err(js_err)?;
        self.record = apply_payload(self.record.clone(), &payload);
        Ok(())
    }

    /// Decode an uploaded still image and apply its payload.
    pub fn apply_scanned_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let text = agree_qr::decode_image(bytes)
            .map_err(|err| js_err(format!("DecodeFailure: {err}")))?;
        self.apply_scanned(&text)
    }

    // ---- export ---------------------------------------------------

    /// Render and download the PDF using an already-fetched font (see
    /// [`fonts::fetch_export_font`]; the two-step split keeps the fetch
    /// awaitable from JS while the export control stays disabled).
    pub fn export_pdf_with_font(&self, font_data: &[u8]) -> Result<(), JsValue> {
        let now = chrono::Local::now().naive_local();
        let doc = agree_pdf::render(&self.record, now, font_data.to_vec()).map_err(js_err)?;
        download::save_bytes(&doc.bytes, &doc.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_numbers_map_to_name_fields() {
        assert_eq!(parse_party(1), Ok(Party::One));
        assert_eq!(parse_party(2), Ok(Party::Two));
        assert!(parse_party(0).is_err());
        assert!(parse_party(3).is_err());
    }

    #[test]
    fn only_wire_form_answers_parse() {
        assert_eq!(parse_answer("yes"), Ok(Answer::Yes));
        assert_eq!(parse_answer("no"), Ok(Answer::No));
        assert!(parse_answer("maybe").is_err());
        assert!(parse_answer("NO").is_err());
    }
}
