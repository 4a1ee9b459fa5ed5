//! Export font acquisition.
//!
//! The PDF embeds Noto Sans JP for Japanese text; fetching it is the
//! only network dependency of an export. One request per export, no
//! retry; the UI keeps the export control disabled while a request is
//! in flight.

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Noto Sans JP Regular TTF, served by Google Fonts.
pub const NOTO_SANS_JP_URL: &str =
    "https://fonts.gstatic.com/s/notosansjp/v53/-F6jfjtqLzI2JPCgQBnw7HFyzSD-AsregP8VFBEj75s.ttf";

/// Fetch the export font. Any failure aborts the export before
/// rendering starts; no partial file is ever produced.
#[wasm_bindgen]
pub async fn fetch_export_font() -> Result<Uint8Array, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(NOTO_SANS_JP_URL, &opts)?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| font_load_failure())?;
    let response: Response = response.dyn_into().map_err(|_| font_load_failure())?;
    if !response.ok() {
        return Err(font_load_failure());
    }

    let buffer = JsFuture::from(response.array_buffer()?)
        .await
        .map_err(|_| font_load_failure())?;
    Ok(Uint8Array::new(&buffer))
}

fn font_load_failure() -> JsValue {
    JsValue::from_str("FontLoadFailure: could not fetch the export font")
}
