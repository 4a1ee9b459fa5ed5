//! QR symbol generation.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::error::QrError;

/// Render `text` as an SVG QR symbol.
///
/// Error correction level M and a quiet zone keep the symbol robust
/// enough for camera/photo scanning at the fixed 200px display size.
pub fn encode_svg(text: &str) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .build())
}
