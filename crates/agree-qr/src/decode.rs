//! QR decoding from still images and raw camera frames.

use crate::error::QrError;

/// Decode the first QR code found in an encoded image (PNG/JPEG bytes
/// from the upload path).
pub fn decode_image(bytes: &[u8]) -> Result<String, QrError> {
    let gray = image::load_from_memory(bytes)?.to_luma8();
    decode_gray(gray)
}

/// Decode the first QR code found in a raw RGBA frame (canvas pixel data
/// from the camera path).
pub fn decode_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<String, QrError> {
    let pixels = (width as usize).checked_mul(height as usize);
    match pixels {
        Some(n) if rgba.len() == n * 4 => {}
        _ => return Err(QrError::BadFrame),
    }

    let mut luma = Vec::with_capacity(rgba.len() / 4);
    for px in rgba.chunks_exact(4) {
        // ITU-R BT.601 luma weights.
        let y = (299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2])) / 1000;
        luma.push(y as u8);
    }
    let gray = image::GrayImage::from_raw(width, height, luma).ok_or(QrError::BadFrame)?;
    decode_gray(gray)
}

fn decode_gray(gray: image::GrayImage) -> Result<String, QrError> {
    let mut prepared = rqrr::PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();
    let grid = grids.first().ok_or(QrError::NoCodeFound)?;
    let (_meta, content) = grid.decode()?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::render_rgba;

    #[test]
    fn rendered_symbol_round_trips_through_rgba_decode() {
        let text = "http://localhost:3000/?data=%7B%22name1%22%3A%22A%22%7D";
        let (width, height, rgba) = render_rgba(text);
        assert_eq!(decode_rgba(width, height, &rgba).unwrap(), text);
    }

    #[test]
    fn blank_frame_has_no_code() {
        let rgba = vec![255u8; 64 * 64 * 4];
        assert!(matches!(
            decode_rgba(64, 64, &rgba),
            Err(QrError::NoCodeFound)
        ));
    }

    #[test]
    fn mismatched_buffer_is_a_bad_frame() {
        assert!(matches!(
            decode_rgba(64, 64, &[0u8; 16]),
            Err(QrError::BadFrame)
        ));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(QrError::Image(_))
        ));
    }
}
