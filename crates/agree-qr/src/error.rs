use thiserror::Error;

/// QR encode/decode failures. Decode failures are surfaced to the user
/// and leave form state unchanged.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to build QR symbol: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("could not read image: {0}")]
    Image(#[from] image::ImageError),

    /// The image was readable but contained no QR code.
    #[error("no QR code found in image")]
    NoCodeFound,

    /// A code was located but its contents could not be decoded.
    #[error("QR code could not be decoded: {0}")]
    Decode(#[from] rqrr::DeQRError),

    /// Frame buffer length did not match the stated dimensions.
    #[error("frame buffer size does not match dimensions")]
    BadFrame,
}

/// Capture-device failures, reported once per operation with no retry
/// loop; the image-upload path remains available as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("capture device unavailable or access denied")]
    Unavailable,
}
