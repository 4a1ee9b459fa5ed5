//! QR sharing subsystem
//!
//! Encoding of the payload URL into an SVG symbol, decoding from still
//! images and raw camera frames, and a cancellable scan task the browser
//! shell drives from its animation-frame loop.

pub mod decode;
pub mod encode;
pub mod error;
pub mod scan;

pub use decode::{decode_image, decode_rgba};
pub use encode::encode_svg;
pub use error::{CaptureError, QrError};
pub use scan::{Frame, FrameSource, ScanHandle, ScanPoll, ScanTask};
