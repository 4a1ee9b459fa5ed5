use thiserror::Error;

/// Rendering failures. None of them produce a partial file: the caller
/// gets either a complete document or an error.
#[derive(Debug, Error)]
pub enum PdfError {
    /// Export requested for a record that fails the completeness rule.
    /// The UI disables the export action; this is the defense-in-depth
    /// re-check inside the renderer.
    #[error("record is not export-eligible")]
    NotExportEligible,

    /// The fetched font bytes could not be parsed as a TrueType font.
    #[error("font data could not be parsed")]
    FontLoad,

    #[error("failed to assemble PDF: {0}")]
    Write(#[from] lopdf::Error),
}
