//! Consent document renderer
//!
//! Deterministically maps a complete consent record to a single-page A4
//! PDF: title, fixed disclaimer, generation timestamp, party names, the
//! five checklist results, optional detail items, and two signature
//! lines. The font is fetched by the caller (it is the only network
//! dependency of an export) and embedded here.

pub mod error;
pub mod font;
pub mod layout;
pub mod writer;

use chrono::{NaiveDate, NaiveDateTime};

use agree_core::ConsentRecord;

pub use error::PdfError;
pub use font::EmbeddedFont;
pub use layout::{layout_document, Align, PageOp};

/// Fixed file-name prefix; the rest is the generation date.
const FILE_NAME_PREFIX: &str = "同意確認書";

/// A finished export.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Render the record into a downloadable PDF.
///
/// `now` is the generation instant (not when the form was completed);
/// it appears both on the page and in the file name. The export gate is
/// re-checked here even though the UI already disables the action for
/// ineligible records.
pub fn render(
    record: &ConsentRecord,
    now: NaiveDateTime,
    font_data: Vec<u8>,
) -> Result<RenderedDocument, PdfError> {
    if !record.is_export_eligible() {
        return Err(PdfError::NotExportEligible);
    }

    let ops = layout_document(record, &now);
    let corpus: String = ops
        .iter()
        .filter_map(|op| match op {
            PageOp::Text { text, .. } => Some(text.as_str()),
            PageOp::Rule { .. } => None,
        })
        .collect();

    let font = EmbeddedFont::new(font_data, &corpus)?;
    let bytes = writer::write_pdf(&ops, &font)?;

    Ok(RenderedDocument {
        bytes,
        file_name: file_name(now.date()),
    })
}

/// `同意確認書_<ISO date>.pdf` — the date is the generation date, never
/// user-supplied text.
pub fn file_name(date: NaiveDate) -> String {
    format!("{FILE_NAME_PREFIX}_{}.pdf", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use agree_core::{Answer, Party, QuestionId};
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn file_name_embeds_generation_date() {
        assert_eq!(
            file_name(NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()),
            "同意確認書_2026-08-30.pdf"
        );
    }

    #[test]
    fn ineligible_record_is_refused_before_the_font_is_touched() {
        // Guard runs first: garbage font bytes must not turn this into a
        // font error.
        let err = render(&ConsentRecord::new(), now(), b"junk".to_vec()).unwrap_err();
        assert!(matches!(err, PdfError::NotExportEligible));
    }

    #[test]
    fn bad_font_bytes_abort_an_eligible_export() {
        let mut record = ConsentRecord::new()
            .set_name(Party::One, "A")
            .set_name(Party::Two, "B");
        for id in QuestionId::ALL {
            record = record.set_answer(id, Answer::No);
        }
        let err = render(&record, now(), b"junk".to_vec()).unwrap_err();
        assert!(matches!(err, PdfError::FontLoad));
    }
}
