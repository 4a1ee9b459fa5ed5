//! PDF assembly with lopdf.
//!
//! Takes the layout op list plus the embedded font and produces the
//! final single-page A4 document.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use crate::error::PdfError;
use crate::font::{build_to_unicode_cmap, EmbeddedFont};
use crate::layout::{Align, PageOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const MM_TO_PT: f64 = 72.0 / 25.4;
/// Hairline weight matching the on-screen signature rules.
const RULE_WIDTH_PT: f64 = 0.57;

pub(crate) fn mm_to_pt(mm: f64) -> f64 {
    mm * MM_TO_PT
}

/// Convert a top-down mm y coordinate to the PDF's bottom-up point axis.
pub(crate) fn y_to_pt(y_mm: f64) -> f64 {
    (PAGE_HEIGHT_MM - y_mm) * MM_TO_PT
}

pub fn write_pdf(ops: &[PageOp], font: &EmbeddedFont) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = embed_font(&mut doc, font);
    let content_id = {
        let content = build_content(ops, font);
        let encoded = content.encode()?;
        doc.add_object(Stream::new(Dictionary::new(), encoded))
    };

    let mut resources = Dictionary::new();
    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(mm_to_pt(PAGE_WIDTH_MM) as f32),
            Object::Real(mm_to_pt(PAGE_HEIGHT_MM) as f32),
        ]),
    );
    page.set("Contents", Object::Reference(content_id));
    page.set("Resources", Object::Dictionary(resources));
    let page_id = doc.add_object(Object::Dictionary(page));

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

/// Build the Type0 / CIDFontType2 object graph for the embedded font.
fn embed_font(doc: &mut Document, font: &EmbeddedFont) -> lopdf::ObjectId {
    let data = font.data().to_vec();
    let mut file_dict = Dictionary::new();
    file_dict.set("Length1", Object::Integer(data.len() as i64));
    let font_file_id = doc.add_object(Stream::new(file_dict, data));

    let metrics = font.metrics();
    let mut descriptor = Dictionary::new();
    descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
    descriptor.set("FontName", Object::Name(b"NotoSansJP-Regular".to_vec()));
    // Flags: bit 3 (symbolic), required for a CID font without a
    // standard Latin charset.
    descriptor.set("Flags", Object::Integer(4));
    descriptor.set(
        "FontBBox",
        Object::Array(metrics.bbox.iter().map(|&v| Object::Integer(v)).collect()),
    );
    descriptor.set("ItalicAngle", Object::Integer(0));
    descriptor.set("Ascent", Object::Integer(metrics.ascent));
    descriptor.set("Descent", Object::Integer(metrics.descent));
    descriptor.set("CapHeight", Object::Integer(metrics.cap_height));
    descriptor.set("StemV", Object::Integer(80));
    descriptor.set("FontFile2", Object::Reference(font_file_id));
    let descriptor_id = doc.add_object(Object::Dictionary(descriptor));

    let glyph_table = font.glyph_table();
    let mut widths = Vec::with_capacity(glyph_table.len() * 2);
    for &(gid, width, _) in &glyph_table {
        widths.push(Object::Integer(i64::from(gid)));
        widths.push(Object::Array(vec![Object::Integer(width)]));
    }

    let mut system_info = Dictionary::new();
    system_info.set(
        "Registry",
        Object::String(b"Adobe".to_vec(), StringFormat::Literal),
    );
    system_info.set(
        "Ordering",
        Object::String(b"Identity".to_vec(), StringFormat::Literal),
    );
    system_info.set("Supplement", Object::Integer(0));

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", Object::Name(b"Font".to_vec()));
    cid_font.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
    cid_font.set("BaseFont", Object::Name(b"NotoSansJP-Regular".to_vec()));
    cid_font.set("CIDSystemInfo", Object::Dictionary(system_info));
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("DW", Object::Integer(1000));
    cid_font.set("W", Object::Array(widths));
    cid_font.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
    let cid_font_id = doc.add_object(Object::Dictionary(cid_font));

    let pairs: Vec<(u16, char)> = glyph_table.iter().map(|&(gid, _, ch)| (gid, ch)).collect();
    let cmap = build_to_unicode_cmap(&pairs);
    let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), cmap.into_bytes()));

    let mut type0 = Dictionary::new();
    type0.set("Type", Object::Name(b"Font".to_vec()));
    type0.set("Subtype", Object::Name(b"Type0".to_vec()));
    type0.set("BaseFont", Object::Name(b"NotoSansJP-Regular".to_vec()));
    type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
    type0.set(
        "DescendantFonts",
        Object::Array(vec![Object::Reference(cid_font_id)]),
    );
    type0.set("ToUnicode", Object::Reference(to_unicode_id));
    doc.add_object(Object::Dictionary(type0))
}

fn build_content(ops: &[PageOp], font: &EmbeddedFont) -> Content {
    let mut operations = Vec::new();

    for op in ops {
        match op {
            PageOp::Text {
                text,
                x_mm,
                y_mm,
                size_pt,
                align,
                gray,
            } => {
                let mut x_pt = mm_to_pt(*x_mm);
                if *align == Align::Center {
                    x_pt -= font.text_width(text, *size_pt) / 2.0;
                }
                let y_pt = y_to_pt(*y_mm);

                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Real(*size_pt as f32)],
                ));
                operations.push(Operation::new("g", vec![Object::Real(*gray as f32)]));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(x_pt as f32), Object::Real(y_pt as f32)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        font.encode_text(text),
                        StringFormat::Hexadecimal,
                    )],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            PageOp::Rule { x1_mm, x2_mm, y_mm } => {
                let y_pt = y_to_pt(*y_mm);
                operations.push(Operation::new(
                    "w",
                    vec![Object::Real(RULE_WIDTH_PT as f32)],
                ));
                operations.push(Operation::new(
                    "m",
                    vec![
                        Object::Real(mm_to_pt(*x1_mm) as f32),
                        Object::Real(y_pt as f32),
                    ],
                ));
                operations.push(Operation::new(
                    "l",
                    vec![
                        Object::Real(mm_to_pt(*x2_mm) as f32),
                        Object::Real(y_pt as f32),
                    ],
                ));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }

    Content { operations }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimeters_convert_to_points() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-9);
        assert!((mm_to_pt(210.0) - 595.275_59).abs() < 1e-3);
    }

    #[test]
    fn y_axis_is_flipped() {
        // Top of the page in mm space is the top of the point space.
        assert!((y_to_pt(0.0) - mm_to_pt(297.0)).abs() < 1e-9);
        assert!(y_to_pt(297.0).abs() < 1e-9);
    }
}
