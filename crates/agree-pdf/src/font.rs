//! Embedded TrueType font handling.
//!
//! The document embeds the fetched Noto Sans JP font as a CIDFontType2
//! with Identity-H encoding, so text is written as big-endian glyph ids.
//! The font is parsed once up front against the full text corpus of the
//! page; everything the writer needs (glyph ids, advances, descriptor
//! metrics) is extracted into owned data.

use std::collections::BTreeMap;

use ttf_parser::{Face, GlyphId};

use crate::error::PdfError;

#[derive(Debug, Clone, Copy)]
struct GlyphInfo {
    id: u16,
    /// Horizontal advance in font units.
    advance: u16,
}

/// Descriptor metrics, already scaled to the 1000-unit PDF glyph space.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    pub bbox: [i64; 4],
}

#[derive(Debug)]
pub struct EmbeddedFont {
    data: Vec<u8>,
    units_per_em: u16,
    metrics: FontMetrics,
    glyphs: BTreeMap<char, GlyphInfo>,
}

impl EmbeddedFont {
    /// Parse `data` and map every character of `corpus`. Characters the
    /// font does not cover map to the .notdef glyph.
    pub fn new(data: Vec<u8>, corpus: &str) -> Result<Self, PdfError> {
        let face = Face::parse(&data, 0).map_err(|_| PdfError::FontLoad)?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(PdfError::FontLoad);
        }

        let scale = |v: f64| (v * 1000.0 / f64::from(units_per_em)).round() as i64;
        let bbox = face.global_bounding_box();
        let metrics = FontMetrics {
            ascent: scale(f64::from(face.ascender())),
            descent: scale(f64::from(face.descender())),
            cap_height: scale(f64::from(face.capital_height().unwrap_or(face.ascender()))),
            bbox: [
                scale(f64::from(bbox.x_min)),
                scale(f64::from(bbox.y_min)),
                scale(f64::from(bbox.x_max)),
                scale(f64::from(bbox.y_max)),
            ],
        };

        let mut glyphs = BTreeMap::new();
        for ch in corpus.chars() {
            if glyphs.contains_key(&ch) {
                continue;
            }
            let id = face.glyph_index(ch).unwrap_or(GlyphId(0));
            let advance = face.glyph_hor_advance(id).unwrap_or(units_per_em / 2);
            glyphs.insert(
                ch,
                GlyphInfo {
                    id: id.0,
                    advance,
                },
            );
        }

        Ok(Self {
            data,
            units_per_em,
            metrics,
            glyphs,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph(&self, ch: char) -> GlyphInfo {
        // Corpus-driven construction makes misses impossible for layout
        // text; anything else falls back to .notdef.
        self.glyphs
            .get(&ch)
            .copied()
            .unwrap_or(GlyphInfo { id: 0, advance: 0 })
    }

    /// Identity-H string: two big-endian bytes per glyph.
    pub fn encode_text(&self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.chars().count() * 2);
        for ch in text.chars() {
            bytes.extend_from_slice(&self.glyph(ch).id.to_be_bytes());
        }
        bytes
    }

    /// Width of `text` at `size_pt`, in points. Used for centering.
    pub fn text_width(&self, text: &str, size_pt: f64) -> f64 {
        let units: u64 = text
            .chars()
            .map(|ch| u64::from(self.glyph(ch).advance))
            .sum();
        units as f64 * size_pt / f64::from(self.units_per_em)
    }

    /// `(glyph id, width in 1000-unit space, character)` for every mapped
    /// glyph, ordered by glyph id. Feeds the W array and the ToUnicode
    /// CMap.
    pub fn glyph_table(&self) -> Vec<(u16, i64, char)> {
        let mut table: Vec<_> = self
            .glyphs
            .iter()
            .map(|(&ch, info)| {
                let width = (f64::from(info.advance) * 1000.0 / f64::from(self.units_per_em))
                    .round() as i64;
                (info.id, width, ch)
            })
            .collect();
        table.sort_by_key(|&(id, _, _)| id);
        table.dedup_by_key(|&mut (id, _, _)| id);
        table
    }
}

/// ToUnicode CMap text for the given `(glyph id, char)` pairs, so text
/// extraction and copy/paste recover the original characters.
pub fn build_to_unicode_cmap(pairs: &[(u16, char)]) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    // bfchar blocks are limited to 100 entries apiece.
    for chunk in pairs.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for &(gid, ch) in chunk {
            let mut utf16 = [0u16; 2];
            let units = ch.encode_utf16(&mut utf16);
            let target: String = units.iter().map(|u| format!("{u:04X}")).collect();
            cmap.push_str(&format!("<{gid:04X}> <{target}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_font_load_error() {
        let err = EmbeddedFont::new(b"not a font".to_vec(), "abc").unwrap_err();
        assert!(matches!(err, PdfError::FontLoad));
    }

    #[test]
    fn cmap_maps_glyphs_to_utf16() {
        let cmap = build_to_unicode_cmap(&[(0x0041, 'あ'), (0x0042, 'A')]);
        assert!(cmap.contains("<0041> <3042>"));
        assert!(cmap.contains("<0042> <0041>"));
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.ends_with("end\nend\n"));
    }

    #[test]
    fn cmap_chunks_large_corpora() {
        let pairs: Vec<_> = (0..250u16).map(|i| (i, 'x')).collect();
        let cmap = build_to_unicode_cmap(&pairs);
        assert_eq!(cmap.matches("beginbfchar").count(), 3);
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("50 beginbfchar"));
    }

    #[test]
    fn surrogate_pairs_are_emitted_for_non_bmp_chars() {
        let cmap = build_to_unicode_cmap(&[(1, '𠮷')]);
        assert!(cmap.contains("<0001> <D842DFB7>"));
    }
}
