//! Font handling for PDF documents

use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Object, Stream};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;

/// Embedded TrueType font
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters used, recorded for the widths and ToUnicode tables
    pub used_chars: BTreeSet<char>,
    metrics: FontMetrics,
}

/// Tables read out of the face once, at load time
#[derive(Debug, Clone)]
struct FontMetrics {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    glyph_ids: HashMap<char, u16>,
    /// Horizontal advance per glyph id
    advances: Vec<u16>,
}

impl FontMetrics {
    fn from_face(face: &ttf_parser::Face<'_>) -> Self {
        let mut glyph_ids = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|code_point| {
                    let Some(c) = char::from_u32(code_point) else {
                        return;
                    };
                    if let Some(id) = face.glyph_index(c) {
                        glyph_ids.entry(c).or_insert(id.0);
                    }
                });
            }
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0))
            .collect();

        Self {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            glyph_ids,
            advances,
        }
    }

    fn advance(&self, gid: u16) -> u16 {
        self.advances.get(gid as usize).copied().unwrap_or(0)
    }
}

/// PDF objects generated for font embedding
pub(crate) struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// Fails when the bytes are not a parseable TrueType/OpenType face. The
    /// face is parsed here only; later lookups use the tables read now.
    pub fn from_ttf(name: &str, ttf_data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{name}: {e}")))?;
        let metrics = FontMetrics::from_face(&face);

        Ok(Self {
            name: name.to_string(),
            ttf_data,
            used_chars: BTreeSet::new(),
            metrics,
        })
    }

    /// Add characters to the used set
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.metrics.glyph_ids.get(&c).copied()
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.metrics.units_per_em
    }

    /// Get font ascender
    pub fn ascender(&self) -> i16 {
        self.metrics.ascender
    }

    /// Get font descender
    pub fn descender(&self) -> i16 {
        self.metrics.descender
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph_id(c))
            .map(|gid| u32::from(self.metrics.advance(gid)))
            .sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f64) -> f64 {
        let width = self.text_width(text) as f64;
        width / self.units_per_em().max(1) as f64 * font_size
    }

    /// Encode text as hex string of glyph IDs for the Tj operator
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() * 4 + 2);
        result.push('<');
        for c in text.chars() {
            let gid = self.glyph_id(c).unwrap_or(0);
            result.push_str(&format!("{gid:04X}"));
        }
        result.push('>');
        result
    }

    /// PostScript-safe base font name
    fn base_font_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect()
    }

    /// Scale from font units to the 1000-unit glyph space used by PDF
    fn to_glyph_space(&self, value: i32) -> i32 {
        value * 1000 / self.units_per_em().max(1) as i32
    }

    /// Generate all PDF objects needed to embed this font
    ///
    /// References between the objects are left as `(0, 0)` and wired up by
    /// the document when the objects are added.
    pub(crate) fn to_pdf_objects(&self) -> Result<FontObjects> {
        let font_name = Object::Name(self.base_font_name().into_bytes());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(Dictionary::new(), tounicode_content.into_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.ttf_data)?;
        let compressed = encoder.finish()?;
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Length1", (self.ttf_data.len() as i64).into()),
                ("Filter", "FlateDecode".into()),
            ]),
            compressed,
        );

        let ascent = self.to_glyph_space(self.ascender() as i32);
        let descent = self.to_glyph_space(self.descender() as i32);
        let font_bbox = vec![0.into(), descent.into(), 1000.into(), ascent.into()];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()),
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascent.into()),
            ("Descent", descent.into()),
            ("CapHeight", ascent.into()),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))),
            ("CIDToGIDMap", "Identity".into()),
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()),
            ("ToUnicode", Object::Reference((0, 0))),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate /W array for the glyphs used in the document
    ///
    /// Individual mapping format: `[gid1 [w1] gid2 [w2] ...]`.
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();

        let mut gids: Vec<u16> = self.used_chars.iter().filter_map(|&c| self.glyph_id(c)).collect();
        gids.sort_unstable();
        gids.dedup();

        for gid in gids {
            let advance = self.metrics.advance(gid);
            widths.push((gid as i64).into());
            widths.push(vec![(self.to_glyph_space(advance as i32) as i64).into()].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let chars: Vec<char> = self.used_chars.iter().copied().collect();

        // bfchar sections are limited to 100 entries
        for chunk in chars.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for c in chunk {
                let gid = self.glyph_id(*c).unwrap_or(0);
                let mut utf16 = [0u16; 2];
                let unicode: String = c
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04X}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04X}> <{unicode}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../../fixtures/fonts/DejaVuSans.ttf");

    fn dejavu() -> FontData {
        FontData::from_ttf("DejaVu Sans", DEJAVU.to_vec()).unwrap()
    }

    #[test]
    fn test_from_ttf_rejects_garbage() {
        let result = FontData::from_ttf("broken", vec![0u8; 100]);
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }

    #[test]
    fn test_add_chars() {
        let mut font = dejavu();
        font.add_chars("Hello");
        assert_eq!(font.used_chars.len(), 4);
        assert!(font.used_chars.contains(&'H'));
        assert!(font.used_chars.contains(&'l'));
    }

    #[test]
    fn test_glyph_lookup() {
        let font = dejavu();
        assert!(font.glyph_id('A').is_some_and(|id| id != 0));
        assert_eq!(font.glyph_id('\u{10FFFD}'), None);
        assert_eq!(font.units_per_em(), 2048);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let font = dejavu();
        let w12 = font.text_width_points("Hello", 12.0);
        let w24 = font.text_width_points("Hello", 24.0);
        assert!(w12 > 0.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
        assert_eq!(font.text_width(""), 0);
    }

    #[test]
    fn test_encode_text_hex() {
        let font = dejavu();
        assert_eq!(font.encode_text_hex(""), "<>");
        let encoded = font.encode_text_hex("AB");
        assert_eq!(encoded.len(), 10);
        assert!(encoded.starts_with('<') && encoded.ends_with('>'));
    }

    #[test]
    fn test_tounicode_cmap() {
        let mut font = dejavu();
        font.add_chars("A");
        let gid = font.glyph_id('A').unwrap();
        let cmap = font.generate_tounicode_cmap();
        assert!(cmap.contains("begincmap"));
        assert!(cmap.contains(&format!("<{gid:04X}> <0041>")));
        assert!(cmap.contains("endcmap"));
    }

    #[test]
    fn test_to_pdf_objects() {
        let mut font = dejavu();
        font.add_chars("Hi");
        let objects = font.to_pdf_objects().unwrap();

        assert_eq!(
            objects.type0_font.get(b"BaseFont").unwrap().as_name().unwrap(),
            b"DejaVu-Sans"
        );
        // two glyphs, each as `gid [width]`
        let widths = objects.cid_font.get(b"W").unwrap().as_array().unwrap();
        assert_eq!(widths.len(), 4);
        assert!(!objects.font_file_stream.content.is_empty());
        assert!(!objects.tounicode_stream.content.is_empty());
        assert!(objects.font_descriptor.has(b"FontFile2"));
    }

    #[test]
    fn test_lookups_use_tables_read_at_load() {
        let mut font = dejavu();
        let width = font.text_width("Hello");
        let gid = font.glyph_id('H');
        let ascender = font.ascender();

        font.ttf_data.clear();

        assert_eq!(font.text_width("Hello"), width);
        assert_eq!(font.glyph_id('H'), gid);
        assert_eq!(font.ascender(), ascender);
        assert_eq!(font.units_per_em(), 2048);
        assert!(width > 0);
    }
}
