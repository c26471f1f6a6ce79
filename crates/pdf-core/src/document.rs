//! PDF Document wrapper

use crate::font::FontData;
use crate::graphics::{ellipse_operators, line_operators, rect_operators, ShapeStyle};
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::generate_text_operators;
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Fallback page size when no MediaBox can be found (A4 in points)
const A4: (f64, f64) = (595.28, 841.89);

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#').filter(|h| h.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::from_rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Font, size, color and alignment for a text insertion
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Registered font name
    pub font: String,
    /// Font size in points
    pub size: f64,
    pub color: Color,
    /// Alignment relative to the x coordinate
    pub align: Align,
}

impl TextStyle {
    pub fn new(font: &str, size: f64) -> Self {
        Self {
            font: font.to_string(),
            size,
            color: Color::default(),
            align: Align::Left,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// A page's MediaBox in PDF user space
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBox {
    /// Lower-left corner
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl PageBox {
    /// User space x for a distance from the left edge
    fn x(&self, x: f64) -> f64 {
        self.x + x
    }

    /// User space y for a distance from the top edge
    fn y(&self, y: f64) -> f64 {
        self.y + self.height - y
    }
}

/// PDF Document wrapper providing high-level drawing operations
///
/// Page numbers are 1-indexed. All coordinates are in points from the
/// top-left corner of the page.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Root Pages node, new pages are appended here
    pages_id: ObjectId,
    /// Page object ids in page order
    page_ids: Vec<ObjectId>,
    /// Registered fonts by name
    fonts: HashMap<String, FontData>,
    /// Page font resources (page number -> font name -> resource name)
    page_font_resources: HashMap<usize, BTreeMap<String, String>>,
    next_font_resource: u32,
    /// Embedded images (data hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    next_image_resource: u32,
    /// Buffered content operators per page, written once on save
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
    title: Option<String>,
    lang: Option<String>,
}

impl PdfDocument {
    /// Create an empty document with no pages
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.7");
        let pages_id = inner.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self::from_inner(inner, pages_id)
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        let catalog_id = inner
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::ParseError("Document trailer missing Root entry".to_string()))?;
        let pages_id = inner
            .get_dictionary(catalog_id)
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))?;

        Ok(Self::from_inner(inner, pages_id))
    }

    fn from_inner(inner: Document, pages_id: ObjectId) -> Self {
        let page_ids = inner.get_pages().into_values().collect();
        Self {
            inner,
            pages_id,
            page_ids,
            fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            next_image_resource: 1,
            page_content_buffer: BTreeMap::new(),
            title: None,
            lang: None,
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        page.checked_sub(1)
            .and_then(|index| self.page_ids.get(index))
            .copied()
            .ok_or(PdfError::InvalidPage(page, self.page_ids.len()))
    }

    /// Append a blank page of the given size (points) and return its number
    pub fn add_page(&mut self, width: f64, height: f64) -> Result<usize> {
        let contents_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ],
            "Resources" => Dictionary::new(),
            "Contents" => contents_id,
        });

        self.append_to_page_tree(page_id)?;
        Ok(self.page_count())
    }

    /// Duplicate a page (with its content and inherited attributes) at the end
    pub fn duplicate_page(&mut self, page: usize) -> Result<usize> {
        let source_id = self.page_id(page)?;
        let mut new_page = self.inner.get_dictionary(source_id)?.clone();

        let inheritable: [&[u8]; 3] = [b"MediaBox", b"Resources", b"Rotate"];
        for key in inheritable {
            if !new_page.has(key) {
                if let Some(value) = self.inherited_attribute(source_id, key) {
                    new_page.set(key, value);
                }
            }
        }

        // The copy gets its own content stream so later drawing stays per-page
        let content = self.page_content(source_id)?;
        let contents_id = self.inner.add_object(Stream::new(Dictionary::new(), content));
        new_page.set("Contents", Object::Reference(contents_id));
        new_page.set("Parent", Object::Reference(self.pages_id));

        let new_id = self.inner.add_object(new_page);
        self.append_to_page_tree(new_id)?;
        Ok(self.page_count())
    }

    /// Remove every page after `keep`
    pub fn truncate_pages(&mut self, keep: usize) {
        let count = self.page_count();
        if count > keep {
            let extra: Vec<u32> = ((keep + 1)..=count).map(|p| p as u32).collect();
            self.inner.delete_pages(&extra);
            self.page_ids.truncate(keep);
            self.page_content_buffer.retain(|page, _| *page <= keep);
            let remaining = self.page_count() as i64;
            if let Ok(pages) = self.inner.get_dictionary_mut(self.pages_id) {
                pages.set("Count", Object::Integer(remaining));
            }
        }
    }

    fn append_to_page_tree(&mut self, page_id: ObjectId) -> Result<()> {
        let pages = self.inner.get_dictionary_mut(self.pages_id)?;

        let mut kids = pages
            .get(b"Kids")
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default();
        kids.push(Object::Reference(page_id));
        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);

        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(count + 1));
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Look up a page attribute, following the Parent chain for inherited values
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;

        // Parent chains deeper than this are treated as broken
        for _ in 0..16 {
            let dict = self.inner.get_dictionary(current).ok()?;
            if let Ok(value) = dict.get(key) {
                return match value {
                    Object::Reference(id) => self.inner.get_object(*id).ok().cloned(),
                    other => Some(other.clone()),
                };
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        }

        None
    }

    /// Page width and height in points
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let page_box = self.page_box(page)?;
        Ok((page_box.width, page_box.height))
    }

    fn page_box(&self, page: usize) -> Result<PageBox> {
        let page_id = self.page_id(page)?;
        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .or_else(|| self.inherited_attribute(page_id, b"CropBox"));

        let Some(Object::Array(values)) = media_box else {
            return Ok(PageBox {
                x: 0.0,
                y: 0.0,
                width: A4.0,
                height: A4.1,
            });
        };
        if values.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }

        let number = |obj: &Object| -> Result<f64> {
            match obj {
                Object::Integer(i) => Ok(*i as f64),
                Object::Real(r) => Ok(*r as f64),
                _ => Err(PdfError::ParseError("Invalid MediaBox entry".to_string())),
            }
        };
        let (x1, y1, x2, y2) = (
            number(&values[0])?,
            number(&values[1])?,
            number(&values[2])?,
            number(&values[3])?,
        );
        Ok(PageBox {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        })
    }

    /// Register a TrueType font under `name`
    pub fn register_font(&mut self, name: &str, ttf_data: Vec<u8>) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        let font = FontData::from_ttf(name, ttf_data)?;
        self.fonts.insert(name.to_string(), font);
        Ok(())
    }

    /// Whether a font has been registered under `name`
    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    fn font(&self, name: &str) -> Result<&FontData> {
        self.fonts
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.to_string()))
    }

    /// Width of `text` in points
    pub fn text_width(&self, font: &str, text: &str, size: f64) -> Result<f64> {
        Ok(self.font(font)?.text_width_points(text, size))
    }

    /// Distance from the top of a line to its baseline, in points
    pub fn ascent(&self, font: &str, size: f64) -> Result<f64> {
        let font = self.font(font)?;
        Ok(font.ascender() as f64 / font.units_per_em() as f64 * size)
    }

    /// Insert a single line of text
    ///
    /// `y` is the baseline measured from the top of the page. Alignment is
    /// relative to `x`: centered text is centered on it, right-aligned text
    /// ends at it.
    pub fn insert_text(
        &mut self,
        page: usize,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let page_box = self.page_box(page)?;

        let (text_hex, width) = {
            let font = self
                .fonts
                .get_mut(&style.font)
                .ok_or_else(|| PdfError::FontNotFound(style.font.clone()))?;
            font.add_chars(text);
            (font.encode_text_hex(text), font.text_width_points(text, style.size))
        };

        let start_x = match style.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        let resource = self.font_resource(&style.font, page);
        let ops = generate_text_operators(
            &text_hex,
            page_box.x(start_x),
            page_box.y(y),
            &resource,
            style.size,
            style.color,
        );
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Resource name (e.g. "TsF1") for a font on a page
    ///
    /// The prefix keeps the names clear of resources a base PDF already uses.
    fn font_resource(&mut self, font: &str, page: usize) -> String {
        let resources = self.page_font_resources.entry(page).or_default();
        if let Some(name) = resources.get(font) {
            return name.clone();
        }
        let name = format!("TsF{}", self.next_font_resource);
        self.next_font_resource += 1;
        resources.insert(font.to_string(), name.clone());
        name
    }

    /// Draw a straight line between two points
    pub fn draw_line(
        &mut self,
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    ) -> Result<()> {
        let b = self.page_box(page)?;
        let ops = line_operators(b.x(from.0), b.y(from.1), b.x(to.0), b.y(to.1), width, color);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Draw a rectangle whose top-left corner is at (`x`, `y`)
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &ShapeStyle,
    ) -> Result<()> {
        let b = self.page_box(page)?;
        let ops = rect_operators(b.x(x), b.y(y + height), width, height, style);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Draw an ellipse inscribed in the box whose top-left corner is at (`x`, `y`)
    pub fn draw_ellipse(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &ShapeStyle,
    ) -> Result<()> {
        let b = self.page_box(page)?;
        let (rx, ry) = (width / 2.0, height / 2.0);
        let ops = ellipse_operators(b.x(x + rx), b.y(y + ry), rx, ry, style);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Insert a PNG/JPEG image stretched into the box at (`x`, `y`)
    ///
    /// Identical image data is embedded once and shared between pages.
    pub fn insert_image(
        &mut self,
        page: usize,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let b = self.page_box(page)?;

        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let hash = hasher.finish();

        let object_id = match self.embedded_images.get(&hash) {
            Some(id) => *id,
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                let smask = xobject.alpha_stream().map(|s| self.inner.add_object(s));
                let id = self.inner.add_object(xobject.to_pdf_stream(smask));
                self.embedded_images.insert(hash, id);
                id
            }
        };

        let name = format!("TsIm{}", self.next_image_resource);
        self.next_image_resource += 1;
        self.set_page_resource(page, b"XObject", &name, object_id)?;

        let ops = generate_image_operators(&name, b.x(x), b.y(y + height), width, height);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Set the document title and natural language
    pub fn set_info(&mut self, title: &str, lang: &str) {
        self.title = Some(title.to_string());
        self.lang = Some(lang.to_string()).filter(|l| !l.is_empty());
    }

    /// Serialize the document
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;
        self.write_info()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        tracing::debug!(bytes = buffer.len(), "serialized pdf document");
        Ok(buffer)
    }

    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Decoded content of a page, with all content streams concatenated
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page = self.inner.get_dictionary(page_id)?;
        let decode = |stream: &Stream| {
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone())
        };
        let resolve = |obj: &Object| -> Vec<u8> {
            match obj {
                Object::Stream(stream) => decode(stream),
                Object::Reference(id) => match self.inner.get_object(*id) {
                    Ok(Object::Stream(stream)) => decode(stream),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            }
        };

        let content = match page.get(b"Contents") {
            Ok(Object::Array(parts)) => parts
                .iter()
                .flat_map(|p| {
                    let mut part = resolve(p);
                    part.push(b'\n');
                    part
                })
                .collect(),
            Ok(Object::Reference(id)) => match self.inner.get_object(*id)? {
                Object::Array(parts) => parts.iter().flat_map(resolve).collect(),
                other => resolve(other),
            },
            Ok(other) => resolve(other),
            Err(_) => Vec::new(),
        };
        Ok(content)
    }

    /// Write buffered operators after each page's existing content
    ///
    /// Existing content is wrapped in q/Q so its graphics state can't leak
    /// into the appended operators.
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);

        for (page, ops) in buffers {
            let page_id = self.page_id(page)?;
            let existing = self.page_content(page_id)?;

            let mut content = Vec::with_capacity(existing.len() + ops.len() + 8);
            if !existing.is_empty() {
                content.extend_from_slice(b"q\n");
                content.extend_from_slice(&existing);
                content.extend_from_slice(b"\nQ\n");
            }
            content.extend_from_slice(&ops);

            let mut stream = Stream::new(Dictionary::new(), content);
            // uncompressed content is still valid, so a failed compression is ignored
            let _ = stream.compress();
            let stream_id = self.inner.add_object(stream);
            self.inner
                .get_dictionary_mut(page_id)?
                .set("Contents", Object::Reference(stream_id));
        }

        Ok(())
    }

    /// Embed every font that was used and reference it from its pages
    fn embed_fonts(&mut self) -> Result<()> {
        let mut embedded: HashMap<String, ObjectId> = HashMap::new();

        let mut names: Vec<&String> = self
            .fonts
            .iter()
            .filter(|(_, font)| !font.used_chars.is_empty())
            .map(|(name, _)| name)
            .collect();
        names.sort();

        for name in names {
            let objects = self.fonts[name].to_pdf_objects()?;

            let font_file_id = self.inner.add_object(objects.font_file_stream);
            let mut descriptor = objects.font_descriptor;
            descriptor.set("FontFile2", Object::Reference(font_file_id));
            let descriptor_id = self.inner.add_object(descriptor);

            let mut cid_font = objects.cid_font;
            cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
            let cid_font_id = self.inner.add_object(cid_font);

            let tounicode_id = self.inner.add_object(objects.tounicode_stream);
            let mut type0 = objects.type0_font;
            type0.set("DescendantFonts", vec![Object::Reference(cid_font_id)]);
            type0.set("ToUnicode", Object::Reference(tounicode_id));

            embedded.insert(name.clone(), self.inner.add_object(type0));
        }

        let page_resources = std::mem::take(&mut self.page_font_resources);
        for (page, fonts) in page_resources {
            for (font, resource) in fonts {
                let id = *embedded
                    .get(&font)
                    .ok_or_else(|| PdfError::FontNotFound(font.clone()))?;
                self.set_page_resource(page, b"Font", &resource, id)?;
            }
        }

        Ok(())
    }

    /// Add `name -> id` to the page's Resources sub-dictionary `category`
    ///
    /// Inherited or referenced resource dictionaries are copied onto the page
    /// first so other pages sharing them are not affected.
    fn set_page_resource(
        &mut self,
        page: usize,
        category: &[u8],
        name: &str,
        id: ObjectId,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;

        let mut resources = match self.inherited_attribute(page_id, b"Resources") {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        };
        let mut entries = match resources.get(category) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(ref_id)) => {
                self.inner.get_dictionary(*ref_id).cloned().unwrap_or_default()
            }
            _ => Dictionary::new(),
        };
        entries.set(name, Object::Reference(id));
        resources.set(category, Object::Dictionary(entries));

        self.inner
            .get_dictionary_mut(page_id)?
            .set("Resources", Object::Dictionary(resources));
        Ok(())
    }

    fn write_info(&mut self) -> Result<()> {
        let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
        let mut info = dictionary! {
            "Producer" => Object::string_literal("template-studio"),
            "CreationDate" => Object::string_literal(created),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = self.inner.add_object(info);
        self.inner.trailer.set("Info", info_id);

        if let Some(lang) = &self.lang {
            let catalog_id = self.inner.trailer.get(b"Root").and_then(Object::as_reference)?;
            self.inner
                .get_dictionary_mut(catalog_id)?
                .set("Lang", text_string(lang));
        }
        Ok(())
    }
}

/// PDF text string: a literal for ASCII, UTF-16BE with a byte order mark otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../../fixtures/fonts/DejaVuSans.ttf");

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::red()));
        assert_eq!(Color::from_hex("#fff"), Some(Color::white()));
        assert_eq!(Color::from_hex("000000"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn test_new_document_pages() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);

        assert_eq!(doc.add_page(200.0, 100.0).unwrap(), 1);
        assert_eq!(doc.add_page(595.28, 841.89).unwrap(), 2);
        assert_eq!(doc.page_count(), 2);

        let (w, h) = doc.page_size(1).unwrap();
        assert!((w - 200.0).abs() < 1e-3 && (h - 100.0).abs() < 1e-3);
        assert!(matches!(doc.page_size(3), Err(PdfError::InvalidPage(3, 2))));
    }

    #[test]
    fn test_duplicate_and_truncate() {
        let mut doc = PdfDocument::new();
        doc.add_page(100.0, 100.0).unwrap();
        doc.add_page(300.0, 100.0).unwrap();

        assert_eq!(doc.duplicate_page(2).unwrap(), 3);
        let (w, _) = doc.page_size(3).unwrap();
        assert!((w - 300.0).abs() < 1e-3);

        doc.truncate_pages(1);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_register_font_twice_fails() {
        let mut doc = PdfDocument::new();
        doc.register_font("dejavu", DEJAVU.to_vec()).unwrap();
        assert!(doc.has_font("dejavu"));
        assert!(matches!(
            doc.register_font("dejavu", DEJAVU.to_vec()),
            Err(PdfError::FontAlreadyExists(_))
        ));
    }

    #[test]
    fn test_insert_text_unknown_font() {
        let mut doc = PdfDocument::new();
        doc.add_page(100.0, 100.0).unwrap();
        let result = doc.insert_text(1, "hi", 0.0, 10.0, &TextStyle::new("missing", 12.0));
        assert!(matches!(result, Err(PdfError::FontNotFound(_))));
    }

    #[test]
    fn test_text_roundtrip_through_bytes() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page(595.28, 841.89).unwrap();
        doc.register_font("dejavu", DEJAVU.to_vec()).unwrap();
        doc.insert_text(page, "Hello", 72.0, 72.0, &TextStyle::new("dejavu", 12.0))
            .unwrap();
        doc.draw_rect(page, 10.0, 10.0, 50.0, 20.0, &ShapeStyle::filled(Color::red()))
            .unwrap();
        doc.set_info("pdfme", "en");

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        let pages = reloaded.get_pages();
        assert_eq!(pages.len(), 1);
        let page = reloaded.get_dictionary(pages[&1]).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        assert_eq!(resources.get(b"Font").unwrap().as_dict().unwrap().len(), 1);

        let info_id = reloaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = reloaded.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"pdfme");
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        let mut doc = PdfDocument::new();
        doc.add_page(100.0, 100.0).unwrap();
        doc.set_info("請求書 2024", "ja");

        let reloaded = Document::load_mem(&doc.to_bytes().unwrap()).unwrap();
        let info_id = reloaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let title = reloaded.get_dictionary(info_id).unwrap().get(b"Title").unwrap();
        let bytes = title.as_str().unwrap();
        assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), "請求書 2024");

        let catalog_id = reloaded.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let catalog = reloaded.get_dictionary(catalog_id).unwrap();
        assert_eq!(catalog.get(b"Lang").unwrap().as_str().unwrap(), b"ja");
    }

    #[test]
    fn test_drawing_honours_media_box_origin() {
        let mut base = PdfDocument::new();
        base.add_page(612.0, 792.0).unwrap();
        let page_id = base.page_id(1).unwrap();
        base.inner.get_dictionary_mut(page_id).unwrap().set(
            "MediaBox",
            vec![50.into(), 100.into(), 662.into(), 892.into()],
        );
        let bytes = base.to_bytes().unwrap();

        let mut doc = PdfDocument::open_from_bytes(&bytes).unwrap();
        assert_eq!(doc.page_size(1).unwrap(), (612.0, 792.0));
        doc.draw_rect(1, 10.0, 20.0, 30.0, 40.0, &ShapeStyle::filled(Color::red()))
            .unwrap();

        let ops = String::from_utf8(doc.page_content_buffer[&1].clone()).unwrap();
        // x = 50 + 10, y = 100 + 792 - 20 - 40
        assert!(ops.contains("60.000 832.000 30.000 40.000 re"), "{ops}");
    }

    #[test]
    fn test_page_ids_follow_added_and_removed_pages() {
        let mut doc = PdfDocument::new();
        for width in [100.0, 200.0, 300.0] {
            doc.add_page(width, 100.0).unwrap();
        }
        doc.duplicate_page(1).unwrap();
        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.page_size(4).unwrap().0, 100.0);

        doc.truncate_pages(2);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_size(2).unwrap().0, 200.0);
        assert!(matches!(doc.page_size(3), Err(PdfError::InvalidPage(3, 2))));
        assert!(matches!(doc.page_size(0), Err(PdfError::InvalidPage(0, 2))));

        let reloaded = Document::load_mem(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }
}
