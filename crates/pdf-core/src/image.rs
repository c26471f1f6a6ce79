//! Image XObjects (JPEG passthrough, everything else re-encoded)

use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{DynamicImage, GenericImageView};
use lopdf::{Dictionary, Object, Stream};
use std::io::Write;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Image payload ready to be written as an XObject
#[derive(Debug, Clone)]
pub(crate) struct ImageXObject {
    pub width: u32,
    pub height: u32,
    /// "DeviceRGB" or "DeviceGray"
    pub color_space: &'static str,
    /// "DCTDecode" for JPEG passthrough, "FlateDecode" otherwise
    pub filter: &'static str,
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel, written as an SMask
    pub alpha: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Build an XObject from encoded image bytes (PNG, JPEG)
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if is_jpeg(data) {
            if let Some((width, height, components @ (1 | 3))) = jpeg_info(data) {
                return Ok(Self {
                    width,
                    height,
                    color_space: if components == 1 { "DeviceGray" } else { "DeviceRGB" },
                    filter: "DCTDecode",
                    data: data.to_vec(),
                    alpha: None,
                });
            }
        }

        let decoded = image::load_from_memory(data)?;
        Self::from_decoded(&decoded)
    }

    fn from_decoded(image: &DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();

        let alpha = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let channel: Vec<u8> = rgba.pixels().map(|p| p[3]).collect();
            // fully opaque images don't need a mask
            if channel.iter().all(|&a| a == u8::MAX) {
                None
            } else {
                Some(deflate(&channel)?)
            }
        } else {
            None
        };

        let (raw, color_space) = if image.color().has_color() {
            (image.to_rgb8().into_raw(), "DeviceRGB")
        } else {
            (image.to_luma8().into_raw(), "DeviceGray")
        };

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: deflate(&raw)?,
            alpha,
        })
    }

    /// Image XObject dictionary and stream; `smask` references the alpha stream
    pub fn to_pdf_stream(&self, smask: Option<lopdf::ObjectId>) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::Name(self.color_space.as_bytes().to_vec()));
        dict.set("BitsPerComponent", 8);
        dict.set("Filter", Object::Name(self.filter.as_bytes().to_vec()));
        if let Some(id) = smask {
            dict.set("SMask", Object::Reference(id));
        }
        Stream::new(dict, self.data.clone())
    }

    /// Soft mask stream for the alpha channel, if any
    pub fn alpha_stream(&self) -> Option<Stream> {
        let alpha = self.alpha.as_ref()?;
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
        dict.set("BitsPerComponent", 8);
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        Some(Stream::new(dict, alpha.clone()))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() > 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF
}

/// Width, height and component count from the first SOF marker
fn jpeg_info(data: &[u8]) -> Option<(u32, u32, u8)> {
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height, data[i + 9]));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            return None;
        }
        i += 2 + length;
    }
    None
}

/// Operators drawing image `name` into the box with lower-left (`x`, `y`)
pub(crate) fn generate_image_operators(
    name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width:.3} 0 0 {height:.3} {x:.3} {y:.3} cm\n/{name} Do\nQ\n").into_bytes()
}
