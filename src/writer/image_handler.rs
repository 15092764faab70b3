//! Pictures painted as Image XObjects.
//!
//! JPEG files are embedded as they are, behind `DCTDecode`. PNG files are decoded,
//! their colour samples deflated, and any alpha channel split into a soft mask.

use std::io::Write;
use std::path::Path;

use crate::error::Error;
use crate::object::{dict, Dict, Object};

/// Resolution assumed when a file does not record one.
pub const DEFAULT_DPI: f32 = 96.0;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// How the sample bytes of an [`ImageData`] are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Untouched JPEG file
    Jpeg,
    /// Deflated samples decoded from a PNG
    Png,
    /// Uncompressed samples
    Raw,
}

impl ImageFormat {
    fn filter(self) -> Option<&'static str> {
        match self {
            ImageFormat::Jpeg => Some("DCTDecode"),
            ImageFormat::Png => Some("FlateDecode"),
            ImageFormat::Raw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
}

impl ColorSpace {
    /// Samples per pixel.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }

    fn from_components(count: u8) -> Self {
        match count {
            1 => ColorSpace::DeviceGray,
            4 => ColorSpace::DeviceCMYK,
            _ => ColorSpace::DeviceRGB,
        }
    }
}

/// A decoded or pass-through picture ready to become an XObject.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
    pub format: ImageFormat,
    /// Sample bytes, encoded as `format` says
    pub data: Vec<u8>,
    /// Deflated 8-bit alpha samples
    pub soft_mask: Option<Vec<u8>>,
    /// Horizontal and vertical resolution recorded in the file
    pub dpi: Option<(f32, f32)>,
}

impl ImageData {
    /// Uncompressed 8-bit samples.
    pub fn new(width: u32, height: u32, color_space: ColorSpace, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Raw,
            data,
            soft_mask: None,
            dpi: None,
        }
    }

    /// Wrap a JPEG file without re-encoding it.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let frame = read_jpeg_frame(&data)?;
        Ok(Self {
            width: frame.width,
            height: frame.height,
            bits_per_component: frame.precision,
            color_space: ColorSpace::from_components(frame.components),
            format: ImageFormat::Jpeg,
            dpi: jfif_density(&data),
            data,
            soft_mask: None,
        })
    }

    /// Decode a PNG file down to 8-bit samples.
    pub fn from_png(data: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;
        let (width, height) = (img.width(), img.height());
        let color = img.color();

        let (color_space, samples, alpha) = match (color.has_color(), color.has_alpha()) {
            (false, false) => (ColorSpace::DeviceGray, img.into_luma8().into_raw(), None),
            (false, true) => {
                let (gray, alpha) = split_alpha(img.into_luma_alpha8().into_raw(), 1);
                (ColorSpace::DeviceGray, gray, Some(alpha))
            },
            (true, false) => (ColorSpace::DeviceRGB, img.into_rgb8().into_raw(), None),
            (true, true) => {
                let (rgb, alpha) = split_alpha(img.into_rgba8().into_raw(), 3);
                (ColorSpace::DeviceRGB, rgb, Some(alpha))
            },
        };

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Png,
            data: deflate(&samples)?,
            soft_mask: alpha.as_deref().map(deflate).transpose()?,
            dpi: png_density(data),
        })
    }

    /// Sniff the signature and load a JPEG or PNG.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        if data.starts_with(&[0xFF, 0xD8]) {
            Self::from_jpeg(data.to_vec())
        } else if data.starts_with(PNG_SIGNATURE) {
            Self::from_png(data)
        } else {
            Err(ImageError::UnsupportedFormat)
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ImageError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data)
    }

    /// Dictionary of the Image XObject; `Length` is left to the serializer.
    pub fn build_xobject_dict(&self) -> Dict {
        let mut entries = self.image_dict(self.color_space, self.bits_per_component);
        if let Some(filter) = self.format.filter() {
            entries.insert("Filter".to_string(), Object::name(filter));
        }
        entries
    }

    /// Dictionary of the soft mask, when the picture carries alpha.
    pub fn build_soft_mask_dict(&self) -> Option<Dict> {
        self.soft_mask.as_ref().map(|_| {
            let mut entries = self.image_dict(ColorSpace::DeviceGray, 8);
            entries.insert("Filter".to_string(), Object::name("FlateDecode"));
            entries
        })
    }

    fn image_dict(&self, color_space: ColorSpace, bits: u8) -> Dict {
        dict([
            ("Type", Object::name("XObject")),
            ("Subtype", Object::name("Image")),
            ("Width", (self.width as i64).into()),
            ("Height", (self.height as i64).into()),
            ("ColorSpace", Object::name(color_space.pdf_name())),
            ("BitsPerComponent", (bits as i64).into()),
        ])
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Size in points at the recorded resolution, or [`DEFAULT_DPI`].
    pub fn natural_size(&self) -> (f32, f32) {
        let (dpi_x, dpi_y) = self
            .dpi
            .filter(|(x, y)| *x > 0.0 && *y > 0.0)
            .unwrap_or((DEFAULT_DPI, DEFAULT_DPI));
        (
            self.width as f32 * 72.0 / dpi_x,
            self.height as f32 * 72.0 / dpi_y,
        )
    }

    /// Fill in whichever of `width`/`height` is missing.
    ///
    /// Neither given: natural size. One given: the other follows the aspect ratio.
    pub fn placed_size(&self, width: Option<f32>, height: Option<f32>) -> (f32, f32) {
        let (natural_w, natural_h) = self.natural_size();
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * natural_h / natural_w.max(f32::EPSILON)),
            (None, Some(h)) => (h * natural_w / natural_h.max(f32::EPSILON), h),
            (None, None) => (natural_w, natural_h),
        }
    }
}

impl From<ImageError> for Error {
    fn from(e: ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

/// Interleaved samples with a trailing alpha byte per pixel, split in two.
fn split_alpha(interleaved: Vec<u8>, colour_samples: usize) -> (Vec<u8>, Vec<u8>) {
    let stride = colour_samples + 1;
    let pixels = interleaved.len() / stride;
    let mut colour = Vec::with_capacity(pixels * colour_samples);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in interleaved.chunks_exact(stride) {
        colour.extend_from_slice(&pixel[..colour_samples]);
        alpha.push(pixel[colour_samples]);
    }
    (colour, alpha)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| ImageError::CompressionError(e.to_string()))
}

struct JpegFrame {
    width: u32,
    height: u32,
    precision: u8,
    components: u8,
}

/// Walk the marker segments up to the first start-of-frame.
fn read_jpeg_frame(data: &[u8]) -> Result<JpegFrame, ImageError> {
    let truncated = || ImageError::InvalidData("truncated JPEG".to_string());
    if !data.starts_with(&[0xFF, 0xD8]) {
        return Err(ImageError::InvalidData("missing JPEG start marker".to_string()));
    }
    let mut pos = 2;
    loop {
        // fill bytes may precede a marker
        while data.get(pos) == Some(&0xFF) && data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let marker = match data.get(pos..pos + 2) {
            Some([0xFF, marker]) => *marker,
            Some(_) => return Err(ImageError::InvalidData("bad JPEG marker".to_string())),
            None => return Err(truncated()),
        };
        let segment = data.get(pos + 2..pos + 4).ok_or_else(truncated)?;
        let length = u16::from_be_bytes([segment[0], segment[1]]) as usize;

        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let frame = data.get(pos + 4..pos + 10).ok_or_else(truncated)?;
            return Ok(JpegFrame {
                precision: frame[0],
                height: u16::from_be_bytes([frame[1], frame[2]]) as u32,
                width: u16::from_be_bytes([frame[3], frame[4]]) as u32,
                components: frame[5],
            });
        }
        if marker == 0xDA {
            return Err(ImageError::InvalidData("no JPEG frame header".to_string()));
        }
        pos += 2 + length;
    }
}

/// Density from a JFIF APP0 segment.
fn jfif_density(data: &[u8]) -> Option<(f32, f32)> {
    let app0 = data.get(2..20)?;
    if app0[..2] != [0xFF, 0xE0] || &app0[4..9] != b"JFIF\0" {
        return None;
    }
    let x = u16::from_be_bytes([app0[12], app0[13]]) as f32;
    let y = u16::from_be_bytes([app0[14], app0[15]]) as f32;
    match app0[11] {
        1 => Some((x, y)),
        2 => Some((x * 2.54, y * 2.54)),
        _ => None,
    }
}

/// Density from a PNG pHYs chunk, stored in pixels per metre.
fn png_density(data: &[u8]) -> Option<(f32, f32)> {
    let mut pos = PNG_SIGNATURE.len();
    while let Some(header) = data.get(pos..pos + 8) {
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        match &header[4..] {
            b"IDAT" => return None,
            b"pHYs" if len == 9 => {
                let body = data.get(pos + 8..pos + 17)?;
                if body[8] != 1 {
                    return None;
                }
                let x = u32::from_be_bytes([body[0], body[1], body[2], body[3]]) as f32;
                let y = u32::from_be_bytes([body[4], body[5], body[6], body[7]]) as f32;
                return Some((x * 0.0254, y * 0.0254));
            },
            _ => pos += 12 + len,
        }
    }
    None
}
