//! PDF backend used by the authoring engine.
//!
//! ## Architecture
//!
//! ```text
//! Scribe (cursor, styles, layout)
//!     ↓
//! [ContentStreamBuilder] (operators for one page)
//!     ↓
//! [PdfWriter] (pages, font and image resources, info)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! Font metrics come from [`FontRegistry`], pictures from [`ImageData`], and 2D/1D symbols
//! from [`ModuleMatrix`] / [`BarPattern`].

pub mod barcode;
mod content_stream;
mod font_manager;
mod image_handler;
mod metadata;
mod object_serializer;
mod pdf_writer;

pub use barcode::{BarPattern, BarcodeType, ModuleMatrix, QrErrorCorrection, QR_QUIET_ZONE};
pub use content_stream::{
    ContentStreamBuilder, ContentStreamOp, LineCap, LineJoin, TextArrayItem, KAPPA,
};
pub(crate) use content_stream::Num;
pub use font_manager::{
    EmbeddedFont, EncodedText, FontDescriptorFlags, FontFace, FontMetrics, FontRegistry,
    ResolvedFont, StandardFont,
};
pub use image_handler::{ColorSpace, ImageData, ImageError, ImageFormat, DEFAULT_DPI};
pub use metadata::{format_pdf_date, PdfMetadata, PRODUCER};
pub use object_serializer::{write_object, ObjectSerializer};
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
