//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.

use super::content_stream::ContentStreamBuilder;
use super::font_manager::{EmbeddedFont, FontFace, FontMetrics, ResolvedFont, StandardFont};
use super::image_handler::ImageData;
use super::metadata::PdfMetadata;
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::{dict, Dict, Object, ObjectRef};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::Arc;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Whether to compress streams
    pub compress: bool,
    /// Document information
    pub metadata: PdfMetadata,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            compress: true,
            metadata: PdfMetadata::default(),
        }
    }
}

impl PdfWriterConfig {
    /// Set the header version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.metadata.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.metadata.subject = Some(subject.into());
        self
    }

    /// Replace the whole metadata block.
    pub fn with_metadata(mut self, metadata: PdfMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams and embedded data will be compressed
    /// using FlateDecode (zlib/deflate) to reduce file size.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Internal page data.
#[derive(Debug)]
struct PageData {
    width: f32,
    height: f32,
    content_builder: ContentStreamBuilder,
    /// Font resource names used on this page
    fonts: IndexSet<String>,
    /// Image resource names used on this page
    images: IndexSet<String>,
}

/// A font resource shared by all pages.
#[derive(Debug)]
struct FontResource {
    name: String,
    face: FontFace,
    /// GID -> character, for the width array and ToUnicode map
    used_glyphs: BTreeMap<u16, char>,
}

/// PDF document writer.
///
/// Collects pages and the resources they reference, then serializes everything in
/// [`finish`](PdfWriter::finish).
#[derive(Debug)]
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    /// Object ID counter
    next_obj_id: u32,
    /// Font resources keyed by face identity
    fonts: IndexMap<String, FontResource>,
    /// Image resources in allocation order
    images: Vec<(String, ImageData)>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            next_obj_id: 1,
            fonts: IndexMap::new(),
            images: Vec::new(),
        }
    }

    fn alloc_ref(&mut self) -> ObjectRef {
        let id = ObjectRef(self.next_obj_id);
        self.next_obj_id += 1;
        id
    }

    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    pub fn metadata(&self) -> &PdfMetadata {
        &self.config.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut PdfMetadata {
        &mut self.config.metadata
    }

    /// Add a page with the given dimensions in points and make it current.
    pub fn add_page(&mut self, width: f32, height: f32) -> &mut ContentStreamBuilder {
        self.pages.push(PageData {
            width,
            height,
            content_builder: ContentStreamBuilder::new(),
            fonts: IndexSet::new(),
            images: IndexSet::new(),
        });
        log::info!("page {} opened ({} x {} pt)", self.pages.len(), width, height);
        let index = self.pages.len() - 1;
        &mut self.pages[index].content_builder
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_page(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Content of the page being written.
    pub fn current_content_mut(&mut self) -> Option<&mut ContentStreamBuilder> {
        self.pages.last_mut().map(|page| &mut page.content_builder)
    }

    /// Content of the page being written, read-only.
    pub fn current_content(&self) -> Option<&ContentStreamBuilder> {
        self.pages.last().map(|page| &page.content_builder)
    }

    /// Resource name of `font` on the current page, allocating it on first use.
    ///
    /// Glyphs of `text` are recorded so embedded fonts can describe their widths.
    pub fn use_font(&mut self, font: &ResolvedFont, text: &str) -> Result<String> {
        let page = self.pages.last_mut().ok_or_else(|| Error::no_page("text output"))?;
        let key = font.resource_key();
        let next_index = self.fonts.len() + 1;
        let resource = self.fonts.entry(key).or_insert_with(|| {
            let name = format!("F{}", next_index);
            log::debug!("allocated font resource {} for {}", name, font.resource_key());
            FontResource {
                name,
                face: font.face().clone(),
                used_glyphs: BTreeMap::new(),
            }
        });
        if let FontFace::Embedded(program) = &resource.face {
            for ch in text.chars() {
                resource.used_glyphs.entry(program.glyph_id(ch)).or_insert(ch);
            }
        }
        page.fonts.insert(resource.name.clone());
        Ok(resource.name.clone())
    }

    /// Register an image for the current page and return its resource name.
    pub fn add_image(&mut self, image: ImageData) -> Result<String> {
        let page = self.pages.last_mut().ok_or_else(|| Error::no_page("paint_picture"))?;
        let name = format!("Im{}", self.images.len() + 1);
        log::debug!(
            "allocated image resource {} ({}x{} px)",
            name,
            image.width,
            image.height
        );
        page.images.insert(name.clone());
        self.images.push((name.clone(), image));
        Ok(name)
    }

    /// Stream object, deflated when the config asks for it.
    fn stream(&self, mut dict: Dict, data: Vec<u8>) -> Result<Object> {
        let data = if self.config.compress {
            dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            compress_data(&data)?
        } else {
            data
        };
        Ok(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }

    /// Serialize the document into a byte vector.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.finish_to(Vec::new())
    }

    /// Serialize the document into `out` and return it.
    ///
    /// Objects are laid out in number order: catalog, page tree, shared resources,
    /// then each page followed by its content stream, and the info dictionary last.
    pub fn finish_to<W: Write>(mut self, out: W) -> Result<W> {
        if self.pages.is_empty() {
            return Err(Error::InvalidState("document has no pages".to_string()));
        }
        let mut body = BTreeMap::new();
        let catalog = self.alloc_ref();
        let tree = self.alloc_ref();

        let mut resource_refs: HashMap<String, ObjectRef> = HashMap::new();
        for resource in std::mem::take(&mut self.fonts).into_values() {
            let font_ref = match &resource.face {
                FontFace::Standard(font) => {
                    let id = self.alloc_ref();
                    body.insert(id, standard_font_dict(font));
                    id
                },
                FontFace::Embedded(program) => {
                    self.embed_font(program, &resource.used_glyphs, &mut body)?
                },
            };
            resource_refs.insert(resource.name, font_ref);
        }
        for (name, image) in std::mem::take(&mut self.images) {
            let image_ref = self.alloc_ref();
            let mut dict = image.build_xobject_dict();
            if let (Some(mask_dict), Some(mask)) = (image.build_soft_mask_dict(), &image.soft_mask)
            {
                let mask_ref = self.alloc_ref();
                dict.insert("SMask".to_string(), mask_ref.into());
                body.insert(
                    mask_ref,
                    Object::Stream {
                        dict: mask_dict,
                        data: bytes::Bytes::from(mask.clone()),
                    },
                );
            }
            let data = bytes::Bytes::from(image.data);
            body.insert(image_ref, Object::Stream { dict, data });
            resource_refs.insert(name, image_ref);
        }

        let pages = std::mem::take(&mut self.pages);
        let mut kids = Vec::with_capacity(pages.len());
        for page in &pages {
            let page_ref = self.alloc_ref();
            let contents = self.alloc_ref();
            body.insert(contents, self.stream(Dict::new(), page.content_builder.build()?)?);

            let lookup = |names: &IndexSet<String>| -> Dict {
                names
                    .iter()
                    .filter_map(|n| resource_refs.get(n).map(|r| (n.clone(), (*r).into())))
                    .collect()
            };
            let mut resources = Dict::new();
            for (category, names) in [("Font", &page.fonts), ("XObject", &page.images)] {
                if !names.is_empty() {
                    resources.insert(category.to_string(), lookup(names).into());
                }
            }
            body.insert(
                page_ref,
                Object::dict([
                    ("Type", Object::name("Page")),
                    ("Parent", tree.into()),
                    ("MediaBox", Object::page_box(page.width, page.height)),
                    ("Contents", contents.into()),
                    ("Resources", resources.into()),
                ]),
            );
            kids.push(page_ref.into());
        }

        body.insert(
            catalog,
            Object::dict([("Type", Object::name("Catalog")), ("Pages", tree.into())]),
        );
        body.insert(
            tree,
            Object::dict([
                ("Type", Object::name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", (pages.len() as i64).into()),
            ]),
        );
        let info = self.alloc_ref();
        body.insert(info, self.config.metadata.to_info_dict().into());

        let mut serializer = ObjectSerializer::new(out, &self.config.version)?;
        for (id, obj) in &body {
            serializer.indirect(*id, obj)?;
        }
        let written = serializer.position();
        let file_id = Object::String(uuid::Uuid::new_v4().as_bytes().to_vec());
        let out = serializer.finish(&dict([
            ("Root", catalog.into()),
            ("Info", info.into()),
            ("ID", vec![file_id.clone(), file_id].into()),
        ]))?;

        log::info!(
            "document finished: {} pages, {} objects, {} bytes of body",
            pages.len(),
            body.len(),
            written
        );
        Ok(out)
    }

    /// Type0 font over a CIDFontType2 descendant. Returns the Type0 reference.
    fn embed_font(
        &mut self,
        program: &Arc<EmbeddedFont>,
        used_glyphs: &BTreeMap<u16, char>,
        body: &mut BTreeMap<ObjectRef, Object>,
    ) -> Result<ObjectRef> {
        let [type0, descendant, descriptor, font_file, to_unicode] =
            [(); 5].map(|_| self.alloc_ref());
        let base_font = Object::name(program.postscript_name());
        let data = program.font_data();

        let length1 = dict([("Length1", (data.len() as i64).into())]);
        body.insert(font_file, self.stream(length1, data.to_vec())?);

        let rounded = |v: f32| Object::Integer(v.round() as i64);
        body.insert(
            descriptor,
            Object::dict([
                ("Type", Object::name("FontDescriptor")),
                ("FontName", base_font.clone()),
                ("Flags", (program.flags().bits() as i64).into()),
                ("FontBBox", program.bbox().map(rounded).to_vec().into()),
                ("ItalicAngle", program.italic_angle().into()),
                ("Ascent", rounded(program.ascent())),
                ("Descent", rounded(program.descent())),
                ("CapHeight", rounded(program.cap_height())),
                ("StemV", 80i64.into()),
                ("FontFile2", font_file.into()),
            ]),
        );

        // W entries of the form `gid [width]`
        let widths: Vec<Object> = used_glyphs
            .keys()
            .flat_map(|&gid| {
                let width = Object::Array(vec![(program.glyph_width(gid) as i64).into()]);
                [(gid as i64).into(), width]
            })
            .collect();
        body.insert(
            descendant,
            Object::dict([
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("CIDFontType2")),
                ("BaseFont", base_font.clone()),
                (
                    "CIDSystemInfo",
                    Object::dict([
                        ("Registry", Object::text_string("Adobe")),
                        ("Ordering", Object::text_string("Identity")),
                        ("Supplement", 0i64.into()),
                    ]),
                ),
                ("FontDescriptor", descriptor.into()),
                ("DW", 1000i64.into()),
                ("W", widths.into()),
                ("CIDToGIDMap", Object::name("Identity")),
            ]),
        );

        let cmap = to_unicode_cmap(used_glyphs).into_bytes();
        body.insert(to_unicode, self.stream(Dict::new(), cmap)?);

        body.insert(
            type0,
            Object::dict([
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type0")),
                ("BaseFont", base_font),
                ("Encoding", Object::name("Identity-H")),
                ("DescendantFonts", vec![descendant.into()].into()),
                ("ToUnicode", to_unicode.into()),
            ]),
        );
        Ok(type0)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_font_dict(font: &StandardFont) -> Object {
    let mut entries = dict([
        ("Type", Object::name("Font")),
        ("Subtype", Object::name("Type1")),
        ("BaseFont", Object::name(font.base_font())),
    ]);
    // symbolic faces keep their built-in encoding
    if !font.is_symbolic() {
        entries.insert("Encoding".to_string(), Object::name("WinAnsiEncoding"));
    }
    entries.into()
}

/// ToUnicode CMap mapping each used glyph back to its character.
fn to_unicode_cmap(used_glyphs: &BTreeMap<u16, char>) -> String {
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
    let entries: Vec<(&u16, &char)> = used_glyphs.iter().collect();
    // bfchar blocks hold at most 100 entries
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut utf16 = [0u16; 2];
            let units: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, units));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Font;
    use crate::writer::font_manager::FontRegistry;
    use crate::writer::image_handler::ColorSpace;

    fn uncompressed() -> PdfWriter {
        PdfWriter::with_config(PdfWriterConfig::default().with_compress(false))
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = uncompressed();
        writer.add_page(612.0, 792.0);
        let bytes = writer.finish().unwrap();

        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.contains("/ID ["));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_no_pages_is_invalid_state() {
        let err = PdfWriter::new().finish().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_font_resource_only_on_pages_that_use_it() {
        let mut writer = uncompressed();
        let font = FontRegistry::new().resolve(&Font::default()).unwrap();
        writer.add_page(612.0, 792.0);
        let name = writer.use_font(&font, "Hi").unwrap();
        assert_eq!(name, "F1");
        assert_eq!(writer.use_font(&font, "again").unwrap(), "F1");
        writer.add_page(612.0, 792.0);

        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert_eq!(content.matches("/BaseFont /Helvetica").count(), 1);
        assert_eq!(content.matches("/Font <</F1").count(), 1);
        assert!(content.contains("/Encoding /WinAnsiEncoding"));
    }

    #[test]
    fn test_use_font_without_page() {
        let font = FontRegistry::new().resolve(&Font::default()).unwrap();
        let err = PdfWriter::new().use_font(&font, "x").unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_pdf_with_metadata() {
        let config = PdfWriterConfig::default()
            .with_compress(false)
            .with_title("Test Document")
            .with_author("Test Author");

        let mut writer = PdfWriter::with_config(config);
        writer.add_page(612.0, 792.0);

        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);

        assert!(content.contains("/Title (Test Document)"));
        assert!(content.contains("/Author (Test Author)"));
        assert!(content.contains("/Producer (pdf_scribe)"));
        assert!(content.contains("/CreationDate (D:"));
    }

    #[test]
    fn test_multiple_pages() {
        let mut writer = uncompressed();
        writer.add_page(612.0, 792.0);
        writer.add_page(792.0, 612.0);

        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);

        assert!(content.contains("/Count 2"));
        assert!(content.contains("[0 0 612 792]"));
        assert!(content.contains("[0 0 792 612]"));
    }

    #[test]
    fn test_compressed_content_stream() {
        let mut writer = PdfWriter::new();
        writer.add_page(612.0, 792.0).move_to(0.0, 0.0).line_to(10.0, 10.0).stroke();
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(!content.contains("10 10 l"));
    }

    #[test]
    fn test_image_resource() {
        let mut writer = uncompressed();
        writer.add_page(612.0, 792.0);
        let image = ImageData::new(1, 1, ColorSpace::DeviceGray, vec![0]);
        assert_eq!(writer.add_image(image).unwrap(), "Im1");
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Subtype /Image"));
        assert!(content.contains("/XObject <</Im1"));
    }

    #[test]
    fn test_to_unicode_cmap() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert(3, 'A');
        glyphs.insert(7, '😀');
        let cmap = to_unicode_cmap(&glyphs);
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0003> <0041>"));
        assert!(cmap.contains("<0007> <D83DDE00>"));
    }
}
