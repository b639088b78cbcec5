// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template loading and the content-append primitives. A `Template` is the
// immutable loaded document; each render call works on a `TemplateInstance`,
// a private clone that content is appended to and then serialized. The
// template on disk is never touched.
//
// Layout hands us top-left-origin coordinates; everything here flips them to
// PDF's bottom-left origin at the last moment.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use satzwerk_core::error::{Result, SatzwerkError};
use satzwerk_core::types::{PageGeometry, Rect, Rgb};
use satzwerk_layout::image::PlacedImage;
use satzwerk_layout::table::PlacedRow;
use satzwerk_layout::text::FittedLine;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, instrument};

/// Resource name of the regular face (Helvetica, WinAnsi).
const FONT_REGULAR: &str = "SZ_F1";
/// Resource name of the bold face (Helvetica-Bold, WinAnsi).
const FONT_BOLD: &str = "SZ_F2";
/// JPEG quality used when embedding images.
const JPEG_QUALITY: u8 = 90;
/// Cap on Parent-chain hops when resolving inherited page attributes.
const MAX_PARENT_DEPTH: usize = 32;

fn pdf_err(err: lopdf::Error) -> SatzwerkError {
    SatzwerkError::Template(format!("pdf error: {err}"))
}

/// Summary of a loaded template, for logs and authoring tools.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub page_count: usize,
    /// SHA-256 of the template bytes, hex-encoded.
    pub fingerprint: String,
    pub pages: Vec<PageGeometry>,
}

/// A loaded, validated template document.
pub struct Template {
    doc: Document,
    fingerprint: String,
    pages: Vec<PageGeometry>,
}

// The wrapped lopdf document is not Debug; summarize instead.
impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("fingerprint", &self.fingerprint)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

impl Template {
    /// Load a template from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Load a template from already-read bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(pdf_err)?;
        if doc.is_encrypted() {
            return Err(SatzwerkError::Template(
                "template PDF is encrypted".to_string(),
            ));
        }

        let fingerprint = hex::encode(Sha256::digest(bytes));
        let mut pages = Vec::new();
        for (number, page_id) in doc.get_pages() {
            let (width, height) = page_size(&doc, page_id)?;
            pages.push(PageGeometry {
                number,
                width,
                height,
            });
        }
        if pages.is_empty() {
            return Err(SatzwerkError::Template(
                "template PDF has no pages".to_string(),
            ));
        }
        debug!(
            pages = pages.len(),
            fingerprint = %&fingerprint[..12],
            "template loaded"
        );
        Ok(Self {
            doc,
            fingerprint,
            pages,
        })
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn page_geometries(&self) -> &[PageGeometry] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            page_count: self.pages.len(),
            fingerprint: self.fingerprint.clone(),
            pages: self.pages.clone(),
        }
    }

    /// Start a fresh writable copy for one render call.
    pub fn instance(&self) -> TemplateInstance {
        let doc = self.doc.clone();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        TemplateInstance {
            doc,
            page_ids,
            pages: self.pages.clone(),
            regular_font: None,
            bold_font: None,
            image_counter: 0,
        }
    }
}

/// Width and height of a page, resolving CropBox/MediaBox through the
/// Parent chain where the page dictionary inherits them.
fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f64, f64)> {
    let page_box = inherited_array(doc, page_id, b"MediaBox")
        .or_else(|| inherited_array(doc, page_id, b"CropBox"))
        .ok_or_else(|| SatzwerkError::Template("page has no MediaBox".to_string()))?;
    if page_box.len() != 4 {
        return Err(SatzwerkError::Template(format!(
            "malformed page box: {} entries",
            page_box.len()
        )));
    }
    let width = page_box[2] - page_box[0];
    let height = page_box[3] - page_box[1];
    if width <= 0.0 || height <= 0.0 {
        return Err(SatzwerkError::Template(format!(
            "degenerate page box: {width}x{height}"
        )));
    }
    Ok((width, height))
}

fn inherited_array(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Vec<f64>> {
    let mut current = page_id;
    for _ in 0..MAX_PARENT_DEPTH {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(arr) = dict.get(key).and_then(Object::as_array) {
            return arr.iter().map(as_number).collect();
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Encode text for a WinAnsi-encoded Type1 font. ASCII and Latin-1 pass
/// through; the cp1252 punctuation block is remapped; anything else becomes
/// a question mark.
pub(crate) fn winansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            0x20..=0x7E => ch as u8,
            0xA0..=0xFF => ch as u8,
            _ => match ch {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => b'?',
            },
        })
        .collect()
}

/// A writable copy of the template for one render call.
pub struct TemplateInstance {
    doc: Document,
    /// Page object ids in page-number order.
    page_ids: Vec<ObjectId>,
    pages: Vec<PageGeometry>,
    regular_font: Option<ObjectId>,
    bold_font: Option<ObjectId>,
    image_counter: usize,
}

impl TemplateInstance {
    /// Geometry of a 1-indexed page, if it exists.
    pub fn page_geometry(&self, page: u32) -> Option<PageGeometry> {
        self.pages.iter().find(|p| p.number == page).copied()
    }

    fn page_entry(&self, page: u32) -> Result<(ObjectId, PageGeometry)> {
        let index = self
            .pages
            .iter()
            .position(|p| p.number == page)
            .ok_or_else(|| {
                SatzwerkError::Template(format!("page {page} does not exist in the template"))
            })?;
        Ok((self.page_ids[index], self.pages[index]))
    }

    /// Append positioned text lines to a page.
    pub fn commit_lines(&mut self, page: u32, lines: &[FittedLine]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let (page_id, geometry) = self.page_entry(page)?;
        self.ensure_page_fonts(page_id)?;

        let mut ops = vec![Operation::new("q", vec![])];
        for line in lines {
            let font = if line.bold { FONT_BOLD } else { FONT_REGULAR };
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![font.into(), line.font_size.into()],
            ));
            ops.push(Operation::new(
                "rg",
                vec![line.color.r.into(), line.color.g.into(), line.color.b.into()],
            ));
            ops.push(Operation::new(
                "Td",
                vec![line.x.into(), (geometry.height - line.y).into()],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(
                    winansi_bytes(&line.text),
                    lopdf::StringFormat::Literal,
                )],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
        ops.push(Operation::new("Q", vec![]));
        self.append_content(page_id, ops)
    }

    /// Append a table's label and indicator runs to a page.
    pub fn commit_rows(&mut self, page: u32, rows: &[PlacedRow]) -> Result<()> {
        let lines: Vec<FittedLine> = rows
            .iter()
            .flat_map(|row| [row.label.clone(), row.indicator.clone()])
            .collect();
        self.commit_lines(page, &lines)
    }

    /// Embed a placed image as a JPEG XObject and draw it.
    pub fn commit_image(&mut self, page: u32, placed: &PlacedImage) -> Result<()> {
        let (page_id, geometry) = self.page_entry(page)?;

        let jpeg = flatten_to_jpeg(placed)?;
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(placed.image.width()),
                "Height" => i64::from(placed.image.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        let image_id = self.doc.add_object(stream);
        self.image_counter += 1;
        let name = format!("SZ_Im{}", self.image_counter);
        self.add_page_xobject(page_id, &name, image_id)?;

        let mut ops = vec![Operation::new("q", vec![])];
        if let Some(clip) = placed.clip {
            ops.push(Operation::new(
                "re",
                vec![
                    clip.x.into(),
                    (geometry.height - clip.y - clip.height).into(),
                    clip.width.into(),
                    clip.height.into(),
                ],
            ));
            ops.push(Operation::new("W", vec![]));
            ops.push(Operation::new("n", vec![]));
        }
        // Unit square → placed box; the image's top edge is at placed.y.
        ops.push(Operation::new(
            "cm",
            vec![
                placed.width.into(),
                0.into(),
                0.into(),
                placed.height.into(),
                placed.x.into(),
                (geometry.height - placed.y - placed.height).into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![name.as_str().into()]));
        ops.push(Operation::new("Q", vec![]));
        self.append_content(page_id, ops)
    }

    /// Stroke a rectangle outline, for the debug overlay.
    pub fn stroke_rect(&mut self, page: u32, rect: Rect, color: Rgb, line_width: f64) -> Result<()> {
        let (page_id, geometry) = self.page_entry(page)?;
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("w", vec![line_width.into()]),
            Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()]),
            Operation::new(
                "re",
                vec![
                    rect.x.into(),
                    (geometry.height - rect.y - rect.height).into(),
                    rect.width.into(),
                    rect.height.into(),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.append_content(page_id, ops)
    }

    /// Fill a rectangle, for the debug overlay's label strips.
    pub fn fill_rect(&mut self, page: u32, rect: Rect, color: Rgb) -> Result<()> {
        let (page_id, geometry) = self.page_entry(page)?;
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()]),
            Operation::new(
                "re",
                vec![
                    rect.x.into(),
                    (geometry.height - rect.y - rect.height).into(),
                    rect.width.into(),
                    rect.height.into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.append_content(page_id, ops)
    }

    /// Serialize the filled document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }

    fn append_content(&mut self, page_id: ObjectId, ops: Vec<Operation>) -> Result<()> {
        let content = Content { operations: ops };
        let bytes = content.encode().map_err(pdf_err)?;
        self.doc.add_page_contents(page_id, bytes).map_err(pdf_err)
    }

    fn ensure_fonts(&mut self) -> (ObjectId, ObjectId) {
        let regular = *self.regular_font.get_or_insert_with(|| {
            self.doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            })
        });
        let bold = *self.bold_font.get_or_insert_with(|| {
            self.doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica-Bold",
                "Encoding" => "WinAnsiEncoding",
            })
        });
        (regular, bold)
    }

    fn ensure_page_fonts(&mut self, page_id: ObjectId) -> Result<()> {
        let (regular, bold) = self.ensure_fonts();
        let page_dict = self
            .doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(pdf_err)?
            .clone();
        let mut resources = resolved_dict(&self.doc, page_dict.get(b"Resources").ok());
        let mut fonts = resolved_dict(&self.doc, resources.get(b"Font").ok());
        fonts.set(FONT_REGULAR, Object::Reference(regular));
        fonts.set(FONT_BOLD, Object::Reference(bold));
        resources.set("Font", Object::Dictionary(fonts));
        self.set_page_resources(page_id, resources)
    }

    fn add_page_xobject(&mut self, page_id: ObjectId, name: &str, object: ObjectId) -> Result<()> {
        let page_dict = self
            .doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(pdf_err)?
            .clone();
        let mut resources = resolved_dict(&self.doc, page_dict.get(b"Resources").ok());
        let mut xobjects = resolved_dict(&self.doc, resources.get(b"XObject").ok());
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(object));
        resources.set("XObject", Object::Dictionary(xobjects));
        self.set_page_resources(page_id, resources)
    }

    fn set_page_resources(&mut self, page_id: ObjectId, resources: Dictionary) -> Result<()> {
        let page_mut = self
            .doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_err)?;
        page_mut.set("Resources", Object::Dictionary(resources));
        Ok(())
    }
}

/// Resolve a dictionary that may be inline, a reference, or absent.
fn resolved_dict(doc: &Document, obj: Option<&Object>) -> Dictionary {
    match obj {
        Some(Object::Dictionary(d)) => d.clone(),
        Some(Object::Reference(id)) => doc
            .get_object(*id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

/// Flatten alpha onto white and encode as JPEG.
fn flatten_to_jpeg(placed: &PlacedImage) -> Result<Vec<u8>> {
    let (width, height) = (placed.image.width(), placed.image.height());
    let mut rgb = image::RgbImage::new(width, height);
    for (x, y, pixel) in placed.image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = f64::from(a) / 255.0;
        let blend = |c: u8| (f64::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut out = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| SatzwerkError::Template(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

/// Build a blank single-use template in memory. Test-only.
#[cfg(test)]
pub(crate) fn minimal_template_bytes(page_sizes: &[(f64, f64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    for (width, height) in page_sizes {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                0.into(), 0.into(), (*width).into(), (*height).into(),
            ],
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document as LoDocument, Object as LoObject, Stream as LoStream};
    use satzwerk_core::types::Rgb;

    #[test]
    fn template_reports_page_geometry() {
        let bytes = minimal_template_bytes(&[(768.0, 576.0), (612.0, 792.0)]);
        let template = Template::from_bytes(&bytes).expect("load");
        assert_eq!(template.page_count(), 2);
        let pages = template.page_geometries();
        assert_eq!(pages[0].number, 1);
        assert_eq!((pages[0].width, pages[0].height), (768.0, 576.0));
        assert_eq!((pages[1].width, pages[1].height), (612.0, 792.0));
        assert_eq!(template.fingerprint().len(), 64);

        // Same bytes, same fingerprint.
        let again = Template::from_bytes(&bytes).expect("reload");
        assert_eq!(again.fingerprint(), template.fingerprint());
    }

    #[test]
    fn inherited_media_box_is_resolved_through_parent() {
        // Pages node carries the MediaBox; page dict inherits it.
        let mut doc = LoDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(LoStream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            LoObject::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![LoObject::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 500.into(), 400.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("save");

        let template = Template::from_bytes(&bytes).expect("load");
        let page = template.page_geometries()[0];
        assert_eq!((page.width, page.height), (500.0, 400.0));
    }

    #[test]
    fn debug_formatting_summarizes_without_the_document() {
        let bytes = minimal_template_bytes(&[(768.0, 576.0)]);
        let template = Template::from_bytes(&bytes).expect("load");
        let rendered = format!("{template:?}");
        assert!(rendered.contains("fingerprint"));
        assert!(rendered.contains("768.0"));
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = Template::from_bytes(b"not a pdf").expect_err("must fail");
        assert!(matches!(err, SatzwerkError::Template(_)));
    }

    #[test]
    fn committing_text_grows_the_output() {
        let bytes = minimal_template_bytes(&[(768.0, 576.0)]);
        let template = Template::from_bytes(&bytes).expect("load");
        let mut instance = template.instance();
        instance
            .commit_lines(
                1,
                &[FittedLine {
                    text: "Hello".into(),
                    x: 100.0,
                    y: 111.0,
                    font_size: 11.0,
                    bold: false,
                    color: Rgb::BODY,
                }],
            )
            .expect("commit");
        let out = instance.finish().expect("finish");

        let filled = LoDocument::load_mem(&out).expect("reload");
        let pages = filled.get_pages();
        let page_id = pages[&1];
        let content = filled.get_page_content(page_id).expect("content");
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("Hello"));
        assert!(text.contains("SZ_F1"));
    }

    #[test]
    fn committing_to_a_missing_page_is_a_template_error() {
        let bytes = minimal_template_bytes(&[(768.0, 576.0)]);
        let template = Template::from_bytes(&bytes).expect("load");
        let mut instance = template.instance();
        let err = instance.commit_lines(7, &[]).err();
        // Empty line slices are a no-op even for missing pages.
        assert!(err.is_none());
        let err = instance
            .commit_lines(
                7,
                &[FittedLine {
                    text: "x".into(),
                    x: 0.0,
                    y: 10.0,
                    font_size: 10.0,
                    bold: false,
                    color: Rgb::BODY,
                }],
            )
            .expect_err("page 7 does not exist");
        assert!(matches!(err, SatzwerkError::Template(_)));
    }

    #[test]
    fn winansi_maps_punctuation_and_falls_back() {
        assert_eq!(winansi_bytes("abc"), b"abc".to_vec());
        assert_eq!(winansi_bytes("\u{2019}"), vec![0x92]);
        assert_eq!(winansi_bytes("→"), vec![b'?']);
        assert_eq!(winansi_bytes("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn instances_do_not_affect_the_template() {
        let bytes = minimal_template_bytes(&[(768.0, 576.0)]);
        let template = Template::from_bytes(&bytes).expect("load");
        let first = {
            let instance = template.instance();
            instance.finish().expect("finish")
        };
        let mut second_instance = template.instance();
        second_instance
            .commit_lines(
                1,
                &[FittedLine {
                    text: "mutation".into(),
                    x: 10.0,
                    y: 20.0,
                    font_size: 10.0,
                    bold: true,
                    color: Rgb::TITLE,
                }],
            )
            .expect("commit");
        let second = second_instance.finish().expect("finish");
        let third = {
            let instance = template.instance();
            instance.finish().expect("finish")
        };
        // The write to the second instance left later instances untouched.
        assert_eq!(first, third);
        assert_ne!(first, second);
    }
}
