//! Minimal paginated PDF layout on top of `lopdf`.
//!
//! Content flows top to bottom on A4 pages; a line or image that does not
//! fit below the cursor starts a new page. Text uses the standard Helvetica
//! fonts, so only WinAnsi characters can be shown; anything else is
//! replaced by `?`.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::debug;

/// A4 in PDF points.
pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;
pub const MARGIN: i64 = 50;

/// Approximate Helvetica advance, in thousandths of the font size.
const AVERAGE_GLYPH_WIDTH: i64 = 520;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Default)]
struct Page {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

/// A document under construction.
pub struct ReportDocument {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<Page>,
    cursor: i64,
    image_count: usize,
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: vec![Page::default()],
            cursor: PAGE_HEIGHT - MARGIN,
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Starts a new page and moves the cursor to its top.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Moves the cursor down by `points`.
    pub fn space(&mut self, points: i64) {
        self.cursor -= points;
    }

    /// Writes one line of text, wrapping at the right margin.
    pub fn text(&mut self, text: &str, style: FontStyle, size: i64, align: Align) {
        let leading = size * 3 / 2;
        for line in wrap(text, size, PAGE_WIDTH - 2 * MARGIN) {
            self.ensure_room(leading);
            self.cursor -= leading;
            let x = match align {
                Align::Left => MARGIN,
                Align::Center => ((PAGE_WIDTH - text_width(&line, size)) / 2).max(MARGIN),
            };
            let y = self.cursor + leading - size;
            self.current().operations.extend([
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![style.resource_name().into(), Object::Integer(size)],
                ),
                Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
                Operation::new("Tj", vec![encode_text(&line)]),
                Operation::new("ET", vec![]),
            ]);
        }
    }

    /// Places an RGB image `width` points wide, keeping its aspect ratio.
    pub fn image(&mut self, image: &RgbImage, width: i64) {
        let (px_width, px_height) = image.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }
        let width = width.min(PAGE_WIDTH - 2 * MARGIN);
        let height = width * i64::from(px_height) / i64::from(px_width);
        self.ensure_room(height);
        self.cursor -= height;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(px_width),
                "Height" => i64::from(px_height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            image.as_raw().clone(),
        );
        let image_id = self.doc.add_object(stream);
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let x = (PAGE_WIDTH - width) / 2;
        let y = self.cursor;
        let page = self.current();
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height),
                    Object::Integer(x),
                    Object::Integer(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        page.images.push((name, image_id));
    }

    fn ensure_room(&mut self, height: i64) {
        let page_has_content = self
            .pages
            .last()
            .is_some_and(|page| !page.operations.is_empty());
        if self.cursor - height < MARGIN && page_has_content {
            self.new_page();
        }
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Assembles the page tree and writes the file. Returns the page count.
    pub fn save(mut self, path: &Path) -> Result<usize> {
        let regular_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content {
                operations: page.operations,
            };
            let encoded = content.encode().context("Failed to encode page content")?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

            let mut xobjects = Dictionary::new();
            for (name, id) in &page.images {
                xobjects.set(name.as_bytes().to_vec(), Object::Reference(*id));
            }
            let resources = dictionary! {
                "Font" => dictionary! {
                    "F1" => regular_id,
                    "F2" => bold_id,
                },
                "XObject" => xobjects,
            };
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory: {}", parent.display())
            })?;
        }
        self.doc
            .save(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        debug!(path = %path.display(), pages = page_count, "pdf written");
        Ok(page_count)
    }
}

/// Approximate rendered width in points.
fn text_width(text: &str, size: i64) -> i64 {
    text.chars().count() as i64 * size * AVERAGE_GLYPH_WIDTH / 1000
}

/// Greedy word wrap to `width` points; long words are split.
fn wrap(text: &str, size: i64, width: i64) -> Vec<String> {
    let max_chars = (width * 1000 / (size.max(1) * AVERAGE_GLYPH_WIDTH)).max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes text for a WinAnsi Type1 font.
pub fn encode_text(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{2013}' | '\u{2014}' => b'-',
            '\u{2018}' | '\u{2019}' => b'\'',
            '\u{201C}' | '\u{201D}' => b'"',
            '\u{2022}' => 0x95,
            '\u{20AC}' => 0x80,
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            _ => b'?',
        })
        .collect()
}
