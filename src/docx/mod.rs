//! Minimal Office Open XML (DOCX) writer.
//!
//! Enough of WordprocessingML to carry styled paragraphs: a body of
//! paragraphs and runs, a style sheet covering every [`ParagraphStyle`],
//! numbering definitions for the list styles, and package metadata.
//!
//! # Example
//!
//! ```
//! use mdstyle::docx::DocxDocument;
//! use mdstyle::style::{Color, ParagraphStyle};
//!
//! let mut doc = DocxDocument::new();
//! doc.add_paragraph("", ParagraphStyle::Title)
//!     .add_run("Title")
//!     .color(Color::rgb(44, 62, 80));
//! doc.add_paragraph("Body text.", ParagraphStyle::Normal);
//!
//! let bytes = doc.to_bytes()?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), mdstyle::Error>(())
//! ```

mod paragraph;
mod parts;

pub use paragraph::{Paragraph, Run};

use std::io::{Cursor, Seek, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;
use crate::style::{DEFAULT_BODY_FONT, ParagraphStyle};

/// Body font when none is set.
const DEFAULT_FONT: &str = "Arial";

/// A word-processing document being assembled in memory.
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    paragraphs: Vec<Paragraph>,
    title: Option<String>,
    body_font: Option<String>,
}

impl DocxDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title stored in the package properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the default font of the `Normal` style.
    pub fn set_body_font(&mut self, family: impl Into<String>) {
        self.body_font = Some(family.into());
    }

    /// Append a paragraph. A non-empty `text` becomes its first run.
    pub fn add_paragraph(&mut self, text: &str, style: ParagraphStyle) -> &mut Paragraph {
        let mut paragraph = Paragraph::new(style);
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        self.paragraphs.push(paragraph);
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// `word/document.xml`.
    pub fn document_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.paragraphs.len() * 128);
        xml.push_str(parts::XML_DECLARATION);
        xml.push_str("<w:document xmlns:w=\"");
        xml.push_str(parts::W_NAMESPACE);
        xml.push_str("\"><w:body>");
        for paragraph in &self.paragraphs {
            paragraph.to_xml(&mut xml);
        }
        xml.push_str(
            "<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
        );
        xml.push_str("</w:body></w:document>");
        xml
    }

    /// Write the package to any [`Write`] + [`Seek`] destination.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let body_font = self
            .body_font
            .as_deref()
            .map(first_family)
            .unwrap_or(DEFAULT_FONT);

        let entries = [
            ("[Content_Types].xml", parts::content_types()),
            ("_rels/.rels", parts::package_rels()),
            ("docProps/core.xml", parts::core_properties(self.title.as_deref())),
            ("docProps/app.xml", parts::app_properties()),
            ("word/document.xml", self.document_xml()),
            ("word/styles.xml", parts::styles(body_font)),
            ("word/numbering.xml", parts::numbering()),
            ("word/_rels/document.xml.rels", parts::document_rels()),
        ];
        for (path, content) in entries {
            zip.start_file(path, options)?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()?;
        tracing::debug!(paragraphs = self.paragraphs.len(), "wrote docx package");
        Ok(())
    }

    /// Serialize the package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// First family of a CSS-style font stack, unquoted.
fn first_family(stack: &str) -> &str {
    let first = stack.split(',').next().unwrap_or(DEFAULT_BODY_FONT).trim();
    first.trim_matches(|c| c == '"' || c == '\'')
}
