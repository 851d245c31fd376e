//! Backend emitters.
//!
//! Every emitter implements [`Exporter`]: configuration lives in the struct
//! (`new()` / `with_config()`), and `export()` writes one finished document to
//! any `Write + Seek` destination.
//!
//! | Exporter | Reads | Output |
//! |---|---|---|
//! | [`HtmlExporter`] | HTML fragment + policy stylesheet | standalone UTF-8 HTML |
//! | [`DocxExporter`] | [`StructuredDocument`] | Office Open XML package |
//! | [`PdfExporter`] | standalone HTML | PDF bytes from a [`PdfRenderer`] |
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//!
//! use mdstyle::export::{ExportInput, Exporter, HtmlExporter};
//! use mdstyle::{StylePolicy, build_document, extract_elements};
//!
//! let fragment = "<h1>Title</h1>\n";
//! let policy = StylePolicy::default();
//! let document = build_document(extract_elements(fragment), &policy);
//! let input = ExportInput::new(fragment, &document, &policy);
//!
//! let mut out = Cursor::new(Vec::new());
//! HtmlExporter::new().export(&input, &mut out)?;
//! assert!(String::from_utf8_lossy(out.get_ref()).contains("<h1>Title</h1>"));
//! # Ok::<(), mdstyle::Error>(())
//! ```

use std::io::{Seek, Write};

use crate::document::StructuredDocument;
use crate::error::Result;
use crate::style::StylePolicy;

mod docx;
mod html;
mod pdf;

pub use docx::DocxExporter;
pub use html::{HtmlConfig, HtmlExporter};
pub use pdf::{CommandRenderer, DEFAULT_PDF_ARGS, DEFAULT_PDF_PROGRAM, PdfExporter, PdfRenderer};

/// What an emitter may read about one conversion.
///
/// All three views describe the same input; emitters pick the one their
/// backend needs.
#[derive(Debug, Clone, Copy)]
pub struct ExportInput<'a> {
    /// HTML fragment produced by the Markdown parser.
    pub fragment: &'a str,
    /// Styled element sequence.
    pub document: &'a StructuredDocument,
    pub policy: &'a StylePolicy,
}

impl<'a> ExportInput<'a> {
    pub fn new(
        fragment: &'a str,
        document: &'a StructuredDocument,
        policy: &'a StylePolicy,
    ) -> Self {
        Self {
            fragment,
            document,
            policy,
        }
    }
}

/// Trait for writing a converted document in one output format.
pub trait Exporter {
    /// Export the document to the provided writer.
    ///
    /// Emitters only write once the whole document has been produced, so a
    /// failure leaves `writer` untouched.
    fn export<W: Write + Seek>(&self, input: &ExportInput<'_>, writer: &mut W) -> Result<()>;
}
