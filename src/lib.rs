//! # mdstyle
//!
//! Convert Markdown into styled HTML, PDF, and DOCX documents.
//!
//! ## Pipeline
//!
//! Every conversion runs the same stages:
//!
//! 1. **Parse**: Markdown becomes an HTML fragment ([`markdown`]).
//! 2. **Extract**: the fragment is flattened into an ordered sequence of
//!    [`StructuralElement`]s ([`extract_elements`]).
//! 3. **Build**: each element is paired with the [`StyleRule`] chosen by the
//!    [`StylePolicy`] ([`build_document`]).
//! 4. **Emit**: a backend writes the bytes of one format ([`export`]).
//!
//! The first three stages are format-independent and pure; only emitting
//! can fail per format (PDF rendering depends on an external engine).
//!
//! ## Quick Start
//!
//! ```
//! use mdstyle::{Converter, OutputFormat};
//!
//! let converter = Converter::new();
//! let docx = converter.convert("# Report\n\n- one\n- two\n", OutputFormat::Docx)?;
//! assert_eq!(docx.file_name("report"), "report.docx");
//! # Ok::<(), mdstyle::Error>(())
//! ```
//!
//! ## Inspecting the structure
//!
//! ```
//! use mdstyle::{StructuralElement, extract_elements};
//! use mdstyle::model::ListKind;
//!
//! let elements = extract_elements("<h2>Intro</h2><ol><li>first</li></ol>");
//! assert_eq!(
//!     elements,
//!     vec![
//!         StructuralElement::heading(2, "Intro"),
//!         StructuralElement::list_item(ListKind::Number, "first"),
//!     ]
//! );
//! ```

pub mod config;
pub mod convert;
pub mod document;
pub mod dom;
pub mod docx;
pub mod error;
pub mod export;
pub mod extract;
pub mod markdown;
pub mod model;
pub mod style;

pub use config::Config;
pub use convert::{Converter, Output, OutputFormat, Prepared};
pub use document::{StructuredDocument, StyledBlock, build_document};
pub use error::{Error, RenderError, Result};
pub use export::{CommandRenderer, HtmlConfig, PdfRenderer};
pub use extract::extract_elements;
pub use markdown::Extensions;
pub use model::StructuralElement;
pub use style::{StylePolicy, StyleRule};
