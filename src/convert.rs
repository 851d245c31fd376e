//! The conversion pipeline.
//!
//! One request moves through `Parsed → Extracted → Built → Emitted`:
//! Markdown becomes an HTML fragment, the fragment becomes structural
//! elements, the elements are paired with styles, and an emitter produces
//! the bytes of one output format. The first three stages run once per
//! request ([`Converter::prepare`]); emitting can then be repeated for each
//! requested format without re-parsing.
//!
//! A [`Converter`] holds only immutable configuration, so a single instance
//! can serve concurrent requests.
//!
//! # Example
//!
//! ```
//! use mdstyle::{Converter, OutputFormat};
//!
//! let converter = Converter::new();
//! let output = converter.convert("# Title\n\nHello world.", OutputFormat::Html)?;
//! let html = String::from_utf8(output.bytes).unwrap();
//! assert!(html.contains("<h1 id=\"title\">Title</h1>"));
//! # Ok::<(), mdstyle::Error>(())
//! ```

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use serde::Deserialize;

use crate::document::{StructuredDocument, build_document};
use crate::error::{Error, Result};
use crate::export::{
    CommandRenderer, DocxExporter, ExportInput, Exporter, HtmlConfig, HtmlExporter, PdfExporter,
    PdfRenderer,
};
use crate::extract::extract_elements;
use crate::markdown::{self, Extensions};
use crate::style::StylePolicy;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Pdf,
    Docx,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Html, OutputFormat::Pdf, OutputFormat::Docx];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Html => "text/html",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A finished document in one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl Output {
    /// `stem.ext` for this output's format.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// The format-independent result of one request: parsed, extracted and
/// built, ready to emit.
#[derive(Debug, Clone)]
pub struct Prepared<'c, R = CommandRenderer> {
    converter: &'c Converter<R>,
    fragment: String,
    document: StructuredDocument,
}

impl<R: PdfRenderer> Prepared<'_, R> {
    /// HTML fragment from the Markdown parser.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn document(&self) -> &StructuredDocument {
        &self.document
    }

    /// Emit one format. Bytes are only returned when the emitter succeeded.
    pub fn emit(&self, format: OutputFormat) -> Result<Output> {
        let converter = self.converter;
        let input = ExportInput::new(&self.fragment, &self.document, &converter.policy);
        let mut buffer = Cursor::new(Vec::new());

        match format {
            OutputFormat::Html => converter.html.export(&input, &mut buffer)?,
            OutputFormat::Docx => converter.docx.export(&input, &mut buffer)?,
            OutputFormat::Pdf => converter.pdf.export(&input, &mut buffer)?,
        }

        let bytes = buffer.into_inner();
        tracing::info!(%format, bytes = bytes.len(), "conversion complete");
        Ok(Output { format, bytes })
    }
}

/// Converts Markdown to styled documents.
///
/// Holds the style policy, parser extensions, HTML settings and the PDF
/// renderer. Each call works on fresh per-request state.
#[derive(Debug, Clone)]
pub struct Converter<R = CommandRenderer> {
    policy: StylePolicy,
    extensions: Extensions,
    html: HtmlExporter,
    docx: DocxExporter,
    pdf: PdfExporter<R>,
}

impl Default for Converter<CommandRenderer> {
    fn default() -> Self {
        Self::with_renderer(CommandRenderer::default())
    }
}

impl Converter<CommandRenderer> {
    /// Default policy, all extensions, `weasyprint` for PDF.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: PdfRenderer> Converter<R> {
    /// A converter that renders PDF with `renderer`.
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            policy: StylePolicy::default(),
            extensions: Extensions::default(),
            html: HtmlExporter::new(),
            docx: DocxExporter::new(),
            pdf: PdfExporter::with_renderer(renderer),
        }
    }

    pub fn with_policy(mut self, policy: StylePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// HTML shell settings. The title is also used for the DOCX and PDF
    /// metadata; custom CSS only affects HTML.
    pub fn with_html_config(mut self, config: HtmlConfig) -> Self {
        self.docx = DocxExporter::with_title(config.title.clone());
        self.pdf = self.pdf.with_title(config.title.clone());
        self.html = HtmlExporter::with_config(config);
        self
    }

    pub fn policy(&self) -> &StylePolicy {
        &self.policy
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Run the format-independent stages on decoded Markdown.
    pub fn prepare(&self, markdown: &str) -> Result<Prepared<'_, R>> {
        let fragment = markdown::parse(markdown, &self.extensions)?;
        Ok(self.prepare_fragment(fragment))
    }

    /// Run the format-independent stages on raw Markdown bytes.
    pub fn prepare_bytes(&self, bytes: &[u8]) -> Result<Prepared<'_, R>> {
        let fragment = markdown::parse_bytes(bytes, &self.extensions)?;
        Ok(self.prepare_fragment(fragment))
    }

    fn prepare_fragment(&self, fragment: String) -> Prepared<'_, R> {
        let elements = extract_elements(&fragment);
        let document = build_document(elements, &self.policy);
        Prepared {
            converter: self,
            fragment,
            document,
        }
    }

    /// Convert Markdown to one format.
    pub fn convert(&self, markdown: &str, format: OutputFormat) -> Result<Output> {
        self.prepare(markdown)?.emit(format)
    }

    /// Convert Markdown to several formats.
    ///
    /// Formats are emitted independently: a failure in one (typically PDF
    /// rendering) does not affect the others. A parse failure is reported
    /// for every requested format.
    pub fn convert_all(
        &self,
        markdown: &str,
        formats: &[OutputFormat],
    ) -> Vec<(OutputFormat, Result<Output>)> {
        self.emit_all(self.prepare(markdown), formats)
    }

    /// [`convert_all`](Self::convert_all) on raw bytes.
    pub fn convert_all_bytes(
        &self,
        bytes: &[u8],
        formats: &[OutputFormat],
    ) -> Vec<(OutputFormat, Result<Output>)> {
        self.emit_all(self.prepare_bytes(bytes), formats)
    }

    fn emit_all(
        &self,
        prepared: Result<Prepared<'_, R>>,
        formats: &[OutputFormat],
    ) -> Vec<(OutputFormat, Result<Output>)> {
        match prepared {
            Ok(prepared) => formats
                .iter()
                .map(|&format| {
                    let result = prepared.emit(format);
                    if let Err(e) = &result {
                        tracing::warn!(%format, error = %e, "conversion failed");
                    }
                    (format, result)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "markdown could not be parsed");
                let message = e.to_string();
                formats
                    .iter()
                    .map(|&format| (format, Err(Error::Parse(message.clone()))))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    struct FailingRenderer;

    impl PdfRenderer for FailingRenderer {
        fn render(&self, _html: &str) -> std::result::Result<Vec<u8>, RenderError> {
            Err(RenderError::Failed {
                status: "exit status: 1".into(),
                stderr: "engine crashed".into(),
            })
        }
    }

    struct FakePdf;

    impl PdfRenderer for FakePdf {
        fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
            let mut bytes = b"%PDF-1.7\n".to_vec();
            bytes.extend_from_slice(html.as_bytes());
            Ok(bytes)
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!(" pdf ".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("Docx".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert!(matches!(
            "odt".parse::<OutputFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Docx.to_string(), "docx");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
        let output = Output {
            format: OutputFormat::Html,
            bytes: Vec::new(),
        };
        assert_eq!(output.file_name("notes"), "notes.html");
    }

    #[test]
    fn test_prepare_runs_once_for_all_formats() {
        let converter = Converter::with_renderer(FakePdf);
        let prepared = converter.prepare("# Title\n\nBody.").unwrap();
        assert_eq!(prepared.document().len(), 2);

        let html = prepared.emit(OutputFormat::Html).unwrap();
        let pdf = prepared.emit(OutputFormat::Pdf).unwrap();
        let docx = prepared.emit(OutputFormat::Docx).unwrap();
        assert!(html.bytes.starts_with(b"<!DOCTYPE html>"));
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert!(docx.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_pdf_failure_is_isolated() {
        let converter = Converter::with_renderer(FailingRenderer);
        let results = converter.convert_all(
            "# Title",
            &[OutputFormat::Html, OutputFormat::Pdf, OutputFormat::Docx],
        );

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.as_ref().is_err_and(Error::is_render));
        assert!(results[2].1.is_ok());
    }

    #[test]
    fn test_parse_failure_reported_for_every_format() {
        let converter = Converter::with_renderer(FakePdf);
        let results = converter.convert_all_bytes(b"\xFF\xFE\xFF", &[]);
        assert!(results.is_empty());

        let results =
            converter.convert_all_bytes(b"ok \xC3\x28", &[OutputFormat::Html, OutputFormat::Docx]);
        assert_eq!(results.len(), 2);
        assert!(
            results
                .iter()
                .all(|(_, r)| matches!(r, Err(Error::Parse(_))))
        );
    }

    #[test]
    fn test_custom_css_is_html_only() {
        let converter = Converter::with_renderer(FakePdf).with_html_config(HtmlConfig {
            title: Some("Doc".into()),
            custom_css: Some("p { color: green; }".into()),
        });
        let prepared = converter.prepare("text").unwrap();

        let html = String::from_utf8(prepared.emit(OutputFormat::Html).unwrap().bytes).unwrap();
        assert!(html.contains("p { color: green; }"));

        let pdf = String::from_utf8(prepared.emit(OutputFormat::Pdf).unwrap().bytes).unwrap();
        assert!(!pdf.contains("p { color: green; }"));
        assert!(pdf.contains("<title>Doc</title>"));
    }

    #[test]
    fn test_empty_input_yields_empty_documents() {
        let converter = Converter::with_renderer(FakePdf);
        let prepared = converter.prepare("").unwrap();
        assert!(prepared.document().is_empty());
        assert!(prepared.emit(OutputFormat::Docx).is_ok());
        assert!(prepared.emit(OutputFormat::Html).is_ok());
    }

    #[test]
    fn test_converter_is_shared_across_threads() {
        let converter = Converter::with_renderer(FailingRenderer);
        std::thread::scope(|scope| {
            let pdf = scope.spawn(|| converter.convert("# A", OutputFormat::Pdf));
            let html = scope.spawn(|| converter.convert("# B", OutputFormat::Html));

            assert!(pdf.join().unwrap().is_err_and(|e| e.is_render()));
            let html = html.join().unwrap().unwrap();
            assert!(String::from_utf8_lossy(&html.bytes).contains(">B</h1>"));
        });
    }
}
