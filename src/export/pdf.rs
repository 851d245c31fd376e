//! PDF output through an external HTML rendering engine.

use std::io::{self, Seek, Write};
use std::process::{Command, Stdio};

use super::{ExportInput, Exporter, HtmlConfig, HtmlExporter};
use crate::error::{RenderError, Result};

/// Engine started by [`CommandRenderer::default`].
pub const DEFAULT_PDF_PROGRAM: &str = "weasyprint";
/// Read HTML from stdin, write PDF to stdout.
pub const DEFAULT_PDF_ARGS: [&str; 2] = ["-", "-"];

/// Renders a standalone HTML document to PDF bytes.
///
/// Implementations are shared between concurrent conversions, so they must
/// be `Send + Sync`. Any failure is reported as a [`RenderError`]; it only
/// affects the PDF format of that one request.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError>;
}

impl<R: PdfRenderer + ?Sized> PdfRenderer for &R {
    fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
        (**self).render(html)
    }
}

/// [`PdfRenderer`] that pipes HTML through an external program.
///
/// The program receives the document on stdin and must write the PDF to
/// stdout. The default is `weasyprint - -`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PDF_PROGRAM, DEFAULT_PDF_ARGS)
    }
}

impl CommandRenderer {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl PdfRenderer for CommandRenderer {
    fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
        tracing::debug!(program = %self.program, args = ?self.args, "starting pdf renderer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RenderError::Io(io::Error::other("renderer stdin was not captured")))?;

        // Feed stdin from a second thread so a large document cannot fill
        // the stdout pipe while we are still writing.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(html.as_bytes()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("renderer stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if let Err(e) = written
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(RenderError::Io(e));
        }
        if !output.stdout.starts_with(b"%PDF") {
            return Err(RenderError::InvalidOutput(format!(
                "expected a %PDF header, got {} bytes without one",
                output.stdout.len()
            )));
        }

        tracing::debug!(bytes = output.stdout.len(), "pdf renderer finished");
        Ok(output.stdout)
    }
}

/// Exporter that renders the standalone HTML document to PDF.
///
/// The HTML uses the policy stylesheet; custom CSS is an HTML-only setting.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter<R = CommandRenderer> {
    renderer: R,
    html: HtmlExporter,
}

impl PdfExporter<CommandRenderer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: PdfRenderer> PdfExporter<R> {
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            renderer,
            html: HtmlExporter::new(),
        }
    }

    /// Set the `<title>` of the HTML handed to the renderer.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.html = HtmlExporter::with_config(HtmlConfig {
            title,
            custom_css: None,
        });
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render the document to PDF bytes.
    pub fn render(&self, input: &ExportInput<'_>) -> Result<Vec<u8>> {
        let html = self.html.render(input.fragment, input.policy);
        Ok(self.renderer.render(&html)?)
    }
}

impl<R: PdfRenderer> Exporter for PdfExporter<R> {
    fn export<W: Write + Seek>(&self, input: &ExportInput<'_>, writer: &mut W) -> Result<()> {
        let bytes = self.render(input)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::document::StructuredDocument;
    use crate::error::Error;
    use crate::style::StylePolicy;

    /// Records the HTML it was given and returns a canned PDF.
    #[derive(Default)]
    struct RecordingRenderer {
        seen: Mutex<Vec<String>>,
    }

    impl PdfRenderer for RecordingRenderer {
        fn render(&self, html: &str) -> std::result::Result<Vec<u8>, RenderError> {
            self.seen.lock().unwrap().push(html.to_string());
            Ok(b"%PDF-1.7 test".to_vec())
        }
    }

    #[test]
    fn test_exporter_passes_standalone_html() {
        let policy = StylePolicy::default();
        let document = StructuredDocument::default();
        let input = ExportInput::new("<p>Hello</p>\n", &document, &policy);
        let exporter =
            PdfExporter::with_renderer(RecordingRenderer::default()).with_title(Some("T".into()));

        let bytes = exporter.render(&input).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let seen = exporter.renderer().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("<!DOCTYPE html>"));
        assert!(seen[0].contains("<title>T</title>"));
        assert!(seen[0].contains("<p>Hello</p>"));
    }

    #[test]
    fn test_default_command() {
        let renderer = CommandRenderer::default();
        assert_eq!(renderer.program(), "weasyprint");
        assert_eq!(renderer.args(), ["-", "-"]);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let renderer = CommandRenderer::new("mdstyle-no-such-renderer", Vec::<String>::new());
        let err = renderer.render("<p>x</p>").unwrap_err();
        assert!(matches!(err, RenderError::Unavailable { .. }));
    }

    #[test]
    fn test_render_error_converts() {
        let renderer = CommandRenderer::new("mdstyle-no-such-renderer", Vec::<String>::new());
        let policy = StylePolicy::default();
        let document = StructuredDocument::default();
        let input = ExportInput::new("", &document, &policy);
        let err = PdfExporter::with_renderer(renderer)
            .render(&input)
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(err.is_render());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_stderr() {
        let renderer = CommandRenderer::new(
            "sh",
            ["-c", "cat > /dev/null; echo 'font missing' >&2; exit 3"],
        );
        match renderer.render("<p>x</p>").unwrap_err() {
            RenderError::Failed { stderr, .. } => assert_eq!(stderr, "font missing"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_pdf_output_is_rejected() {
        let renderer = CommandRenderer::new("cat", Vec::<String>::new());
        let err = renderer.render("<p>not a pdf</p>").unwrap_err();
        assert!(matches!(err, RenderError::InvalidOutput(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_program() {
        let renderer = CommandRenderer::new("sh", ["-c", "cat > /dev/null; echo '%PDF-1.7'"]);
        let bytes = renderer.render("<p>x</p>").unwrap();
        assert_eq!(bytes, b"%PDF-1.7\n");
    }
}
