//! Error types for mdstyle operations.

use thiserror::Error;

/// Errors that can occur while converting a document.
///
/// Extraction, style resolution, and document building are total and never
/// produce an error. Failures come from decoding the input, from emitting a
/// particular output format, or from the surrounding shell (files, config).
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Markdown parse error: {0}")]
    Parse(String),

    #[error("PDF rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Whether this error came from the external PDF rendering engine.
    ///
    /// Render failures are scoped to the PDF format; callers can retry the
    /// same input with another format.
    pub fn is_render(&self) -> bool {
        matches!(self, Error::Render(_))
    }
}

/// Failures reported by a [`PdfRenderer`](crate::export::PdfRenderer).
#[derive(Error, Debug)]
pub enum RenderError {
    /// The rendering engine could not be started (not installed, not on `PATH`).
    #[error("rendering engine `{program}` is unavailable: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported a failure.
    #[error("rendering engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The engine succeeded but did not produce a PDF.
    #[error("rendering engine produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("I/O error while talking to rendering engine: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_are_distinguishable() {
        let err = Error::from(RenderError::InvalidOutput("empty".into()));
        assert!(err.is_render());
        assert!(err.to_string().contains("PDF rendering failed"));

        let err = Error::Parse("invalid UTF-8".into());
        assert!(!err.is_render());
    }

    #[test]
    fn test_unavailable_message_names_program() {
        let err = RenderError::Unavailable {
            program: "weasyprint".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("weasyprint"));
    }
}
