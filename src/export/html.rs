//! Standalone HTML output.

use std::io::{Seek, Write};

use quick_xml::escape::escape;

use super::{ExportInput, Exporter};
use crate::error::Result;
use crate::style::StylePolicy;

/// Configuration for HTML export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlConfig {
    /// Document `<title>`; omitted when `None`.
    pub title: Option<String>,
    /// Replaces the content of the `<style>` block verbatim.
    ///
    /// Not validated. An empty string counts as not supplied.
    pub custom_css: Option<String>,
}

/// Exporter that wraps the HTML fragment in a styled document shell.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    config: HtmlConfig,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Build the standalone document around `fragment`.
    ///
    /// The fragment is inserted unchanged. The style block holds the custom
    /// CSS when one is configured, otherwise the policy's stylesheet.
    pub fn render(&self, fragment: &str, policy: &StylePolicy) -> String {
        let css = match self.config.custom_css.as_deref() {
            Some(css) if !css.is_empty() => css.to_string(),
            _ => policy.stylesheet(),
        };

        let mut html = String::with_capacity(fragment.len() + css.len() + 256);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        if let Some(title) = &self.config.title {
            html.push_str("<title>");
            html.push_str(&escape(title.as_str()));
            html.push_str("</title>\n");
        }
        html.push_str("<style>\n");
        html.push_str(&css);
        if !css.ends_with('\n') {
            html.push('\n');
        }
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(fragment);
        if !fragment.ends_with('\n') {
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

impl Exporter for HtmlExporter {
    fn export<W: Write + Seek>(&self, input: &ExportInput<'_>, writer: &mut W) -> Result<()> {
        let html = self.render(input.fragment, input.policy);
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_structure() {
        let html = HtmlExporter::new().render("<p>Hi</p>\n", &StylePolicy::default());
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<body>\n<p>Hi</p>\n</body>"));
        assert!(!html.contains("<title>"));
        assert!(html.contains("h1 { color: #2c3e50;"));
    }

    #[test]
    fn test_title_is_escaped() {
        let exporter = HtmlExporter::with_config(HtmlConfig {
            title: Some("Tom & Jerry".into()),
            ..Default::default()
        });
        let html = exporter.render("", &StylePolicy::default());
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
    }

    #[test]
    fn test_custom_css_replaces_style_content() {
        let exporter = HtmlExporter::with_config(HtmlConfig {
            custom_css: Some("body { color: red; }".into()),
            ..Default::default()
        });
        let html = exporter.render("<p>x</p>", &StylePolicy::default());
        assert!(html.contains("<style>\nbody { color: red; }\n</style>"));
        assert!(!html.contains("#2c3e50"));
    }

    #[test]
    fn test_invalid_custom_css_is_kept_verbatim() {
        let exporter = HtmlExporter::with_config(HtmlConfig {
            custom_css: Some("this is { not css".into()),
            ..Default::default()
        });
        let html = exporter.render("", &StylePolicy::default());
        assert!(html.contains("this is { not css"));
    }

    #[test]
    fn test_empty_custom_css_keeps_defaults() {
        let exporter = HtmlExporter::with_config(HtmlConfig {
            custom_css: Some(String::new()),
            ..Default::default()
        });
        let html = exporter.render("", &StylePolicy::default());
        assert!(html.contains("#2c3e50"));
    }
}
