//! Configuration file support.
//!
//! Settings are read from `mdstyle.toml`: an explicit path, or the file in
//! the working directory when one exists, or built-in defaults. Command-line
//! values are applied on top through [`CliSettings`].
//!
//! ```toml
//! format = "docx"
//!
//! [markdown]
//! toc = false
//!
//! [html]
//! title = "Notes"
//! css_file = "custom.css"
//!
//! [pdf]
//! program = "weasyprint"
//! args = ["-", "-"]
//!
//! [style]
//! title_color = "#2c3e50"
//! heading_color = "#3498db"
//! code_font = "Courier New"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::convert::{Converter, OutputFormat};
use crate::error::{Error, Result};
use crate::export::{CommandRenderer, DEFAULT_PDF_ARGS, DEFAULT_PDF_PROGRAM, HtmlConfig};
use crate::markdown::Extensions;
use crate::style::{Color, StyleKey, StylePolicy};

/// Configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "mdstyle.toml";

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct CliSettings {
    pub title: Option<String>,
    pub css_file: Option<PathBuf>,
    pub pdf_program: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format when none is given on the command line.
    pub format: Option<OutputFormat>,
    pub markdown: Extensions,
    pub html: HtmlSection,
    pub pdf: PdfSection,
    pub style: StyleSection,
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

/// `[html]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlSection {
    pub title: Option<String>,
    /// Stylesheet substituted verbatim into the HTML `<style>` block.
    /// Relative paths are resolved against the config file's directory.
    pub css_file: Option<PathBuf>,
}

/// `[pdf]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfSection {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for PdfSection {
    fn default() -> Self {
        Self {
            program: DEFAULT_PDF_PROGRAM.to_string(),
            args: DEFAULT_PDF_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// `[style]` section: overrides applied to the default style policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSection {
    /// Color of level-1 headings.
    pub title_color: Option<Color>,
    /// Color of level 2–6 headings.
    pub heading_color: Option<Color>,
    pub code_font: Option<String>,
    pub body_font: Option<String>,
}

impl Config {
    /// Load configuration with optional command-line overrides.
    ///
    /// # Errors
    ///
    /// Fails when an explicit `config_path` does not exist, or when the file
    /// cannot be read or parsed.
    pub fn load(config_path: Option<&Path>, cli: Option<&CliSettings>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "configuration file not found: {}",
                        path.display()
                    )));
                }
                Self::load_from_file(path)?
            }
            None => match Self::discover_in(Path::new(".")) {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(cli) = cli {
            config.apply_cli_settings(cli);
        }
        Ok(config)
    }

    /// `mdstyle.toml` inside `dir`, if present.
    pub fn discover_in(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILENAME);
        candidate.is_file().then_some(candidate)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        if let Some(css) = &mut config.html.css_file
            && css.is_relative()
        {
            *css = config_dir.join(&*css);
        }
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn apply_cli_settings(&mut self, cli: &CliSettings) {
        if let Some(title) = &cli.title {
            self.html.title = Some(title.clone());
        }
        if let Some(css_file) = &cli.css_file {
            self.html.css_file = Some(css_file.clone());
        }
        if let Some(program) = &cli.pdf_program {
            self.pdf.program.clone_from(program);
        }
    }

    /// Path of the file this configuration came from.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Default policy with the `[style]` overrides applied.
    pub fn style_policy(&self) -> StylePolicy {
        let mut policy = StylePolicy::default();
        let style = &self.style;

        let overrides = [
            (StyleKey::Title, style.title_color, None),
            (StyleKey::Subheading, style.heading_color, None),
            (StyleKey::CodeBlock, None, style.code_font.as_deref()),
            (StyleKey::Paragraph, None, style.body_font.as_deref()),
        ];
        for (key, color, font) in overrides {
            if color.is_none() && font.is_none() {
                continue;
            }
            let mut rule = policy
                .rule(key)
                .cloned()
                .unwrap_or_else(crate::style::StyleRule::plain);
            if let Some(color) = color {
                rule = rule.with_color(color);
            }
            if let Some(font) = font {
                rule = rule.with_font(font);
            }
            policy = policy.with_rule(key, rule);
        }
        policy
    }

    /// HTML settings; reads the custom stylesheet from disk.
    pub fn html_config(&self) -> Result<HtmlConfig> {
        let custom_css = match &self.html.css_file {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read stylesheet {}: {e}", path.display()))
            })?),
            None => None,
        };
        Ok(HtmlConfig {
            title: self.html.title.clone(),
            custom_css,
        })
    }

    pub fn renderer(&self) -> CommandRenderer {
        CommandRenderer::new(self.pdf.program.clone(), self.pdf.args.iter().cloned())
    }

    /// A converter wired with every setting in this configuration.
    pub fn converter(&self) -> Result<Converter> {
        Ok(Converter::with_renderer(self.renderer())
            .with_policy(self.style_policy())
            .with_extensions(self.markdown)
            .with_html_config(self.html_config()?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::model::ElementKind;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.format, None);
        assert_eq!(config.markdown, Extensions::default());
        assert_eq!(config.pdf.program, "weasyprint");
        assert_eq!(config.pdf.args, vec!["-", "-"]);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            r##"
format = "docx"

[markdown]
toc = false

[html]
title = "Notes"

[pdf]
program = "wkhtmltopdf"
args = ["-q", "-", "-"]

[style]
title_color = "#ff0000"
code_font = "Menlo"
"##,
        )
        .unwrap();

        assert_eq!(config.format, Some(OutputFormat::Docx));
        assert!(!config.markdown.toc);
        assert!(config.markdown.tables);
        assert_eq!(config.html.title.as_deref(), Some("Notes"));
        assert_eq!(config.renderer().args(), ["-q", "-", "-"]);

        let policy = config.style_policy();
        let title = policy.resolve(ElementKind::Heading, Some(1));
        assert_eq!(title.font_color, Some(Color::rgb(255, 0, 0)));
        let code = policy.resolve(ElementKind::CodeBlock, None);
        assert_eq!(code.font_family.as_deref(), Some("Menlo"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml("colour = \"red\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[markdown]\nsmartypants = true"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        assert!(Config::from_toml("[style]\ntitle_color = \"blue\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdstyle.toml")), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_css_file_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("custom.css"), "h1 { color: red; }").unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[html]\ncss_file = \"custom.css\"").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path(), Some(path.as_path()));
        let html = config.html_config().unwrap();
        assert_eq!(html.custom_css.as_deref(), Some("h1 { color: red; }"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[html]\ntitle = \"File\"\n[pdf]\nprogram = \"a\"").unwrap();

        let cli = CliSettings {
            title: Some("Flag".into()),
            pdf_program: Some("b".into()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&cli)).unwrap();
        assert_eq!(config.html.title.as_deref(), Some("Flag"));
        assert_eq!(config.renderer().program(), "b");
    }

    #[test]
    fn test_discover_in() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover_in(dir.path()), None);
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            Config::discover_in(dir.path()),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_missing_stylesheet_is_config_error() {
        let config = Config {
            html: HtmlSection {
                title: None,
                css_file: Some(PathBuf::from("/nonexistent/style.css")),
            },
            ..Default::default()
        };
        assert!(matches!(config.html_config(), Err(Error::Config(_))));
    }
}
