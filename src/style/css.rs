//! Embedded stylesheet for the standalone HTML document.

use std::fmt::Write;

use super::policy::{StyleKey, StylePolicy, StyleRule};
use super::ToCss;

/// Body font stack when the paragraph rule sets none.
pub const DEFAULT_BODY_FONT: &str = "Arial, sans-serif";

/// Rules that do not depend on the policy.
const LAYOUT_RULES: &str = "\
pre { background-color: #f8f8f8; border: 1px solid #ddd; padding: 10px; border-radius: 5px; overflow-x: auto; }
code { background-color: #f8f8f8; padding: 2px 5px; border-radius: 3px; }
pre code { padding: 0; }
blockquote { background-color: #f9f9f9; border-left: 4px solid #ccc; padding: 10px 15px; margin: 0; }
table { border-collapse: collapse; width: 100%; margin: 20px 0; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
tr:nth-child(even) { background-color: #f9f9f9; }
img { max-width: 100%; height: auto; }
";

impl StylePolicy {
    /// CSS for the HTML shell, with fonts and accent colors from this policy.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();

        let body_font = self
            .rule(StyleKey::Paragraph)
            .and_then(|r| r.font_family.as_deref())
            .map(font_stack)
            .unwrap_or_else(|| DEFAULT_BODY_FONT.to_string());
        let _ = writeln!(
            css,
            "body {{ font-family: {body_font}; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }}"
        );

        write_rule(
            &mut css,
            "h1",
            self.rule(StyleKey::Title),
            "border-bottom: 1px solid #eee; padding-bottom: 10px;",
        );
        write_rule(
            &mut css,
            "h2, h3, h4, h5, h6",
            self.rule(StyleKey::Subheading),
            "margin-top: 30px;",
        );

        let mono = self
            .rule(StyleKey::CodeBlock)
            .and_then(|r| r.font_family.as_deref())
            .map(|family| format!("{}, monospace", quote_family(family)))
            .unwrap_or_else(|| "monospace".to_string());
        let _ = writeln!(css, "pre, code {{ font-family: {mono}; }}");

        write_rule(&mut css, "blockquote", self.rule(StyleKey::Blockquote), "");
        css.push_str(LAYOUT_RULES);
        css
    }
}

fn write_rule(css: &mut String, selector: &str, rule: Option<&StyleRule>, extra: &str) {
    let mut body = String::new();
    if let Some(rule) = rule {
        if let Some(color) = rule.font_color {
            body.push_str("color: ");
            color.to_css(&mut body);
            body.push_str("; ");
        }
        if let Some(family) = &rule.font_family {
            let _ = write!(body, "font-family: {}; ", font_stack(family));
        }
    }
    body.push_str(extra);

    let body = body.trim_end();
    if !body.is_empty() {
        let _ = writeln!(css, "{selector} {{ {body} }}");
    }
}

/// A single family name as a CSS font stack.
fn font_stack(family: &str) -> String {
    if family.contains(',') {
        family.to_string()
    } else {
        quote_family(family)
    }
}

fn quote_family(family: &str) -> String {
    if family.contains(' ') && !family.starts_with(['"', '\'']) {
        format!("\"{family}\"")
    } else {
        family.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, StyleRule};

    #[test]
    fn test_default_stylesheet_has_accent_colors() {
        let css = StylePolicy::default().stylesheet();
        assert!(css.contains("h1 { color: #2c3e50;"));
        assert!(css.contains("h2, h3, h4, h5, h6 { color: #3498db;"));
        assert!(css.contains("font-family: Arial, sans-serif"));
        assert!(css.contains("pre, code { font-family: \"Courier New\", monospace; }"));
    }

    #[test]
    fn test_stylesheet_follows_policy() {
        let policy = StylePolicy::default()
            .with_rule(
                StyleKey::Title,
                StyleRule::plain().with_color(Color::rgb(255, 0, 0)),
            )
            .with_rule(StyleKey::Paragraph, StyleRule::plain().with_font("Georgia"));
        let css = policy.stylesheet();
        assert!(css.contains("h1 { color: #ff0000;"));
        assert!(css.contains("body { font-family: Georgia;"));
    }

    #[test]
    fn test_empty_policy_still_renders_layout() {
        let css = StylePolicy::empty().stylesheet();
        assert!(css.contains("h1 { border-bottom"));
        assert!(css.contains("pre, code { font-family: monospace; }"));
        assert!(css.contains("table {"));
        assert!(!css.contains("blockquote {  }"));
    }

    #[test]
    fn test_quote_family() {
        assert_eq!(quote_family("Courier New"), "\"Courier New\"");
        assert_eq!(quote_family("Menlo"), "Menlo");
        assert_eq!(font_stack("Helvetica, Arial"), "Helvetica, Arial");
    }
}
