//! Paragraphs and runs of a WordprocessingML body.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::style::{Color, ParagraphStyle};

/// A run of text with character formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    text: String,
    color: Option<Color>,
    font_name: Option<String>,
}

impl Run {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: None,
            font_name: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the text color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = Some(color);
        self
    }

    /// Set the font family (ASCII and high-ANSI ranges).
    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.font_name = Some(name.to_string());
        self
    }

    fn has_properties(&self) -> bool {
        self.color.is_some() || self.font_name.is_some()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:r>");

        if self.has_properties() {
            xml.push_str("<w:rPr>");
            if let Some(font) = &self.font_name {
                let font = escape(font.as_str());
                let _ = write!(
                    xml,
                    "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>"
                );
            }
            if let Some(color) = self.color {
                let _ = write!(xml, "<w:color w:val=\"{}\"/>", color.to_hex());
            }
            xml.push_str("</w:rPr>");
        }

        write_text(xml, &self.text);
        xml.push_str("</w:r>");
    }
}

/// A paragraph: a style and a sequence of runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    style: ParagraphStyle,
    runs: Vec<Run>,
}

impl Paragraph {
    pub(crate) fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            runs: Vec::new(),
        }
    }

    pub fn style(&self) -> ParagraphStyle {
        self.style
    }

    /// Append a run and return it for formatting.
    pub fn add_run(&mut self, text: &str) -> &mut Run {
        self.runs.push(Run::new(text));
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:p>");
        if self.style != ParagraphStyle::Normal {
            let _ = write!(
                xml,
                "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
                self.style.style_id()
            );
        }
        for run in &self.runs {
            run.to_xml(xml);
        }
        xml.push_str("</w:p>");
    }
}

/// Write run content, mapping `\n` to `<w:br/>` and `\t` to `<w:tab/>`.
///
/// Characters that XML 1.0 cannot represent are dropped.
fn write_text(xml: &mut String, text: &str) {
    let mut segment = String::new();
    for c in text.chars() {
        match c {
            '\n' => {
                flush_segment(xml, &mut segment);
                xml.push_str("<w:br/>");
            }
            '\t' => {
                flush_segment(xml, &mut segment);
                xml.push_str("<w:tab/>");
            }
            '\r' => {}
            c if is_xml_char(c) => segment.push(c),
            _ => {}
        }
    }
    flush_segment(xml, &mut segment);
}

fn flush_segment(xml: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let _ = write!(
        xml,
        "<w:t xml:space=\"preserve\">{}</w:t>",
        escape(segment.as_str())
    );
    segment.clear();
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_xml(run: &Run) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml);
        xml
    }

    #[test]
    fn test_plain_run() {
        let mut para = Paragraph::new(ParagraphStyle::Normal);
        para.add_run("Hello & <world>");
        let mut xml = String::new();
        para.to_xml(&mut xml);
        assert_eq!(
            xml,
            "<w:p><w:r><w:t xml:space=\"preserve\">Hello &amp; &lt;world&gt;</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn test_styled_paragraph_and_run_properties() {
        let mut para = Paragraph::new(ParagraphStyle::Heading(2));
        para.add_run("Intro")
            .color(Color::rgb(52, 152, 219))
            .font_name("Courier New");
        let mut xml = String::new();
        para.to_xml(&mut xml);
        assert!(xml.starts_with("<w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr>"));
        assert!(xml.contains("<w:rFonts w:ascii=\"Courier New\""));
        assert!(xml.contains("<w:color w:val=\"3498DB\"/>"));
        assert_eq!(para.text(), "Intro");
    }

    #[test]
    fn test_newlines_and_tabs() {
        let run = Run::new("a\n\tb\r\n");
        assert_eq!(
            run_xml(&run),
            "<w:r><w:t xml:space=\"preserve\">a</w:t><w:br/><w:tab/>\
             <w:t xml:space=\"preserve\">b</w:t><w:br/></w:r>"
        );
    }

    #[test]
    fn test_invalid_xml_chars_are_dropped() {
        let run = Run::new("a\u{0}b\u{1B}c\u{FFFF}");
        assert_eq!(
            run_xml(&run),
            "<w:r><w:t xml:space=\"preserve\">abc</w:t></w:r>"
        );
    }

    #[test]
    fn test_empty_run() {
        assert_eq!(run_xml(&Run::new("")), "<w:r></w:r>");
    }
}
