//! DOCX output from the structured document.

use std::io::{Seek, Write};

use super::{ExportInput, Exporter};
use crate::docx::DocxDocument;
use crate::document::StructuredDocument;
use crate::error::Result;
use crate::style::{StyleKey, StylePolicy};

/// Exporter that maps each styled block to one DOCX paragraph.
///
/// The block's paragraph style selects the named style; its color and font
/// become run properties.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
    title: Option<String>,
}

impl DocxExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `title` in the package properties.
    pub fn with_title(title: Option<String>) -> Self {
        Self { title }
    }

    /// Assemble the document without serializing it.
    pub fn build(&self, document: &StructuredDocument, policy: &StylePolicy) -> DocxDocument {
        let mut docx = DocxDocument::new();
        if let Some(title) = &self.title {
            docx.set_title(title.as_str());
        }
        if let Some(font) = policy
            .rule(StyleKey::Paragraph)
            .and_then(|r| r.font_family.as_deref())
        {
            docx.set_body_font(font);
        }

        for block in document {
            let style = &block.style;
            let paragraph = docx.add_paragraph("", style.paragraph_style);
            let run = paragraph.add_run(block.element.text());
            if let Some(color) = style.font_color {
                run.color(color);
            }
            if let Some(font) = &style.font_family {
                run.font_name(font);
            }
        }
        docx
    }
}

impl Exporter for DocxExporter {
    fn export<W: Write + Seek>(&self, input: &ExportInput<'_>, writer: &mut W) -> Result<()> {
        let bytes = self.build(input.document, input.policy).to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::model::{ListKind, StructuralElement};
    use crate::style::{Color, ParagraphStyle, StyleRule};

    fn sample() -> StructuredDocument {
        build_document(
            vec![
                StructuralElement::heading(1, "Title"),
                StructuralElement::heading(2, "Intro"),
                StructuralElement::code_block("print(\"hi\")"),
                StructuralElement::list_item(ListKind::Bullet, "a"),
                StructuralElement::list_item(ListKind::Number, "b"),
                StructuralElement::blockquote("quoted"),
            ],
            &StylePolicy::default(),
        )
    }

    #[test]
    fn test_blocks_become_paragraphs_in_order() {
        let docx = DocxExporter::new().build(&sample(), &StylePolicy::default());
        let styles: Vec<_> = docx.paragraphs().iter().map(|p| p.style()).collect();
        assert_eq!(
            styles,
            vec![
                ParagraphStyle::Title,
                ParagraphStyle::Heading(2),
                ParagraphStyle::Normal,
                ParagraphStyle::ListBullet,
                ParagraphStyle::ListNumber,
                ParagraphStyle::Quote,
            ]
        );
        let texts: Vec<_> = docx.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts[2], "print(\"hi\")");
    }

    #[test]
    fn test_heading_colors_and_code_font() {
        let xml = DocxExporter::new()
            .build(&sample(), &StylePolicy::default())
            .document_xml();
        assert!(xml.contains("<w:color w:val=\"2C3E50\"/>"));
        assert!(xml.contains("<w:color w:val=\"3498DB\"/>"));
        assert!(xml.contains("w:ascii=\"Courier New\""));
    }

    #[test]
    fn test_policy_colors_flow_into_runs() {
        let policy = StylePolicy::default().with_rule(
            StyleKey::Blockquote,
            StyleRule::plain()
                .with_color(Color::rgb(1, 2, 3))
                .with_paragraph_style(ParagraphStyle::Quote),
        );
        let document = build_document(vec![StructuralElement::blockquote("q")], &policy);
        let xml = DocxExporter::new().build(&document, &policy).document_xml();
        assert!(xml.contains("<w:color w:val=\"010203\"/>"));
    }

    #[test]
    fn test_empty_document_exports() {
        let policy = StylePolicy::default();
        let document = StructuredDocument::default();
        let input = ExportInput::new("", &document, &policy);
        let mut out = std::io::Cursor::new(Vec::new());
        DocxExporter::new().export(&input, &mut out).unwrap();
        assert!(out.get_ref().starts_with(b"PK"));
    }
}
