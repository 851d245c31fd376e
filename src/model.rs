//! Structural elements recognized in parsed Markdown.
//!
//! The element set is closed: every consumer matches exhaustively, so adding
//! a kind is a compile error everywhere it needs handling.

use serde::Serialize;

/// Lowest heading level.
pub const MIN_HEADING_LEVEL: u8 = 1;
/// Highest heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Whether a list item belongs to an unordered or ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

/// A typed unit of document content with its markup flattened to plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralElement {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    CodeBlock { text: String },
    ListItem { list: ListKind, text: String },
    Blockquote { text: String },
    /// Text found outside every recognized block.
    PlainText { text: String },
}

impl StructuralElement {
    /// Create a heading, clamping the level into `1..=6`.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        StructuralElement::Heading {
            level: level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        StructuralElement::Paragraph { text: text.into() }
    }

    pub fn code_block(text: impl Into<String>) -> Self {
        StructuralElement::CodeBlock { text: text.into() }
    }

    pub fn list_item(list: ListKind, text: impl Into<String>) -> Self {
        StructuralElement::ListItem {
            list,
            text: text.into(),
        }
    }

    pub fn blockquote(text: impl Into<String>) -> Self {
        StructuralElement::Blockquote { text: text.into() }
    }

    pub fn plain_text(text: impl Into<String>) -> Self {
        StructuralElement::PlainText { text: text.into() }
    }

    /// The element's plain text.
    pub fn text(&self) -> &str {
        match self {
            StructuralElement::Heading { text, .. }
            | StructuralElement::Paragraph { text }
            | StructuralElement::CodeBlock { text }
            | StructuralElement::ListItem { text, .. }
            | StructuralElement::Blockquote { text }
            | StructuralElement::PlainText { text } => text,
        }
    }

    /// The style lookup key for this element.
    pub fn kind(&self) -> ElementKind {
        match self {
            StructuralElement::Heading { .. } => ElementKind::Heading,
            StructuralElement::Paragraph { .. } => ElementKind::Paragraph,
            StructuralElement::CodeBlock { .. } => ElementKind::CodeBlock,
            StructuralElement::ListItem { list, .. } => ElementKind::ListItem(*list),
            StructuralElement::Blockquote { .. } => ElementKind::Blockquote,
            StructuralElement::PlainText { .. } => ElementKind::PlainText,
        }
    }

    /// Heading level, for headings only.
    pub fn level(&self) -> Option<u8> {
        match self {
            StructuralElement::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }
}

/// Element kind without its payload, used as a style key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Heading,
    Paragraph,
    CodeBlock,
    ListItem(ListKind),
    Blockquote,
    PlainText,
}
