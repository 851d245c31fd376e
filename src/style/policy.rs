//! The style lookup table.

use std::collections::HashMap;

use crate::model::{ElementKind, ListKind, MAX_HEADING_LEVEL, MIN_HEADING_LEVEL};

use super::Color;

/// Accent color of level-1 headings (the document title).
pub const TITLE_COLOR: Color = Color::rgb(44, 62, 80);
/// Accent color of level 2–6 headings.
pub const SUBHEADING_COLOR: Color = Color::rgb(52, 152, 219);
/// Font used for code blocks.
pub const MONOSPACE_FONT: &str = "Courier New";

/// Named paragraph style, shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParagraphStyle {
    Normal,
    Title,
    Heading(u8),
    ListBullet,
    ListNumber,
    Quote,
}

impl ParagraphStyle {
    /// WordprocessingML style id (`w:styleId`).
    pub fn style_id(&self) -> String {
        match self {
            ParagraphStyle::Normal => "Normal".into(),
            ParagraphStyle::Title => "Title".into(),
            ParagraphStyle::Heading(level) => format!("Heading{level}"),
            ParagraphStyle::ListBullet => "ListBullet".into(),
            ParagraphStyle::ListNumber => "ListNumber".into(),
            ParagraphStyle::Quote => "Quote".into(),
        }
    }

    /// Human-readable style name (`w:name`).
    pub fn display_name(&self) -> String {
        match self {
            ParagraphStyle::Normal => "Normal".into(),
            ParagraphStyle::Title => "Title".into(),
            ParagraphStyle::Heading(level) => format!("heading {level}"),
            ParagraphStyle::ListBullet => "List Bullet".into(),
            ParagraphStyle::ListNumber => "List Number".into(),
            ParagraphStyle::Quote => "Quote".into(),
        }
    }
}

/// Resolved visual attributes of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Text color; `None` keeps the renderer's default.
    pub font_color: Option<Color>,
    /// Font family; `None` keeps the body font.
    pub font_family: Option<String>,
    pub paragraph_style: ParagraphStyle,
}

impl StyleRule {
    /// Body text in the default font.
    pub fn plain() -> Self {
        Self {
            font_color: None,
            font_family: None,
            paragraph_style: ParagraphStyle::Normal,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_paragraph_style(mut self, style: ParagraphStyle) -> Self {
        self.paragraph_style = style;
        self
    }
}

/// Key of the style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    /// Level-1 heading.
    Title,
    /// Level 2–6 heading.
    Subheading,
    Paragraph,
    CodeBlock,
    ListBullet,
    ListNumber,
    Blockquote,
    /// Fallback for everything without a rule of its own.
    PlainText,
}

impl StyleKey {
    /// Table key for an element kind. `level` only matters for headings and
    /// defaults to 1 when absent.
    pub fn for_element(kind: ElementKind, level: Option<u8>) -> Self {
        match kind {
            ElementKind::Heading if clamp_level(level) == MIN_HEADING_LEVEL => StyleKey::Title,
            ElementKind::Heading => StyleKey::Subheading,
            ElementKind::Paragraph => StyleKey::Paragraph,
            ElementKind::CodeBlock => StyleKey::CodeBlock,
            ElementKind::ListItem(ListKind::Bullet) => StyleKey::ListBullet,
            ElementKind::ListItem(ListKind::Number) => StyleKey::ListNumber,
            ElementKind::Blockquote => StyleKey::Blockquote,
            ElementKind::PlainText => StyleKey::PlainText,
        }
    }
}

fn clamp_level(level: Option<u8>) -> u8 {
    level
        .unwrap_or(MIN_HEADING_LEVEL)
        .clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL)
}

/// Immutable mapping from element kind to [`StyleRule`].
///
/// Build one at startup and share it by reference; nothing mutates a policy
/// once conversions start.
///
/// # Example
///
/// ```
/// use mdstyle::model::ElementKind;
/// use mdstyle::style::{ParagraphStyle, StylePolicy};
///
/// let policy = StylePolicy::default();
/// let rule = policy.resolve(ElementKind::Heading, Some(3));
/// assert_eq!(rule.paragraph_style, ParagraphStyle::Heading(3));
/// ```
#[derive(Debug, Clone)]
pub struct StylePolicy {
    rules: HashMap<StyleKey, StyleRule>,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self::empty()
            .with_rule(
                StyleKey::Title,
                StyleRule::plain()
                    .with_color(TITLE_COLOR)
                    .with_paragraph_style(ParagraphStyle::Title),
            )
            .with_rule(
                StyleKey::Subheading,
                StyleRule::plain()
                    .with_color(SUBHEADING_COLOR)
                    .with_paragraph_style(ParagraphStyle::Heading(2)),
            )
            .with_rule(StyleKey::Paragraph, StyleRule::plain())
            .with_rule(StyleKey::CodeBlock, StyleRule::plain().with_font(MONOSPACE_FONT))
            .with_rule(
                StyleKey::ListBullet,
                StyleRule::plain().with_paragraph_style(ParagraphStyle::ListBullet),
            )
            .with_rule(
                StyleKey::ListNumber,
                StyleRule::plain().with_paragraph_style(ParagraphStyle::ListNumber),
            )
            .with_rule(
                StyleKey::Blockquote,
                StyleRule::plain().with_paragraph_style(ParagraphStyle::Quote),
            )
            .with_rule(StyleKey::PlainText, StyleRule::plain())
    }
}

impl StylePolicy {
    /// A policy without rules; every lookup falls back to plain text.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Set the rule for `key`, replacing any previous one.
    pub fn with_rule(mut self, key: StyleKey, rule: StyleRule) -> Self {
        self.rules.insert(key, rule);
        self
    }

    /// The rule stored for `key`, if any.
    pub fn rule(&self, key: StyleKey) -> Option<&StyleRule> {
        self.rules.get(&key)
    }

    /// Resolve the style of an element.
    ///
    /// Never fails: a kind without a rule gets the `PlainText` rule, and a
    /// policy without one of those gets [`StyleRule::plain`]. Heading levels
    /// are clamped to `1..=6`; heading paragraph styles carry the level.
    pub fn resolve(&self, kind: ElementKind, level: Option<u8>) -> StyleRule {
        let key = StyleKey::for_element(kind, level);
        let mut rule = self
            .rules
            .get(&key)
            .or_else(|| self.rules.get(&StyleKey::PlainText))
            .cloned()
            .unwrap_or_else(StyleRule::plain);

        if let ParagraphStyle::Heading(_) = rule.paragraph_style {
            rule.paragraph_style = ParagraphStyle::Heading(clamp_level(level));
        }
        rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_subheading_rules() {
        let policy = StylePolicy::default();

        let title = policy.resolve(ElementKind::Heading, Some(1));
        assert_eq!(title.paragraph_style, ParagraphStyle::Title);
        assert_eq!(title.font_color, Some(TITLE_COLOR));

        for level in 2..=6 {
            let rule = policy.resolve(ElementKind::Heading, Some(level));
            assert_eq!(rule.paragraph_style, ParagraphStyle::Heading(level));
            assert_eq!(rule.font_color, Some(SUBHEADING_COLOR));
        }
    }

    #[test]
    fn test_heading_levels_are_clamped() {
        let policy = StylePolicy::default();
        assert_eq!(
            policy.resolve(ElementKind::Heading, Some(0)).paragraph_style,
            ParagraphStyle::Title
        );
        assert_eq!(
            policy.resolve(ElementKind::Heading, Some(42)).paragraph_style,
            ParagraphStyle::Heading(6)
        );
        assert_eq!(
            policy.resolve(ElementKind::Heading, None).paragraph_style,
            ParagraphStyle::Title
        );
    }

    #[test]
    fn test_code_block_is_monospace_without_color() {
        let rule = StylePolicy::default().resolve(ElementKind::CodeBlock, None);
        assert_eq!(rule.font_family.as_deref(), Some(MONOSPACE_FONT));
        assert_eq!(rule.font_color, None);
    }

    #[test]
    fn test_list_and_quote_styles() {
        let policy = StylePolicy::default();
        assert_eq!(
            policy
                .resolve(ElementKind::ListItem(ListKind::Bullet), None)
                .paragraph_style,
            ParagraphStyle::ListBullet
        );
        assert_eq!(
            policy
                .resolve(ElementKind::ListItem(ListKind::Number), None)
                .paragraph_style,
            ParagraphStyle::ListNumber
        );
        assert_eq!(
            policy.resolve(ElementKind::Blockquote, None).paragraph_style,
            ParagraphStyle::Quote
        );
    }

    #[test]
    fn test_missing_rule_falls_back_to_plain_text_rule() {
        let fallback = StyleRule::plain().with_font("Georgia");
        let policy = StylePolicy::empty().with_rule(StyleKey::PlainText, fallback.clone());

        assert_eq!(policy.resolve(ElementKind::Blockquote, None), fallback);
        assert_eq!(policy.resolve(ElementKind::Heading, Some(2)), fallback);
    }

    #[test]
    fn test_empty_policy_resolves_plain() {
        let policy = StylePolicy::empty();
        assert_eq!(policy.resolve(ElementKind::CodeBlock, None), StyleRule::plain());
    }

    #[test]
    fn test_style_ids() {
        assert_eq!(ParagraphStyle::Heading(3).style_id(), "Heading3");
        assert_eq!(ParagraphStyle::Heading(3).display_name(), "heading 3");
        assert_eq!(ParagraphStyle::ListBullet.display_name(), "List Bullet");
    }
}
