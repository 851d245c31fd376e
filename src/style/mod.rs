//! Style policy: the fixed mapping from element kind to visual attributes.
//!
//! This module contains:
//! - [`Color`], an opaque RGB color usable in CSS and WordprocessingML
//! - [`StyleRule`] and [`ParagraphStyle`], the resolved formatting of a block
//! - [`StylePolicy`], the immutable lookup table with a total `resolve`
//! - stylesheet generation for the HTML shell

mod color;
mod css;
mod policy;

/// Types that can be written as CSS.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

pub use color::{Color, ParseColorError};
pub use css::DEFAULT_BODY_FONT;
pub use policy::{
    MONOSPACE_FONT, ParagraphStyle, SUBHEADING_COLOR, StyleKey, StylePolicy, StyleRule, TITLE_COLOR,
};
