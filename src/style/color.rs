//! RGB colors.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::ToCss;

/// Opaque RGB color (8 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `RRGGBB`, the form WordprocessingML expects in `w:color`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl ToCss for Color {
    fn to_css(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(buf, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a color string is not `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`: expected #rgb or #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |range: &str| u8::from_str_radix(range, 16).map_err(|_| err());

        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!("#2c3e50".parse::<Color>(), Ok(Color::rgb(44, 62, 80)));
        assert_eq!("3498DB".parse::<Color>(), Ok(Color::rgb(52, 152, 219)));
        assert_eq!("#fff".parse::<Color>(), Ok(Color::rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("blue".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn test_output_forms() {
        let color = Color::rgb(52, 152, 219);
        assert_eq!(color.to_hex(), "3498DB");
        assert_eq!(color.to_css_string(), "#3498db");
        assert_eq!(color.to_string(), "#3498db");
    }
}
