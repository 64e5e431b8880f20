//! Hex color parsing for branding colors
//!
//! Branding colors are stored as free-form strings. Nothing rejects a
//! malformed value; consumers parse with [`HexColor::parse`] and pick their
//! own fallback.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: HexColor = HexColor::rgb(0x11, 0x18, 0x27);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        // from_str_radix alone would accept a sign such as "+F"
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                // Short form: each digit is doubled
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v << 4 | v;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    /// Parse or fall back to `fallback`
    pub fn parse_or(input: &str, fallback: HexColor) -> Self {
        Self::parse(input).unwrap_or(fallback)
    }

    /// Relative luminance (0.0 dark - 1.0 light), sRGB weights
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrasting_text(&self) -> HexColor {
        if self.luminance() > 0.6 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(HexColor::parse("#3B82F6"), Some(HexColor::rgb(0x3B, 0x82, 0xF6)));
        assert_eq!(HexColor::parse("3b82f6"), Some(HexColor::rgb(0x3B, 0x82, 0xF6)));
        assert_eq!(HexColor::parse("#fff"), Some(HexColor::rgb(0xFF, 0xFF, 0xFF)));
        assert_eq!(
            HexColor::parse("#00000080"),
            Some(HexColor { r: 0, g: 0, b: 0, a: 0x80 })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(HexColor::parse("blue"), None);
        assert_eq!(HexColor::parse("#12345"), None);
        assert_eq!(HexColor::parse("#ggg"), None);
        assert_eq!(HexColor::parse("#ééé"), None);
        assert_eq!(HexColor::parse("#+F+F+F"), None);
        assert_eq!(HexColor::parse("+FFFFFF+"), None);
        assert_eq!(HexColor::parse("#-1-1-1-1"), None);
        assert_eq!(HexColor::parse(""), None);
    }

    #[test]
    fn test_display_round_trip() {
        let color = HexColor::rgb(0x10, 0xB9, 0x81);
        assert_eq!(color.to_string(), "#10B981");
        assert_eq!(HexColor::parse(&color.to_string()), Some(color));
        let translucent = HexColor { a: 0x40, ..color };
        assert_eq!(translucent.to_string(), "#10B98140");
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(HexColor::rgb(0xFF, 0xFF, 0xFF).contrasting_text(), HexColor::BLACK);
        assert_eq!(HexColor::rgb(0x1E, 0x3A, 0x8A).contrasting_text(), HexColor::WHITE);
    }
}
