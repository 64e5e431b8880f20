//! Colors derived from the branding config

use crate::color::HexColor;
use crate::config::SimulatorConfig;
use crate::constants::branding;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: HexColor,
    pub secondary: HexColor,
    /// Text drawn on top of `primary`
    pub on_primary: HexColor,
    pub background: HexColor,
    pub surface: HexColor,
    pub text: HexColor,
    pub muted: HexColor,
    pub danger: HexColor,
}

impl Palette {
    /// Malformed branding colors fall back to the defaults
    pub fn from_config(config: &SimulatorConfig) -> Self {
        let fallback_primary = HexColor::parse(branding::DEFAULT_PRIMARY).unwrap_or(HexColor::BLACK);
        let fallback_secondary = HexColor::parse(branding::DEFAULT_SECONDARY).unwrap_or(HexColor::BLACK);
        let primary = HexColor::parse_or(&config.primary_color, fallback_primary);
        let secondary = HexColor::parse_or(&config.secondary_color, fallback_secondary);

        let (background, surface, text, muted) = if config.dark_mode {
            (
                HexColor::rgb(0x11, 0x18, 0x27),
                HexColor::rgb(0x1F, 0x29, 0x37),
                HexColor::rgb(0xF9, 0xFA, 0xFB),
                HexColor::rgb(0x9C, 0xA3, 0xAF),
            )
        } else {
            (
                HexColor::WHITE,
                HexColor::rgb(0xF3, 0xF4, 0xF6),
                HexColor::BLACK,
                HexColor::rgb(0x6B, 0x72, 0x80),
            )
        };

        Self {
            primary,
            secondary,
            on_primary: primary.contrasting_text(),
            background,
            surface,
            text,
            muted,
            danger: HexColor::rgb(0xEF, 0x44, 0x44),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorKind;

    #[test]
    fn test_malformed_primary_uses_default() {
        let mut config = SimulatorConfig::default_for(SimulatorKind::App);
        config.primary_color = "not-a-color".to_string();
        let palette = Palette::from_config(&config);
        assert_eq!(palette.primary, HexColor::rgb(0x3B, 0x82, 0xF6));
    }

    #[test]
    fn test_dark_mode_flips_background() {
        let mut config = SimulatorConfig::default_for(SimulatorKind::Website);
        let light = Palette::from_config(&config);
        config.dark_mode = true;
        let dark = Palette::from_config(&config);
        assert_ne!(light.background, dark.background);
        assert!(dark.text.luminance() > dark.background.luminance());
    }
}
