use serde::{Deserialize, Serialize};

/// Framework-agnostic RGB color
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color theme for inline output annotations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    CyberGlow,
    SunsetDrive,
    ForestSpirit,
    Synthwave,
    Quantum,
    Stardust,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[
            Theme::CyberGlow,
            Theme::SunsetDrive,
            Theme::ForestSpirit,
            Theme::Synthwave,
            Theme::Quantum,
            Theme::Stardust,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::CyberGlow => "Cyber Glow",
            Theme::SunsetDrive => "Sunset Drive",
            Theme::ForestSpirit => "Forest Spirit",
            Theme::Synthwave => "Synthwave",
            Theme::Quantum => "Quantum",
            Theme::Stardust => "Stardust",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Theme::CyberGlow => Rgb::new(0x00, 0xf7, 0xff),    // #00f7ff
            Theme::SunsetDrive => Rgb::new(0xff, 0x8a, 0x5c),  // #ff8a5c
            Theme::ForestSpirit => Rgb::new(0xa3, 0xff, 0xb3), // #a3ffb3
            Theme::Synthwave => Rgb::new(0xf7, 0x21, 0xd4),    // #f721d4
            Theme::Quantum => Rgb::new(0x7d, 0x5c, 0xff),      // #7d5cff
            Theme::Stardust => Rgb::new(0xe6, 0xde, 0xff),     // #e6deff
        }
    }

    /// Color used for error annotations, regardless of the selected theme
    pub fn error_color() -> Rgb {
        Theme::Synthwave.color()
    }

    /// Look up a theme by its display name
    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::all().iter().copied().find(|t| t.as_str() == name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Stardust
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        for theme in Theme::all() {
            assert_eq!(Theme::from_name(theme.as_str()), Some(*theme));
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(Theme::from_name("Midnight"), None);
        assert_eq!(Theme::from_name(""), None);
    }

    #[test]
    fn test_default_is_stardust() {
        assert_eq!(Theme::default(), Theme::Stardust);
        assert_eq!(Theme::default().color(), Rgb::new(0xe6, 0xde, 0xff));
    }

    #[test]
    fn test_error_color_is_synthwave() {
        assert_eq!(Theme::error_color(), Theme::Synthwave.color());
    }
}
