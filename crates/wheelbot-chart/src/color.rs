use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEX_COLOR: Regex =
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex colour pattern is valid");
}

/// Plain 8-bit RGB triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`. Anything else is `None`.
    pub fn from_hex(s: &str) -> Option<Self> {
        if !HEX_COLOR.is_match(s) {
            return None;
        }
        let digits = &s[1..];
        if digits.len() == 3 {
            let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|n| n * 17);
            Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
        } else {
            let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Default accent, used whenever a supplied colour does not parse
pub const DEFAULT_ACCENT: Rgb = Rgb::new(0x7C, 0x4D, 0xFF);

/// Accent colour chosen by the user or configuration.
///
/// Deserializing never fails: malformed strings become [`DEFAULT_ACCENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccentColor(Rgb);

impl AccentColor {
    /// Strict parse, for validating user input
    pub fn parse(s: &str) -> Option<Self> {
        Rgb::from_hex(s.trim()).map(Self)
    }

    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    pub fn rgb(self) -> Rgb {
        self.0
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT)
    }
}

impl std::fmt::Display for AccentColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<String> for AccentColor {
    fn from(s: String) -> Self {
        Self::parse_or_default(&s)
    }
}

impl From<AccentColor> for String {
    fn from(c: AccentColor) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#7C4DFF"), Some(Rgb::new(0x7C, 0x4D, 0xFF)));
        assert_eq!(Rgb::from_hex("#00e5ff"), Some(Rgb::new(0x00, 0xE5, 0xFF)));
        assert_eq!(Rgb::from_hex("#fa0"), Some(Rgb::new(0xFF, 0xAA, 0x00)));
    }

    #[test]
    fn test_invalid_strings_fall_back() {
        for bad in ["red", "#12", "#12345", "#1234567", "7C4DFF", "#GGGGGG", "", "#"] {
            assert_eq!(Rgb::from_hex(bad), None, "{bad}");
            assert_eq!(AccentColor::parse_or_default(bad).rgb(), DEFAULT_ACCENT, "{bad}");
        }
    }

    #[test]
    fn test_display_is_uppercase_long_form() {
        assert_eq!(AccentColor::parse_or_default("#abc").to_string(), "#AABBCC");
        assert_eq!(AccentColor::default().to_string(), "#7C4DFF");
    }

    #[test]
    fn test_deserialize_never_fails() {
        let c: AccentColor = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(c, AccentColor::default());
        let c: AccentColor = serde_json::from_str("\"#112233\"").unwrap();
        assert_eq!(c.rgb(), Rgb::new(0x11, 0x22, 0x33));
    }
}
