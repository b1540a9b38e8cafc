use serde::{Deserialize, Serialize};

/// `#rrggbb` color as accepted by the map engine's paint properties.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parses `#rrggbb` or `rrggbb` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn channels(self) -> [u8; 3] {
        self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value).ok_or_else(|| format!("invalid hex color: {value:?}"))
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

/// Building slate used for extruded footprints.
pub const BUILDING_COLOR: HexColor = HexColor::rgb(0x5c, 0x73, 0x7a);

/// Campus marker red.
pub const MARKER_COLOR: HexColor = HexColor::rgb(0xea, 0x43, 0x35);

#[cfg(test)]
mod tests {
    use super::{BUILDING_COLOR, HexColor, MARKER_COLOR};

    #[test]
    fn parses_and_formats() {
        assert_eq!(HexColor::parse("#5c737a"), Some(BUILDING_COLOR));
        assert_eq!(HexColor::parse("EA4335"), Some(MARKER_COLOR));
        assert_eq!(MARKER_COLOR.to_string(), "#ea4335");
        assert_eq!(BUILDING_COLOR.channels(), [0x5c, 0x73, 0x7a]);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(HexColor::parse("#5c737"), None);
        assert_eq!(HexColor::parse("#zz0000"), None);
        assert_eq!(HexColor::parse("#ééé"), None);
        assert_eq!(HexColor::parse(""), None);
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&MARKER_COLOR).unwrap();
        assert_eq!(json, r##""#ea4335""##);
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MARKER_COLOR);
        assert!(serde_json::from_str::<HexColor>(r#""red""#).is_err());
    }
}
