use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RGBA color used for marker fills, strokes, plate lines and legend swatches.
///
/// Written as `#RRGGBB` when opaque and as `#RRGGBBAA` otherwise. Both forms are accepted when
/// parsing, in either letter case.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color([u8; 4]);

/// Error returned for strings that are not `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color hex string: {0}")]
pub struct ParseColorError(String);

impl Color {
    /// `#000000`
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// `#FFFFFF`
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// `#FFA500`
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    /// `#FF0000`
    pub const RED: Color = Color::rgb(255, 0, 0);

    /// Color with the given channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Opaque color with the given channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, u8::MAX])
    }

    /// Parses a hex literal at compile time.
    ///
    /// # Panics
    ///
    /// Panics if `hex` is not a valid color string.
    pub const fn from_hex(hex: &'static str) -> Self {
        match parse_hex(hex.as_bytes()) {
            Some(color) => color,
            None => panic!("invalid color hex string"),
        }
    }

    /// Channels in RGBA order.
    pub fn to_u8_array(&self) -> [u8; 4] {
        self.0
    }

    /// Alpha channel.
    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// Formats the color as `#RRGGBB`, or `#RRGGBBAA` if it is not opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == u8::MAX {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Same color with the alpha channel taken from `opacity`, clamped to `0.0..=1.0`.
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let [r, g, b, _] = self.0;
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self([r, g, b, a])
    }

    /// HSL lightness in `0.0..=1.0`. Alpha is ignored.
    pub fn lightness(&self) -> f32 {
        let rgb = &self.0[..3];
        let max = rgb.iter().copied().max().unwrap_or_default() as f32;
        let min = rgb.iter().copied().min().unwrap_or_default() as f32;
        (max + min) / (2.0 * 255.0)
    }
}

const fn parse_hex(bytes: &[u8]) -> Option<Color> {
    let channel_count = match bytes.len() {
        7 => 3,
        9 => 4,
        _ => return None,
    };
    if bytes[0] != b'#' {
        return None;
    }

    let mut channels = [u8::MAX; 4];
    let mut i = 0;
    while i < channel_count {
        let (Some(high), Some(low)) = (hex_digit(bytes[1 + 2 * i]), hex_digit(bytes[2 + 2 * i]))
        else {
            return None;
        };
        channels[i] = high * 16 + low;
        i += 1;
    }

    Some(Color(channels))
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s.as_bytes()).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn hex_forms() {
        let translucent: Color = "#ff1000aa".parse().unwrap();
        assert_eq!(translucent, Color::rgba(255, 16, 0, 170));
        assert_eq!(translucent.to_hex(), "#FF1000AA");
        assert_eq!(Color::from_hex("#FF1000AA"), translucent);

        let json = serde_json::to_string(&Color::from_hex("#cc00ff")).unwrap();
        assert_eq!(json, "\"#CC00FF\"");
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert!("CC00FF".parse::<Color>().is_err());
        assert!("#CC00F".parse::<Color>().is_err());
        assert!("#GG00FF".parse::<Color>().is_err());
        assert!("#CC00FFé".parse::<Color>().is_err());
        assert!(serde_json::from_str::<Color>("\"orange\"").is_err());
    }

    #[test]
    fn lightness() {
        assert_abs_diff_eq!(Color::WHITE.lightness(), 1.0);
        assert_abs_diff_eq!(Color::BLACK.lightness(), 0.0);
        assert_abs_diff_eq!(Color::from_hex("#CC00FF").lightness(), 0.5);
    }

    #[test]
    fn opacity() {
        assert_eq!(Color::BLACK.with_opacity(0.8).alpha(), 204);
        assert_eq!(Color::BLACK.with_opacity(2.0).alpha(), 255);
    }
}
