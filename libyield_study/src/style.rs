use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::StyleError;

/// Marker drawn at each point of a series. Parsed from single character codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
}

impl MarkerShape {
    pub const ALL: [MarkerShape; 7] = [
        Self::Circle,
        Self::Square,
        Self::TriangleUp,
        Self::TriangleDown,
        Self::Diamond,
        Self::Cross,
        Self::Plus,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Circle => "o",
            Self::Square => "s",
            Self::TriangleUp => "^",
            Self::TriangleDown => "v",
            Self::Diamond => "D",
            Self::Cross => "x",
            Self::Plus => "+",
        }
    }
}

impl FromStr for MarkerShape {
    type Err = StyleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "o" => Ok(Self::Circle),
            "s" => Ok(Self::Square),
            "^" => Ok(Self::TriangleUp),
            "v" => Ok(Self::TriangleDown),
            "D" | "d" => Ok(Self::Diamond),
            "x" => Ok(Self::Cross),
            "+" => Ok(Self::Plus),
            _ => Err(StyleError::BadMarker(s.to_string())),
        }
    }
}

impl TryFrom<String> for MarkerShape {
    type Error = StyleError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<MarkerShape> for String {
    fn from(value: MarkerShape) -> Self {
        value.code().to_string()
    }
}

impl Display for MarkerShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An RGB color parsed from a single letter code, a common color name, or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StyleColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for StyleColor {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl StyleColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl FromStr for StyleColor {
    type Err = StyleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let color = match name {
            "r" | "red" => Self::new(255, 0, 0),
            "g" | "green" => Self::new(0, 128, 0),
            "b" | "blue" => Self::new(0, 0, 255),
            "k" | "black" => Self::new(0, 0, 0),
            "c" | "cyan" => Self::new(0, 191, 191),
            "m" | "magenta" => Self::new(191, 0, 191),
            "y" => Self::new(191, 191, 0),
            "w" | "white" => Self::new(255, 255, 255),
            "gray" | "grey" => Self::new(128, 128, 128),
            "darkorange" => Self::new(255, 140, 0),
            "orange" => Self::new(255, 165, 0),
            "gold" => Self::new(255, 215, 0),
            "purple" => Self::new(128, 0, 128),
            _ => Self::from_hex(name).ok_or_else(|| StyleError::BadColor(s.to_string()))?,
        };
        Ok(color)
    }
}

impl TryFrom<String> for StyleColor {
    type Error = StyleError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<StyleColor> for String {
    fn from(value: StyleColor) -> Self {
        value.to_string()
    }
}

impl Display for StyleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Marker, color, and optional legend label for one input file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub marker: MarkerShape,
    pub color: StyleColor,
    #[serde(default)]
    pub label: Option<String>,
}

impl SeriesStyle {
    pub fn new(marker: MarkerShape, color: StyleColor) -> Self {
        Self {
            marker,
            color,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_codes() {
        for marker in MarkerShape::ALL {
            assert_eq!(marker.code().parse::<MarkerShape>().unwrap(), marker);
        }
        assert!(matches!(
            "*".parse::<MarkerShape>(),
            Err(StyleError::BadMarker(_))
        ));
    }

    #[test]
    fn test_colors() {
        assert_eq!("gray".parse::<StyleColor>().unwrap(), StyleColor::new(128, 128, 128));
        assert_eq!("k".parse::<StyleColor>().unwrap(), StyleColor::new(0, 0, 0));
        assert_eq!(
            "#1f77b4".parse::<StyleColor>().unwrap(),
            StyleColor::new(0x1f, 0x77, 0xb4)
        );
        assert_eq!(StyleColor::new(255, 140, 0).to_string(), "#ff8c00");
        assert!("#12345".parse::<StyleColor>().is_err());
        assert!("chartreuse".parse::<StyleColor>().is_err());
    }

    #[test]
    fn test_style_yaml() {
        let style: SeriesStyle = serde_yaml::from_str("marker: v\ncolor: g\n").unwrap();
        assert_eq!(style.marker, MarkerShape::TriangleDown);
        assert_eq!(style.color, StyleColor::new(0, 128, 0));
        assert_eq!(style.label, None);
        assert!(serde_yaml::from_str::<SeriesStyle>("marker: q\ncolor: g\n").is_err());
    }
}
