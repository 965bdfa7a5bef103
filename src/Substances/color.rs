//! RGB colours of chemicals, reaction templates and blended test tube contents.
//!
//! Colours travel through the reference data as hex strings (`#DCFFDD`), so the type
//! parses and prints that form and (de)serializes through it.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorError {
    #[error("Malformed hex colour: '{0}'")]
    Malformed(String),
}

static HEX_COLOR: OnceLock<Regex> = OnceLock::new();

fn hex_color_regex() -> &'static Regex {
    HEX_COLOR.get_or_init(|| {
        Regex::new(r"^#?(?:(?P<long>[0-9A-Fa-f]{6})|(?P<short>[0-9A-Fa-f]{3}))$")
            .expect("hex colour pattern is valid")
    })
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    /// default glow when no chemical in the tube gives a flame colour
    pub const YELLOW: Color = Color::new(0xFF, 0xFF, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Builds a colour from real-valued channels, rounding to the nearest integer
    /// and clamping into 0..=255.
    pub fn from_channels(channels: [f64; 3]) -> Self {
        let to_u8 = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(channels[0]), to_u8(channels[1]), to_u8(channels[2]))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = hex_color_regex()
            .captures(s.trim())
            .ok_or_else(|| ColorError::Malformed(s.to_string()))?;
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorError::Malformed(s.to_string()))
        };
        if let Some(long) = caps.name("long") {
            let hex = long.as_str();
            Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ))
        } else {
            // #RGB is shorthand for #RRGGBB
            let hex = caps
                .name("short")
                .ok_or_else(|| ColorError::Malformed(s.to_string()))?
                .as_str();
            let doubled: Vec<String> = hex.chars().map(|c| format!("{c}{c}")).collect();
            Ok(Color::new(
                channel(doubled[0].as_str())?,
                channel(doubled[1].as_str())?,
                channel(doubled[2].as_str())?,
            ))
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
