//! Tint colors and the strategies that pick them from a seed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::rng::SpriteRng;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from HSV values.
    /// - h: hue in degrees (0-360)
    /// - s: saturation (0-1)
    /// - v: value/brightness (0-1)
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

        if s <= 0.0 {
            return Self::new(to_u8(v), to_u8(v), to_u8(v));
        }

        let h = h.rem_euclid(360.0) / 60.0;
        let i = h.floor() as i32;
        let f = h - i as f64;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match i {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Channels as an array.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Parse `#rrggbb` or `rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Picks the tint color for one composition.
///
/// Implementations may draw from `rng`. Draws made here happen after the
/// frame-index draw, so they are part of the reproducible sequence.
pub trait ColorSource {
    fn color(&self, rng: &mut dyn SpriteRng) -> Rgb;
}

impl<C: ColorSource + ?Sized> ColorSource for Box<C> {
    fn color(&self, rng: &mut dyn SpriteRng) -> Rgb {
        (**self).color(rng)
    }
}

/// Always the same color; consumes no draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedColor(pub Rgb);

impl ColorSource for FixedColor {
    fn color(&self, _rng: &mut dyn SpriteRng) -> Rgb {
        self.0
    }
}

/// One uniformly chosen entry of a palette; consumes one integer draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColor {
    colors: Vec<Rgb>,
}

impl PaletteColor {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl ColorSource for PaletteColor {
    fn color(&self, rng: &mut dyn SpriteRng) -> Rgb {
        let last = (self.colors.len() - 1) as u32;
        let index = rng.integer(0, last) as usize;
        // integer() is bounded, but an external RNG might not be.
        self.colors[index.min(self.colors.len() - 1)]
    }
}

/// A random hue at fixed saturation and value; consumes one integer draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueColor {
    pub saturation: f64,
    pub value: f64,
}

impl Default for HueColor {
    fn default() -> Self {
        Self {
            saturation: 0.8,
            value: 0.9,
        }
    }
}

impl ColorSource for HueColor {
    fn color(&self, rng: &mut dyn SpriteRng) -> Rgb {
        let hue = rng.integer(0, 359);
        Rgb::from_hsv(hue as f64, self.saturation, self.value)
    }
}
