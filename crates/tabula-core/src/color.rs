// File: crates/tabula-core/src/color.rs
// Summary: RGBA color with hex parsing/formatting and piecewise-linear color ramps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChartError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ChartError> {
        let bad = || ChartError::Color(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(bad)?;
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2).ok_or_else(bad)?, 16).map_err(|_| bad());
        match digits.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in digits.chars().enumerate() {
                    let v = ch.to_digit(16).ok_or_else(bad)? as u8;
                    c[i] = v * 17;
                }
                Ok(Self::rgb(c[0], c[1], c[2]))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
            _ => Err(bad()),
        }
    }

    /// `#rrggbb`; alpha is carried separately as opacity in SVG output.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::from_hex(s)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Evenly spaced color stops interpolated linearly in RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Rgba>,
}

impl ColorRamp {
    pub fn new(stops: Vec<Rgba>) -> Self {
        let stops = if stops.is_empty() { vec![Rgba::BLACK] } else { stops };
        Self { stops }
    }

    pub fn between(from: Rgba, to: Rgba) -> Self {
        Self::new(vec![from, to])
    }

    /// ColorBrewer YlOrBr, nine classes.
    pub fn yl_or_br() -> Self {
        Self::new(vec![
            Rgba::rgb(0xff, 0xff, 0xe5),
            Rgba::rgb(0xff, 0xf7, 0xbc),
            Rgba::rgb(0xfe, 0xe3, 0x91),
            Rgba::rgb(0xfe, 0xc4, 0x4f),
            Rgba::rgb(0xfe, 0x99, 0x29),
            Rgba::rgb(0xec, 0x70, 0x14),
            Rgba::rgb(0xcc, 0x4c, 0x02),
            Rgba::rgb(0x99, 0x34, 0x04),
            Rgba::rgb(0x66, 0x25, 0x06),
        ])
    }

    pub fn stops(&self) -> &[Rgba] {
        &self.stops
    }

    /// Color at `t` in `[0, 1]`; NaN reads as the first stop.
    pub fn at(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.stops.len() - 1;
        if segments == 0 {
            return self.stops[0];
        }
        let pos = t * segments as f64;
        let i = (pos.floor() as usize).min(segments - 1);
        self.stops[i].lerp(&self.stops[i + 1], pos - i as f64)
    }
}
