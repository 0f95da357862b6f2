//! Packed RGB colors and procedural color generation.
//!
//! - [`space`] converts between sRGB, CIE Lab and HCL (CIE LCh).
//! - [`distinct`] samples N well-separated colors from an HCL region.
//! - [`variation`] derives N variants clustered around one base hue.
//! - [`scheme`] holds the per-node [`ColorSpec`] and its validation.
//!
//! [`ColorSampler`] ties the samplers to one set of
//! [`SamplerOptions`](crate::options::SamplerOptions).

pub mod distinct;
pub mod scheme;
pub mod space;
pub mod variation;

use std::fmt;

pub use distinct::{ColorSampler, HclRange, DISTINCT_PALETTE};
pub use scheme::{ColorSchemeType, ColorSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use space::{Hcl, Lab};

/// An opaque 24-bit RGB color packed as `0xRRGGBB`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self(0x00FF_FFFF);
    /// Pure black.
    pub const BLACK: Self = Self(0);

    /// Build from a packed `0xRRGGBB` value. Bits above 24 are dropped.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    /// Build from three 8-bit channels.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build from normalized channels. Values are clamped to `[0, 1]`.
    #[must_use]
    pub fn from_normalized_rgb(r: f32, g: f32, b: f32) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Packed `0xRRGGBB` value.
    #[must_use]
    pub const fn to_hex(self) -> u32 {
        self.0
    }

    /// The three 8-bit channels.
    #[must_use]
    pub const fn to_rgb(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Channels in `[0, 1]`, the form renderers consume.
    #[must_use]
    pub fn to_normalized_rgb(self) -> [f32; 3] {
        let [r, g, b] = self.to_rgb();
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ]
    }

    /// Whether all three channels are equal (achromatic).
    #[must_use]
    pub const fn is_gray(self) -> bool {
        let [r, g, b] = self.to_rgb();
        r == g && g == b
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Rotate `colors` left by `floor(shift / 100 * len)` positions.
///
/// Repeated calls with different shifts reorder one assignment rather than
/// recomputing it.
#[must_use]
pub fn rotate_by_shift(mut colors: Vec<Color>, shift: u32) -> Vec<Color> {
    if colors.is_empty() {
        return colors;
    }
    let offset = (f64::from(shift) / 100.0 * colors.len() as f64).floor()
        as usize
        % colors.len();
    colors.rotate_left(offset);
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_packed_value() {
        let c = Color::from_rgb(0x12, 0xab, 0xef);
        assert_eq!(c.to_hex(), 0x12abef);
        assert_eq!(c.to_rgb(), [0x12, 0xab, 0xef]);
        assert_eq!(c.to_string(), "#12abef");
    }

    #[test]
    fn from_hex_drops_high_bits() {
        assert_eq!(Color::from_hex(0xff00_00ff).to_hex(), 0x0000ff);
    }

    #[test]
    fn normalized_channels_are_clamped() {
        let c = Color::from_normalized_rgb(1.5, -0.2, 0.5);
        assert_eq!(c.to_rgb(), [255, 0, 128]);
        assert!(Color::from_normalized_rgb(0.3, 0.3, 0.3).is_gray());
    }

    #[test]
    fn rotation_offset_follows_shift_percentage() {
        let colors: Vec<Color> = (0..10).map(Color::from_hex).collect();
        let rotated = rotate_by_shift(colors.clone(), 35);
        assert_eq!(rotated[0], colors[3]);
        assert_eq!(rotated[9], colors[2]);
        assert_eq!(rotate_by_shift(colors.clone(), 0), colors);
        assert_eq!(rotate_by_shift(colors.clone(), 100), colors);
        assert!(rotate_by_shift(Vec::new(), 50).is_empty());
    }
}
