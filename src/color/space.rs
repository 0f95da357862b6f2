//! sRGB ↔ CIE Lab ↔ HCL conversions (D65 white point).
//!
//! HCL here is the cylindrical form of Lab (CIE LCh(ab)): hue in degrees,
//! chroma and luminance in Lab units. Achromatic colors have no hue.

use super::Color;

/// D65 reference white.
const XN: f64 = 0.950_470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_830;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// Channel slack accepted by [`Lab::in_gamut`].
const GAMUT_EPSILON: f64 = 1e-6;

/// A color in CIE Lab space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness, 0–100.
    pub l: f64,
    /// Green–red axis.
    pub a: f64,
    /// Blue–yellow axis.
    pub b: f64,
}

/// A color in HCL (CIE LCh) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    /// Hue in degrees `[0, 360)`, `None` for achromatic colors.
    pub hue: Option<f64>,
    /// Chroma (distance from the gray axis).
    pub chroma: f64,
    /// Luminance, 0–100.
    pub luminance: f64,
}

fn rgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_rgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn xyz_to_lab_f(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz_f(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

impl Lab {
    /// Convert a packed sRGB color.
    #[must_use]
    pub fn from_color(color: Color) -> Self {
        let [r, g, b] = color.to_rgb();
        let (r, g, b) = (rgb_to_linear(r), rgb_to_linear(g), rgb_to_linear(b));
        let x = xyz_to_lab_f(
            (0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / XN,
        );
        let y = xyz_to_lab_f(
            (0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / YN,
        );
        let z = xyz_to_lab_f(
            (0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / ZN,
        );
        Self {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }

    /// Normalized sRGB channels, unclamped (may leave `[0, 1]`).
    #[must_use]
    pub fn to_srgb_unclamped(self) -> [f64; 3] {
        let y0 = (self.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz_f(y0 + self.a / 500.0);
        let y = YN * lab_to_xyz_f(y0);
        let z = ZN * lab_to_xyz_f(y0 - self.b / 200.0);
        [
            linear_to_rgb(3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z),
            linear_to_rgb(-0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z),
            linear_to_rgb(0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z),
        ]
    }

    /// Whether the color is representable in sRGB without clamping.
    #[must_use]
    pub fn in_gamut(self) -> bool {
        self.to_srgb_unclamped()
            .iter()
            .all(|c| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(c))
    }

    /// Convert to a packed color, clamping out-of-gamut channels.
    #[must_use]
    pub fn to_color(self) -> Color {
        let [r, g, b] = self.to_srgb_unclamped();
        Color::from_normalized_rgb(r as f32, g as f32, b as f32)
    }

    /// Squared CIE76 distance.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

impl Hcl {
    /// Build from explicit components.
    #[must_use]
    pub const fn new(hue: f64, chroma: f64, luminance: f64) -> Self {
        Self {
            hue: Some(hue),
            chroma,
            luminance,
        }
    }

    /// Convert from Lab. Hue is undefined when chroma rounds to zero at
    /// four decimal places.
    #[must_use]
    pub fn from_lab(lab: Lab) -> Self {
        let chroma = lab.a.hypot(lab.b);
        let hue = if (chroma * 10_000.0).round() == 0.0 {
            None
        } else {
            Some(lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0))
        };
        Self {
            hue,
            chroma,
            luminance: lab.l,
        }
    }

    /// Convert a packed sRGB color.
    #[must_use]
    pub fn from_color(color: Color) -> Self {
        Self::from_lab(Lab::from_color(color))
    }

    /// Convert to Lab. An undefined hue is treated as 0°.
    #[must_use]
    pub fn to_lab(self) -> Lab {
        let h = self.hue.unwrap_or(0.0).to_radians();
        Lab {
            l: self.luminance,
            a: self.chroma * h.cos(),
            b: self.chroma * h.sin(),
        }
    }

    /// Convert to a packed color, clamping out-of-gamut channels.
    #[must_use]
    pub fn to_color(self) -> Color {
        self.to_lab().to_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_hit_the_luminance_extremes() {
        let white = Lab::from_color(Color::WHITE);
        assert!((white.l - 100.0).abs() < 1e-3);
        assert!(white.a.abs() < 1e-3 && white.b.abs() < 1e-3);
        let black = Lab::from_color(Color::BLACK);
        assert!(black.l.abs() < 1e-6);
    }

    #[test]
    fn gray_has_no_hue() {
        for v in [0u8, 17, 128, 200, 255] {
            let hcl = Hcl::from_color(Color::from_rgb(v, v, v));
            assert_eq!(hcl.hue, None, "gray {v} should be achromatic");
        }
    }

    #[test]
    fn saturated_colors_have_a_hue() {
        let red = Hcl::from_color(Color::from_hex(0xff0000));
        let hue = red.hue.unwrap();
        assert!((hue - 40.0).abs() < 2.0, "red hue was {hue}");
        assert!(red.chroma > 100.0);
    }

    #[test]
    fn srgb_round_trips_through_lab() {
        for hex in [0x1f78b4, 0xe31a1c, 0x33a02c, 0x808080, 0xffff99] {
            let c = Color::from_hex(hex);
            assert_eq!(Lab::from_color(c).to_color(), c);
            assert_eq!(Hcl::from_color(c).to_color(), c);
        }
    }

    #[test]
    fn gamut_check_rejects_impossible_chroma() {
        assert!(Hcl::new(40.0, 65.0, 55.0).to_lab().in_gamut());
        assert!(!Hcl::new(140.0, 150.0, 20.0).to_lab().in_gamut());
    }
}
