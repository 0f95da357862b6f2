//! Hue variants around a single base color.
//!
//! Used to color the entities of one group: every variant stays within
//! `variability` degrees of the base hue. Achromatic bases have no hue to
//! vary, so they fall back to noisy grays.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::distinct::{ColorSampler, HclRange};
use super::scheme::{validate_shift, validate_variability};
use super::space::Hcl;
use super::{rotate_by_shift, Color};
use crate::error::MesoError;

/// Chroma of the single color returned for a one-entity group.
pub const SINGLE_VARIANT_CHROMA: f64 = 65.0;
/// Luminance of the single color returned for a one-entity group.
pub const SINGLE_VARIANT_LUMINANCE: f64 = 55.0;

/// How a hue window crossing the 0°/360° boundary is corrected.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum HueWrap {
    /// Shift the window up when it dips below 0°; leave an overflow above
    /// 360° as is. Matches the colors of existing sessions.
    #[default]
    Legacy,
    /// Shift the window back inside `[0, 360]` on either side.
    Symmetric,
}

impl HueWrap {
    /// `[lo, hi]` hue bounds of half-width `variability` around `hue`.
    #[must_use]
    pub fn window(self, hue: f64, variability: u32) -> [f64; 2] {
        let v = f64::from(variability);
        let mut lo = hue - v;
        let mut hi = hue + v;
        if lo < 0.0 {
            hi += -lo;
            lo = 0.0;
        }
        if self == Self::Symmetric && hi > 360.0 {
            lo = (lo - (hi - 360.0)).max(0.0);
            hi = 360.0;
        }
        [lo, hi]
    }
}

impl ColorSampler {
    /// `count` variants of `base` within `variability` degrees of its hue,
    /// rotated by `shift`.
    ///
    /// Deterministic for chromatic bases. Gray bases route through
    /// [`generate_grayscale`] and are intentionally not reproducible.
    pub fn sample_variants(
        &self,
        count: usize,
        base: Color,
        variability: u32,
        shift: u32,
    ) -> Result<Vec<Color>, MesoError> {
        self.sample_variants_with_rng(
            count,
            base,
            variability,
            shift,
            &mut rand::rng(),
        )
    }

    /// [`sample_variants`](Self::sample_variants) drawing grayscale noise
    /// from `rng`.
    pub fn sample_variants_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        base: Color,
        variability: u32,
        shift: u32,
        rng: &mut R,
    ) -> Result<Vec<Color>, MesoError> {
        validate_variability(variability)?;
        validate_shift(shift)?;

        let hcl = Hcl::from_color(base);
        let Some(hue) = hcl.hue else {
            return Ok(generate_grayscale(
                count,
                hcl.luminance,
                variability,
                rng,
            ));
        };

        if count == 1 {
            let single =
                Hcl::new(hue, SINGLE_VARIANT_CHROMA, SINGLE_VARIANT_LUMINANCE);
            return Ok(vec![single.to_color()]);
        }

        let range = HclRange {
            hue: self.options.hue_wrap.window(hue, variability),
            chroma: self.options.variant_chroma,
            luminance: self.options.variant_luminance,
        };
        Ok(rotate_by_shift(self.distinct_colors(count, &range), shift))
    }
}

/// `count` grays scattered around `luminance` (0–100).
///
/// Each gray is `|l ± d| mod 1` with `l = luminance / 100` and `d` a
/// random fraction of `variability / 180`, both saturated to `[0, 1]`.
pub fn generate_grayscale<R: Rng + ?Sized>(
    count: usize,
    luminance: f64,
    variability: u32,
    rng: &mut R,
) -> Vec<Color> {
    let l = (luminance / 100.0).clamp(0.0, 1.0);
    let spread = (f64::from(variability) / 180.0).clamp(0.0, 1.0);
    (0..count)
        .map(|_| {
            let delta = spread * rng.random::<f64>();
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let v = (l + sign * delta).abs() % 1.0;
            Color::from_normalized_rgb(v as f32, v as f32, v as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn legacy_window_only_corrects_underflow() {
        assert_eq!(HueWrap::Legacy.window(100.0, 20), [80.0, 120.0]);
        assert_eq!(HueWrap::Legacy.window(10.0, 30), [0.0, 60.0]);
        assert_eq!(HueWrap::Legacy.window(350.0, 30), [320.0, 380.0]);
    }

    #[test]
    fn symmetric_window_corrects_both_sides() {
        assert_eq!(HueWrap::Symmetric.window(10.0, 30), [0.0, 60.0]);
        assert_eq!(HueWrap::Symmetric.window(350.0, 30), [300.0, 360.0]);
        assert_eq!(HueWrap::Symmetric.window(180.0, 180), [0.0, 360.0]);
    }

    #[test]
    fn chromatic_variants_are_deterministic() {
        let sampler = ColorSampler::default();
        let base = Color::from_hex(0x1f78b4);
        let a = sampler.sample_variants(12, base, 30, 0).unwrap();
        let b = sampler.sample_variants(12, base, 30, 0).unwrap();
        assert_eq!(a.len(), 12);
        assert_eq!(a, b);
    }

    #[test]
    fn variants_cluster_around_the_base_hue() {
        let sampler = ColorSampler::default();
        let base = Color::from_hex(0x33a02c);
        let base_hue = Hcl::from_color(base).hue.unwrap();
        for color in sampler.sample_variants(6, base, 15, 0).unwrap() {
            let hue = Hcl::from_color(color).hue.unwrap();
            let diff = (hue - base_hue).abs();
            assert!(diff <= 20.0, "hue {hue} too far from {base_hue}");
        }
    }

    #[test]
    fn single_variant_uses_fixed_chroma_and_luminance() {
        let sampler = ColorSampler::default();
        for hex in [0xcc3333, 0x661111, 0xffaaaa] {
            let base = Color::from_hex(hex);
            let base_hue = Hcl::from_color(base).hue.unwrap();
            let out = sampler.sample_variants(1, base, 40, 0).unwrap();
            assert_eq!(out.len(), 1);
            let hcl = Hcl::from_color(out[0]);
            assert!((hcl.chroma - SINGLE_VARIANT_CHROMA).abs() < 1.5);
            assert!((hcl.luminance - SINGLE_VARIANT_LUMINANCE).abs() < 1.5);
            assert!((hcl.hue.unwrap() - base_hue).abs() < 2.0);
        }
    }

    #[test]
    fn gray_base_routes_through_grayscale() {
        let sampler = ColorSampler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let out = sampler
            .sample_variants_with_rng(
                16,
                Color::from_rgb(120, 120, 120),
                90,
                0,
                &mut rng,
            )
            .unwrap();
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|c| c.is_gray()));
    }

    #[test]
    fn grayscale_is_reproducible_with_a_seeded_rng() {
        let a = generate_grayscale(8, 50.0, 60, &mut StdRng::seed_from_u64(3));
        let b = generate_grayscale(8, 50.0, 60, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn grayscale_spread_is_bounded_by_variability() {
        let mut rng = StdRng::seed_from_u64(11);
        for gray in generate_grayscale(64, 50.0, 18, &mut rng) {
            let v = f32::from(gray.to_rgb()[0]) / 255.0;
            assert!((v - 0.5).abs() <= 0.1 + 1.0 / 255.0, "gray {v}");
        }
    }

    #[test]
    fn malformed_variability_is_rejected_before_sampling() {
        let sampler = ColorSampler::default();
        let base = Color::from_hex(0xff0000);
        assert!(sampler.sample_variants(4, base, 0, 0).is_err());
        assert!(sampler.sample_variants(4, base, 200, 0).is_err());
    }
}
