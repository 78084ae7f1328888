//! Conversions between sRGB and CIELAB.
//!
//! sRGB values are normalized to `[0, 1]`, decoded to linear light,
//! converted to CIE XYZ and finally to CIELAB relative to the D65 white point.
//! All of these steps are delegated to [`palette`].

use palette::{Clamp, IntoColor, Lab, LinSrgb, Srgb, Srgba};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Converts an 8-bit sRGB color to CIELAB (D65).
///
/// The resulting `l` component is always within `0.0..=100.0`.
#[must_use]
pub fn to_lab(color: Srgb<u8>) -> Lab {
    to_linear(color).into_color()
}

/// Converts a CIELAB color back to 8-bit sRGB, clamping colors outside of the sRGB gamut.
#[must_use]
pub fn from_lab(color: Lab) -> Srgb<u8> {
    let linear: LinSrgb = color.into_color();
    from_linear(linear)
}

/// Decodes an 8-bit sRGB color into linear light.
#[must_use]
pub fn to_linear(color: Srgb<u8>) -> LinSrgb {
    color.into_linear()
}

/// Encodes a linear light color as 8-bit sRGB, clamping each component to `[0, 1]` first.
#[must_use]
pub fn from_linear(color: LinSrgb) -> Srgb<u8> {
    Clamp::clamp(color).into_encoding()
}

/// Pairs each sample with its CIELAB value.
pub(crate) fn convert_samples(samples: &[Srgba<u8>]) -> Vec<(Srgba<u8>, Lab)> {
    samples.iter().map(|&color| (color, to_lab(color.color))).collect()
}

/// Pairs each sample with its CIELAB value in parallel.
#[cfg(feature = "threads")]
pub(crate) fn convert_samples_par(samples: &[Srgba<u8>]) -> Vec<(Srgba<u8>, Lab)> {
    samples.par_iter().map(|&color| (color, to_lab(color.color))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lab_eq(actual: Lab, expected: [f32; 3]) {
        let actual = [actual.l, actual.a, actual.b];
        for (a, e) in actual.into_iter().zip(expected) {
            assert!((a - e).abs() < 0.05, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn reference_colors() {
        assert_lab_eq(to_lab(Srgb::new(0, 0, 0)), [0.0, 0.0, 0.0]);
        assert_lab_eq(to_lab(Srgb::new(255, 255, 255)), [100.0, 0.0, 0.0]);
        assert_lab_eq(to_lab(Srgb::new(255, 0, 0)), [53.24, 80.09, 67.20]);
        assert_lab_eq(to_lab(Srgb::new(0, 0, 255)), [32.30, 79.19, -107.86]);
    }

    #[test]
    fn lightness_is_bounded() {
        for v in (0..=255).step_by(15) {
            let colors = [
                Srgb::new(v, 0, 0),
                Srgb::new(0, v, 0),
                Srgb::new(0, 0, v),
                Srgb::new(v, v, v),
            ];
            for color in colors {
                let lab = to_lab(color);
                assert!((0.0..=100.01).contains(&lab.l), "{color:?} -> {lab:?}");
            }
        }
    }

    #[test]
    fn lab_round_trip_of_primaries() {
        for color in [
            Srgb::new(255, 0, 0),
            Srgb::new(0, 255, 0),
            Srgb::new(0, 0, 255),
            Srgb::new(128, 128, 128),
        ] {
            assert_eq!(from_lab(to_lab(color)), color);
        }
    }

    #[test]
    fn out_of_gamut_is_clamped() {
        let color = from_lab(Lab::new(50.0, 200.0, -200.0));
        let linear = to_linear(color);
        assert!(linear.red <= 1.0 && linear.blue <= 1.0 && linear.green >= 0.0);
    }
}
