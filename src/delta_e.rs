//! Perceptual color difference (delta E) formulas on CIELAB colors.

use palette::{
    color_difference::{Ciede2000, DeltaE},
    Lab,
};

/// Two colors closer than this under CIE76 are, on average, indistinguishable to a human observer.
pub const JND_THRESHOLD: f32 = 2.3;

/// The default merge threshold, which is large enough to combine similar shades.
pub const DEFAULT_THRESHOLD: f32 = 10.0;

/// The set of supported delta E formulas.
///
/// Each successive formula is more perceptually accurate but more expensive to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceFormula {
    /// Euclidean distance in CIELAB.
    Cie76,
    /// CIE94 using the graphic arts weighting factors.
    ///
    /// Like [`DistanceFormula::Cmc`], this formula weights by the chroma
    /// of the first color, so it is not symmetric.
    #[default]
    Cie94,
    /// CIEDE2000.
    Ciede2000,
    /// CMC l:c with `l = 2` and `c = 1` (the acceptability variant).
    ///
    /// Note that this formula is not symmetric:
    /// the first color is treated as the reference.
    Cmc,
}

impl DistanceFormula {
    /// Computes the difference between `reference` and `sample`.
    #[must_use]
    pub fn distance(self, reference: Lab, sample: Lab) -> f32 {
        match self {
            Self::Cie76 => reference.delta_e(sample),
            Self::Cie94 => cie94(reference, sample),
            Self::Ciede2000 => reference.difference(sample),
            Self::Cmc => cmc(reference, sample),
        }
    }

    /// The smaller of the distances measured from either color.
    ///
    /// This is symmetric for every formula, so `separation(a, b) >= threshold`
    /// implies that both `distance(a, b)` and `distance(b, a)` are at least `threshold`.
    #[must_use]
    pub fn separation(self, a: Lab, b: Lab) -> f32 {
        match self {
            Self::Cie76 | Self::Ciede2000 => self.distance(a, b),
            Self::Cie94 | Self::Cmc => self.distance(a, b).min(self.distance(b, a)),
        }
    }
}

fn chroma(color: Lab) -> f32 {
    color.a.hypot(color.b)
}

/// The square of the hue difference, computed without the hue angle.
fn delta_h_squared(reference: Lab, sample: Lab, delta_c: f32) -> f32 {
    let da = reference.a - sample.a;
    let db = reference.b - sample.b;
    (da * da + db * db - delta_c * delta_c).max(0.0)
}

fn cie94(reference: Lab, sample: Lab) -> f32 {
    const K1: f32 = 0.045;
    const K2: f32 = 0.015;

    let c1 = chroma(reference);
    let c2 = chroma(sample);
    let dl = reference.l - sample.l;
    let dc = c1 - c2;
    let dh2 = delta_h_squared(reference, sample, dc);

    let sc = 1.0 + K1 * c1;
    let sh = 1.0 + K2 * c1;

    let dc = dc / sc;
    (dl * dl + dc * dc + dh2 / (sh * sh)).sqrt()
}

fn cmc(reference: Lab, sample: Lab) -> f32 {
    const L: f32 = 2.0;
    const C: f32 = 1.0;

    let c1 = chroma(reference);
    let c2 = chroma(sample);
    let dl = reference.l - sample.l;
    let dc = c1 - c2;
    let dh2 = delta_h_squared(reference, sample, dc);

    let h1 = {
        let h = reference.b.atan2(reference.a).to_degrees();
        if h < 0.0 {
            h + 360.0
        } else {
            h
        }
    };

    let sl = if reference.l < 16.0 {
        0.511
    } else {
        0.040975 * reference.l / (1.0 + 0.01765 * reference.l)
    };
    let sc = 0.0638 * c1 / (1.0 + 0.0131 * c1) + 0.638;

    let c1_4 = c1.powi(4);
    let f = (c1_4 / (c1_4 + 1900.0)).sqrt();
    let t = if (164.0..=345.0).contains(&h1) {
        0.56 + (0.2 * (h1 + 168.0).to_radians().cos()).abs()
    } else {
        0.36 + (0.4 * (h1 + 35.0).to_radians().cos()).abs()
    };
    let sh = sc * (f * t + 1.0 - f);

    let dl = dl / (L * sl);
    let dc = dc / (C * sc);
    (dl * dl + dc * dc + dh2 / (sh * sh)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMULAS: [DistanceFormula; 4] = [
        DistanceFormula::Cie76,
        DistanceFormula::Cie94,
        DistanceFormula::Ciede2000,
        DistanceFormula::Cmc,
    ];

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    #[test]
    fn identical_colors_have_zero_distance() {
        let color = Lab::new(53.2, 80.1, 67.2);
        for formula in FORMULAS {
            assert_close(formula.distance(color, color), 0.0);
        }
    }

    #[test]
    fn cie76_is_euclidean() {
        let a = Lab::new(50.0, 0.0, 0.0);
        let b = Lab::new(53.0, 4.0, 0.0);
        assert_close(DistanceFormula::Cie76.distance(a, b), 5.0);
    }

    #[test]
    fn ciede2000_reference_pairs() {
        // Sharma, Wu & Dalal (2005) test data.
        let pairs = [
            ([50.0, 2.6772, -79.7751], [50.0, 0.0, -82.7485], 2.0425),
            ([50.0, 3.1571, -77.2803], [50.0, 0.0, -82.7485], 2.8615),
            ([50.0, 2.5, 0.0], [50.0, 0.0, -2.5], 4.3065),
            ([50.0, 2.5, 0.0], [73.0, 25.0, -18.0], 27.1492),
        ];

        for ([l1, a1, b1], [l2, a2, b2], expected) in pairs {
            let (a, b) = (Lab::new(l1, a1, b1), Lab::new(l2, a2, b2));
            let d = DistanceFormula::Ciede2000.distance(a, b);
            assert!((d - expected).abs() < 1e-2, "{d} != {expected}");
        }
    }

    #[test]
    fn cie94_lightness_only() {
        let a = Lab::new(50.0, 0.0, 0.0);
        let b = Lab::new(60.0, 0.0, 0.0);
        assert_close(DistanceFormula::Cie94.distance(a, b), 10.0);
    }

    #[test]
    fn cie94_weights_chroma_differences_down() {
        let a = Lab::new(50.0, 60.0, 0.0);
        let b = Lab::new(50.0, 50.0, 0.0);
        let cie76 = DistanceFormula::Cie76.distance(a, b);
        let cie94 = DistanceFormula::Cie94.distance(a, b);
        assert_close(cie94, 10.0 / (1.0 + 0.045 * 60.0));
        assert!(cie94 < cie76);
    }

    #[test]
    fn separation_is_symmetric() {
        let gray = Lab::new(50.0, 0.0, 0.0);
        let tinted = Lab::new(52.0, 20.0, 10.0);

        let forward = DistanceFormula::Cie94.distance(gray, tinted);
        let backward = DistanceFormula::Cie94.distance(tinted, gray);
        assert!(backward < forward);

        for formula in FORMULAS {
            let separation = formula.separation(gray, tinted);
            assert_close(separation, formula.separation(tinted, gray));
            assert!(separation <= formula.distance(gray, tinted));
            assert!(separation <= formula.distance(tinted, gray));
        }
        assert_close(DistanceFormula::Cie94.separation(gray, tinted), backward);
    }

    #[test]
    fn cmc_lightness_only() {
        let a = Lab::new(10.0, 0.0, 0.0);
        let b = Lab::new(12.0, 0.0, 0.0);
        // below L = 16 the lightness weight is fixed
        assert_close(DistanceFormula::Cmc.distance(a, b), 2.0 / (2.0 * 0.511));
    }

    #[test]
    fn distances_are_non_negative() {
        let colors = [
            Lab::new(0.0, 0.0, 0.0),
            Lab::new(100.0, 0.0, 0.0),
            Lab::new(53.2, 80.1, 67.2),
            Lab::new(32.3, 79.2, -107.9),
            Lab::new(87.7, -86.2, 83.2),
        ];
        for formula in FORMULAS {
            for &a in &colors {
                for &b in &colors {
                    let d = formula.distance(a, b);
                    assert!(d.is_finite() && d >= 0.0, "{formula:?} {a:?} {b:?} = {d}");
                }
            }
        }
    }
}
