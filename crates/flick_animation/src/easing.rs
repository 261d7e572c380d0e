//! Easing curve table
//!
//! The named time-to-progress curves used by momentum scrolling and
//! programmatic scroll animation. Every curve is a pure function exposed
//! through the classic tweening contract
//! `ease(elapsed, begin, change, duration)`, which interpolates from `begin`
//! to `begin + change` as `elapsed` runs from `0` to `duration`.
//!
//! `Swing` delegates to the engine-wide default curve ([`Easing::OutQuad`]),
//! matching hosts that treat "swing" as "whatever the default is".

use std::f32::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named easing curve
///
/// `In*` variants accelerate, `Out*` variants decelerate, `InOut*` variants
/// do both. Serialized as kebab-case names (`"out-quad"`, `"in-out-bounce"`)
/// so curves can be picked from config files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Delegates to the default curve
    Swing,
    InQuad,
    #[default]
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

/// Back overshoot amount
const BACK_C1: f32 = 1.70158;
/// Elastic period constants
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

impl Easing {
    /// Every curve with its kebab-case name, in declaration order
    pub const ALL: [(&'static str, Easing); 32] = [
        ("linear", Easing::Linear),
        ("swing", Easing::Swing),
        ("in-quad", Easing::InQuad),
        ("out-quad", Easing::OutQuad),
        ("in-out-quad", Easing::InOutQuad),
        ("in-cubic", Easing::InCubic),
        ("out-cubic", Easing::OutCubic),
        ("in-out-cubic", Easing::InOutCubic),
        ("in-quart", Easing::InQuart),
        ("out-quart", Easing::OutQuart),
        ("in-out-quart", Easing::InOutQuart),
        ("in-quint", Easing::InQuint),
        ("out-quint", Easing::OutQuint),
        ("in-out-quint", Easing::InOutQuint),
        ("in-sine", Easing::InSine),
        ("out-sine", Easing::OutSine),
        ("in-out-sine", Easing::InOutSine),
        ("in-expo", Easing::InExpo),
        ("out-expo", Easing::OutExpo),
        ("in-out-expo", Easing::InOutExpo),
        ("in-circ", Easing::InCirc),
        ("out-circ", Easing::OutCirc),
        ("in-out-circ", Easing::InOutCirc),
        ("in-elastic", Easing::InElastic),
        ("out-elastic", Easing::OutElastic),
        ("in-out-elastic", Easing::InOutElastic),
        ("in-back", Easing::InBack),
        ("out-back", Easing::OutBack),
        ("in-out-back", Easing::InOutBack),
        ("in-bounce", Easing::InBounce),
        ("out-bounce", Easing::OutBounce),
        ("in-out-bounce", Easing::InOutBounce),
    ];

    /// The curve `Swing` resolves to
    pub fn default_curve() -> Easing {
        Easing::OutQuad
    }

    /// Kebab-case name of this curve
    pub fn name(self) -> &'static str {
        Easing::ALL
            .iter()
            .find(|(_, e)| *e == self)
            .map(|(name, _)| *name)
            .unwrap_or("linear")
    }

    /// Interpolated value after `elapsed` of `duration`, moving `change`
    /// away from `begin`.
    ///
    /// `elapsed` is clamped to `[0, duration]`. A non-positive `duration`
    /// is treated as already complete, so this never divides by zero.
    pub fn ease(self, elapsed: f32, begin: f32, change: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            return begin + change;
        }
        let p = (elapsed / duration).clamp(0.0, 1.0);
        begin + change * self.progress(p)
    }

    /// Normalized progress for `p` in `[0, 1]`
    ///
    /// Monotonic 0-to-1 for most families; `Elastic` and `Back` intentionally
    /// leave `[0, 1]` mid-curve.
    pub fn progress(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::Swing => Easing::default_curve().progress(p),

            Easing::InQuad => p * p,
            Easing::OutQuad => p * (2.0 - p),
            Easing::InOutQuad => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
                }
            }

            Easing::InCubic => p * p * p,
            Easing::OutCubic => 1.0 - (1.0 - p).powi(3),
            Easing::InOutCubic => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
                }
            }

            Easing::InQuart => p.powi(4),
            Easing::OutQuart => 1.0 - (1.0 - p).powi(4),
            Easing::InOutQuart => {
                if p < 0.5 {
                    8.0 * p.powi(4)
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(4) / 2.0
                }
            }

            Easing::InQuint => p.powi(5),
            Easing::OutQuint => 1.0 - (1.0 - p).powi(5),
            Easing::InOutQuint => {
                if p < 0.5 {
                    16.0 * p.powi(5)
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(5) / 2.0
                }
            }

            Easing::InSine => 1.0 - (p * PI / 2.0).cos(),
            Easing::OutSine => (p * PI / 2.0).sin(),
            Easing::InOutSine => -((PI * p).cos() - 1.0) / 2.0,

            Easing::InExpo => {
                if p <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * p - 10.0)
                }
            }
            Easing::OutExpo => {
                if p >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * p)
                }
            }
            Easing::InOutExpo => {
                if p <= 0.0 {
                    0.0
                } else if p >= 1.0 {
                    1.0
                } else if p < 0.5 {
                    2f32.powf(20.0 * p - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * p + 10.0)) / 2.0
                }
            }

            Easing::InCirc => 1.0 - (1.0 - p * p).max(0.0).sqrt(),
            Easing::OutCirc => (1.0 - (p - 1.0).powi(2)).max(0.0).sqrt(),
            Easing::InOutCirc => {
                if p < 0.5 {
                    (1.0 - (1.0 - (2.0 * p).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * p + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }

            Easing::InElastic => {
                if p <= 0.0 {
                    0.0
                } else if p >= 1.0 {
                    1.0
                } else {
                    -(2f32.powf(10.0 * p - 10.0)) * ((p * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Easing::OutElastic => {
                if p <= 0.0 {
                    0.0
                } else if p >= 1.0 {
                    1.0
                } else {
                    2f32.powf(-10.0 * p) * ((p * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Easing::InOutElastic => {
                if p <= 0.0 {
                    0.0
                } else if p >= 1.0 {
                    1.0
                } else if p < 0.5 {
                    -(2f32.powf(20.0 * p - 10.0) * ((20.0 * p - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    2f32.powf(-20.0 * p + 10.0) * ((20.0 * p - 11.125) * ELASTIC_C5).sin() / 2.0
                        + 1.0
                }
            }

            Easing::InBack => {
                let c3 = BACK_C1 + 1.0;
                c3 * p * p * p - BACK_C1 * p * p
            }
            Easing::OutBack => {
                let c3 = BACK_C1 + 1.0;
                1.0 + c3 * (p - 1.0).powi(3) + BACK_C1 * (p - 1.0).powi(2)
            }
            Easing::InOutBack => {
                let c2 = BACK_C1 * 1.525;
                if p < 0.5 {
                    ((2.0 * p).powi(2) * ((c2 + 1.0) * 2.0 * p - c2)) / 2.0
                } else {
                    ((2.0 * p - 2.0).powi(2) * ((c2 + 1.0) * (p * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }

            Easing::InBounce => 1.0 - Easing::OutBounce.progress(1.0 - p),
            Easing::OutBounce => bounce_out(p),
            Easing::InOutBounce => {
                if p < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * p)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * p - 1.0)) / 2.0
                }
            }
        }
    }
}

fn bounce_out(p: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if p < 1.0 / D1 {
        N1 * p * p
    } else if p < 2.0 / D1 {
        let p = p - 1.5 / D1;
        N1 * p * p + 0.75
    } else if p < 2.5 / D1 {
        let p = p - 2.25 / D1;
        N1 * p * p + 0.9375
    } else {
        let p = p - 2.625 / D1;
        N1 * p * p + 0.984375
    }
}

impl FromStr for Easing {
    type Err = flick_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, e)| *e)
            .ok_or_else(|| flick_core::Error::InvalidConfig(format!("unknown easing curve: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_for_every_curve() {
        for (name, easing) in Easing::ALL {
            assert!(
                easing.progress(0.0).abs() < 1e-4,
                "{name} should start at 0, got {}",
                easing.progress(0.0)
            );
            assert!(
                (easing.progress(1.0) - 1.0).abs() < 1e-4,
                "{name} should end at 1, got {}",
                easing.progress(1.0)
            );
        }
    }

    #[test]
    fn test_out_quad_shape() {
        assert!((Easing::OutQuad.progress(0.5) - 0.75).abs() < 1e-6);
        // Decelerating: first half covers more ground than the second
        assert!(Easing::OutQuad.progress(0.5) > 0.5);
    }

    #[test]
    fn test_swing_delegates_to_default() {
        for p in [0.0, 0.1, 0.33, 0.5, 0.77, 1.0] {
            assert_eq!(Easing::Swing.progress(p), Easing::default_curve().progress(p));
        }
    }

    #[test]
    fn test_ease_contract() {
        // ease(t, b, c, d) maps [0, d] onto [b, b + c]
        let v = Easing::Linear.ease(50.0, 100.0, 200.0, 100.0);
        assert!((v - 200.0).abs() < 1e-4);
        assert_eq!(Easing::OutCubic.ease(0.0, 5.0, 10.0, 100.0), 5.0);
        assert!((Easing::OutCubic.ease(100.0, 5.0, 10.0, 100.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        assert_eq!(Easing::OutQuad.ease(0.0, 1.0, 9.0, 0.0), 10.0);
        assert_eq!(Easing::OutElastic.ease(123.0, 1.0, 9.0, -5.0), 10.0);
    }

    #[test]
    fn test_no_nan_anywhere() {
        for (name, easing) in Easing::ALL {
            for i in 0..=100 {
                let p = i as f32 / 100.0;
                assert!(
                    easing.progress(p).is_finite(),
                    "{name} produced non-finite value at p={p}"
                );
            }
        }
    }

    #[test]
    fn test_monotonic_quad_family() {
        for easing in [Easing::InQuad, Easing::OutQuad, Easing::InOutQuad] {
            let mut prev = easing.progress(0.0);
            for i in 1..=100 {
                let v = easing.progress(i as f32 / 100.0);
                assert!(v >= prev - 1e-6);
                prev = v;
            }
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("out-quad".parse::<Easing>().unwrap(), Easing::OutQuad);
        assert_eq!(
            "in-out-bounce".parse::<Easing>().unwrap(),
            Easing::InOutBounce
        );
        assert!("ease-out-quad".parse::<Easing>().is_err());
        for (name, easing) in Easing::ALL {
            assert_eq!(name.parse::<Easing>().unwrap(), easing);
            assert_eq!(easing.name(), name);
        }
    }
}
