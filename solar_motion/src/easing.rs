// Easing curves for the tween engine, named the way the animation tables name them
// ("power3.out", "back.out(1.5)", "elastic.out(1, 0.6)", "sine.inOut", "none").

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Which end of the curve the easing shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

/// Easing function for tweens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    /// `power1`..`power4`: polynomial of degree `degree + 1`.
    Power { degree: u8, direction: EaseDirection },
    Sine(EaseDirection),
    Back { direction: EaseDirection, overshoot: f64 },
    Elastic { direction: EaseDirection, amplitude: f64, period: f64 },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Power {
            degree: 1,
            direction: EaseDirection::Out,
        }
    }
}

impl Easing {
    pub fn power(degree: u8, direction: EaseDirection) -> Self {
        Easing::Power { degree, direction }
    }

    pub fn back(direction: EaseDirection, overshoot: f64) -> Self {
        Easing::Back {
            direction,
            overshoot,
        }
    }

    pub fn elastic(direction: EaseDirection, amplitude: f64, period: f64) -> Self {
        Easing::Elastic {
            direction,
            amplitude,
            period,
        }
    }

    /// Evaluate the curve at `t`. Endpoints are exact: `apply(0) == 0`, `apply(1) == 1`.
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::Power { degree, direction } => {
                let exp = i32::from(degree) + 1;
                shape(direction, t, |x| x.powi(exp))
            }
            Easing::Sine(direction) => match direction {
                EaseDirection::In => 1.0 - (t * FRAC_PI_2).cos(),
                EaseDirection::Out => (t * FRAC_PI_2).sin(),
                EaseDirection::InOut => -((PI * t).cos() - 1.0) / 2.0,
            },
            Easing::Back {
                direction,
                overshoot,
            } => shape(direction, t, |x| {
                (overshoot + 1.0) * x * x * x - overshoot * x * x
            }),
            Easing::Elastic {
                direction,
                amplitude,
                period,
            } => {
                let amp = amplitude.max(1.0);
                let period = if period > 0.0 { period } else { 0.3 };
                let phase = period / TAU * (1.0 / amp).asin();
                // Written as the ease-out curve; `shape` mirrors it for the other directions.
                let out = |x: f64| amp * 2f64.powf(-10.0 * x) * ((x - phase) * TAU / period).sin() + 1.0;
                match direction {
                    EaseDirection::Out => out(t),
                    EaseDirection::In => 1.0 - out(1.0 - t),
                    EaseDirection::InOut => {
                        if t < 0.5 {
                            (1.0 - out(1.0 - 2.0 * t)) / 2.0
                        } else {
                            out(2.0 * t - 1.0) / 2.0 + 0.5
                        }
                    }
                }
            }
        }
    }
}

/// Builds the out/in-out variants from an ease-in curve.
fn shape(direction: EaseDirection, t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    match direction {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(2.0 * t) / 2.0
            } else {
                1.0 - ease_in(2.0 * (1.0 - t)) / 2.0
            }
        }
    }
}

impl FromStr for Easing {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "none" || s == "linear" || s == "power0" || s.starts_with("power0.") {
            return Ok(Easing::Linear);
        }

        let invalid = || SiteError::InvalidConfig(format!("unknown easing {s:?}"));

        let (head, args) = match s.find('(') {
            Some(open) => {
                let inner = s[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
                let args = inner
                    .split(',')
                    .map(|a| a.trim().parse::<f64>().map_err(|_| invalid()))
                    .collect::<Result<Vec<_>, _>>()?;
                (&s[..open], args)
            }
            None => (s, Vec::new()),
        };

        let (family, direction) = match head.split_once('.') {
            Some((family, dir)) => {
                let direction = match dir {
                    "in" => EaseDirection::In,
                    "out" => EaseDirection::Out,
                    "inOut" => EaseDirection::InOut,
                    _ => return Err(invalid()),
                };
                (family, direction)
            }
            None => (head, EaseDirection::Out),
        };

        match family {
            "power1" | "quad" => Ok(Easing::power(1, direction)),
            "power2" | "cubic" => Ok(Easing::power(2, direction)),
            "power3" | "quart" => Ok(Easing::power(3, direction)),
            "power4" | "quint" => Ok(Easing::power(4, direction)),
            "sine" => Ok(Easing::Sine(direction)),
            "back" => Ok(Easing::back(direction, args.first().copied().unwrap_or(1.70158))),
            "elastic" => Ok(Easing::elastic(
                direction,
                args.first().copied().unwrap_or(1.0),
                args.get(1).copied().unwrap_or(0.3),
            )),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dir(d: EaseDirection) -> &'static str {
            match d {
                EaseDirection::In => "in",
                EaseDirection::Out => "out",
                EaseDirection::InOut => "inOut",
            }
        }
        match *self {
            Easing::Linear => write!(f, "none"),
            Easing::Power { degree, direction } => write!(f, "power{degree}.{}", dir(direction)),
            Easing::Sine(direction) => write!(f, "sine.{}", dir(direction)),
            Easing::Back {
                direction,
                overshoot,
            } => write!(f, "back.{}({overshoot})", dir(direction)),
            Easing::Elastic {
                direction,
                amplitude,
                period,
            } => write!(f, "elastic.{}({amplitude}, {period})", dir(direction)),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = SiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_easings() -> Vec<Easing> {
        [
            "none",
            "power1.out",
            "power2.in",
            "power3.out",
            "power4.inOut",
            "sine.inOut",
            "sine.in",
            "back.out(1.5)",
            "back.in(1.4)",
            "elastic.out(1, 0.6)",
            "elastic.inOut(1, 0.5)",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect()
    }

    #[test]
    fn parses_table_names() {
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(
            "power3.out".parse::<Easing>().unwrap(),
            Easing::power(3, EaseDirection::Out)
        );
        assert_eq!(
            "back.out(1.5)".parse::<Easing>().unwrap(),
            Easing::back(EaseDirection::Out, 1.5)
        );
        assert_eq!(
            "elastic.out(1, 0.6)".parse::<Easing>().unwrap(),
            Easing::elastic(EaseDirection::Out, 1.0, 0.6)
        );
        assert!("bounce.out".parse::<Easing>().is_err());
        assert!("power2.sideways".parse::<Easing>().is_err());
        assert!("back.out(1.5".parse::<Easing>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for easing in all_easings() {
            let text = easing.to_string();
            assert_eq!(text.parse::<Easing>().unwrap(), easing, "{text}");
        }
    }

    #[test]
    fn endpoints_are_exact() {
        for easing in all_easings() {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing}");
        }
    }

    #[test]
    fn back_out_overshoots() {
        let easing = Easing::back(EaseDirection::Out, 1.5);
        let peak = (1..100)
            .map(|i| easing.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "back.out should overshoot, peak {peak}");
    }

    #[test]
    fn power_in_out_is_symmetric() {
        let easing = Easing::power(2, EaseDirection::InOut);
        assert!((easing.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((easing.apply(0.25) + easing.apply(0.75) - 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn monotonic_families_stay_in_unit_range(t in 0.0f64..=1.0) {
            for name in ["none", "power1.out", "power2.in", "power3.out", "power4.inOut", "sine.inOut"] {
                let easing: Easing = name.parse().unwrap();
                let v = easing.apply(t);
                prop_assert!((0.0..=1.0).contains(&v), "{} at {} gave {}", name, t, v);
            }
        }
    }
}
