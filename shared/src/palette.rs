//! Ambient background tint: piecewise-linear interpolation between colors
//! anchored at notable hours of the day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ClockError, ClockResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> ClockResult<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let mut buf = [0u8; 3];
        hex::decode_to_slice(digits, &mut buf).map_err(|_| ClockError::InvalidColor(s.to_string()))?;
        Ok(Self::new(buf[0], buf[1], buf[2]))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// One configurable anchor, as it appears in [`crate::ClockConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub hour: f64,
    pub color: String,
}

/// Midnight, dawn, morning, noon, dusk, evening, night.
pub const DAY_CYCLE: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(0x0a, 0x0a, 0x14)),
    (5.0, Rgb::new(0x97, 0x73, 0x9e)),
    (8.0, Rgb::new(0x29, 0x80, 0xb9)),
    (12.0, Rgb::new(0x64, 0xc9, 0xed)),
    (17.0, Rgb::new(0xd3, 0x54, 0x00)),
    (19.0, Rgb::new(0x2c, 0x3e, 0x50)),
    (22.0, Rgb::new(0x0f, 0x0f, 0x0f)),
];

/// Sorted anchor table with at least two distinct hours, so every bracket
/// has a non-zero width.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    anchors: Vec<(f64, Rgb)>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::day_cycle()
    }
}

impl Palette {
    #[must_use]
    pub fn day_cycle() -> Self {
        Self {
            anchors: DAY_CYCLE.to_vec(),
        }
    }

    pub fn new(mut anchors: Vec<(f64, Rgb)>) -> ClockResult<Self> {
        if let Some((hour, _)) = anchors
            .iter()
            .find(|(h, _)| !h.is_finite() || !(0.0..24.0).contains(h))
        {
            return Err(ClockError::InvalidPalette {
                reason: format!("anchor hour {hour} is outside [0, 24)"),
            });
        }

        anchors.sort_by(|a, b| a.0.total_cmp(&b.0));

        if anchors.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(ClockError::InvalidPalette {
                reason: "anchor hours must be distinct".into(),
            });
        }

        if anchors.len() < 2 {
            return Err(ClockError::InvalidPalette {
                reason: format!("need at least two anchors, got {}", anchors.len()),
            });
        }

        Ok(Self { anchors })
    }

    pub fn from_specs(specs: &[AnchorSpec]) -> ClockResult<Self> {
        let anchors = specs
            .iter()
            .map(|s| Ok((s.hour, Rgb::from_hex(&s.color)?)))
            .collect::<ClockResult<Vec<_>>>()?;
        Self::new(anchors)
    }

    #[must_use]
    pub fn anchors(&self) -> &[(f64, Rgb)] {
        &self.anchors
    }

    #[must_use]
    pub fn to_specs(&self) -> Vec<AnchorSpec> {
        self.anchors
            .iter()
            .map(|(hour, color)| AnchorSpec {
                hour: *hour,
                color: color.to_hex(),
            })
            .collect()
    }

    /// Color for a fractional hour of day. Periodic over 24h.
    #[must_use]
    pub fn interpolate(&self, hour_fraction: f64) -> Rgb {
        let h = if hour_fraction.is_finite() {
            hour_fraction.rem_euclid(24.0)
        } else {
            0.0
        };

        let ((h1, c1), (h2, c2)) = self.bracket(h);
        let ratio = (h - h1) / (h2 - h1);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * ratio;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let v = v.round().clamp(0.0, 255.0) as u8;
            v
        };

        Rgb::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b))
    }

    /// Anchors around `h`; the hours are unwrapped so that `h1 <= h < h2`.
    fn bracket(&self, h: f64) -> ((f64, Rgb), (f64, Rgb)) {
        let first = self.anchors[0];
        let last = self.anchors[self.anchors.len() - 1];

        if h >= last.0 {
            return (last, (first.0 + 24.0, first.1));
        }
        if h < first.0 {
            return ((last.0 - 24.0, last.1), first);
        }

        self.anchors
            .windows(2)
            .find(|w| h >= w[0].0 && h < w[1].0)
            .map_or((first, self.anchors[1]), |w| (w[0], w[1]))
    }
}
