//! # Tapered Width and Compensation Curve
//!
//! Two small models used by the tapered template variant:
//!
//! - **Half-width**: the neck widens linearly from `width_at_nut` to `width_at_heel`
//!   over the modeled fretboard length.
//! - **Lateral offset**: a sine wave with a period of half the scale length, scaled by
//!   the local half-width, so the marker line zig-zags between the tapered edges.
//!
//! Both are pure functions of a position; nothing is cached between frets.

use std::f64::consts::TAU;

/// Neck widths at both ends of the modeled fretboard, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Taper {
    pub width_at_nut: f64,
    pub width_at_heel: f64,
}

impl Taper {
    /// Half the neck width at `position` inches from the nut.
    pub fn half_width(&self, position: f64, fretboard_length: f64) -> f64 {
        let t = position / fretboard_length;
        (self.width_at_nut + (self.width_at_heel - self.width_at_nut) * t) / 2.0
    }

    /// Signed distance from the centerline of the compensation curve at `position`.
    pub fn lateral_offset(&self, position: f64, fretboard_length: f64, scale_length: f64) -> f64 {
        let period = scale_length / 2.0;
        self.half_width(position, fretboard_length) * (TAU * position / period).sin()
    }
}
