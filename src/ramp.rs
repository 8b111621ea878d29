//! Piecewise-linear color ramps.
//!
//! A [`ColorRamp`] maps a scalar index value onto a gradient of evenly spaced
//! breakpoint colors. Every component that turns an index value into a color
//! (district cells, explosions fired from the keyboard, click feedback) goes
//! through [`ColorRamp::color_at`].
//!
//! Colors are linear RGB in `0.0..=1.0`, stored as [`Vec3`] like the rest of
//! the crate.
//!
//! # Example
//!
//! ```
//! use airglow::ramp::ColorRamp;
//!
//! let ramp = ColorRamp::aqi();
//! let first = ramp.color_at(-10.0, 0.0, 150.0);
//! assert_eq!(first, ramp.stops()[0]);
//! ```

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Build a color from 8-bit channels.
pub fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// The six AQI category colors, good to hazardous.
pub const AQI_COLORS: [Vec3; 6] = [
    Vec3::new(50.0 / 255.0, 205.0 / 255.0, 50.0 / 255.0), // Good
    Vec3::new(1.0, 1.0, 0.0),                            // Moderate
    Vec3::new(1.0, 165.0 / 255.0, 0.0),                  // Unhealthy for sensitive groups
    Vec3::new(1.0, 69.0 / 255.0, 0.0),                   // Unhealthy
    Vec3::new(1.0, 0.0, 0.0),                            // Very unhealthy
    Vec3::new(128.0 / 255.0, 0.0, 0.0),                  // Hazardous
];

/// Colors cycled through by the rainbow trail, red to violet.
pub const RAINBOW: [Vec3; 7] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 127.0 / 255.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(75.0 / 255.0, 0.0, 130.0 / 255.0),
    Vec3::new(148.0 / 255.0, 0.0, 211.0 / 255.0),
];

/// Highlight color used for timeline and selection feedback.
pub const HIGHLIGHT: Vec3 = Vec3::new(1.0, 215.0 / 255.0, 0.0);

/// Scene background.
pub const BACKGROUND: Vec3 = Vec3::new(10.0 / 255.0, 10.0 / 255.0, 30.0 / 255.0);

/// Three-band coloring used by data sparkles: green below 50, yellow below
/// 100, red above.
pub fn sparkle_band(value: f32) -> Vec3 {
    if value < 50.0 {
        Vec3::new(0.0, 1.0, 0.0)
    } else if value < 100.0 {
        Vec3::new(1.0, 1.0, 0.0)
    } else {
        Vec3::new(1.0, 0.0, 0.0)
    }
}

/// Evenly spaced gradient over an arbitrary value domain.
///
/// The ramp holds only its breakpoint colors; the domain is supplied per call
/// so one ramp can serve several value ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    stops: Vec<Vec3>,
}

impl ColorRamp {
    /// Create a ramp from its breakpoint colors, lowest value first.
    pub fn new(stops: Vec<Vec3>) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::EmptyRamp);
        }
        Ok(Self { stops })
    }

    /// The AQI gradient (green through maroon).
    pub fn aqi() -> Self {
        Self {
            stops: AQI_COLORS.to_vec(),
        }
    }

    /// Breakpoint colors in ascending order.
    pub fn stops(&self) -> &[Vec3] {
        &self.stops
    }

    /// Color for `value` within `[domain_min, domain_max]`.
    ///
    /// Values at or below the domain minimum return the first stop exactly,
    /// values at or above the maximum return the last stop exactly. NaN is
    /// treated as the minimum. In between, each channel is interpolated
    /// linearly inside the enclosing segment.
    pub fn color_at(&self, value: f32, domain_min: f32, domain_max: f32) -> Vec3 {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if value.is_nan() || value <= domain_min {
            return first;
        }
        if value >= domain_max || self.stops.len() == 1 {
            return last;
        }

        let segments = self.stops.len() - 1;
        let section_size = (domain_max - domain_min) / segments as f32;
        let position = (value - domain_min) / section_size;
        let section = (position.floor() as usize).min(segments - 1);
        let frac = (position - section as f32).clamp(0.0, 1.0);

        let c1 = self.stops[section];
        let c2 = self.stops[section + 1];
        c1 + (c2 - c1) * frac
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::aqi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_empty_ramp_rejected() {
        assert_eq!(ColorRamp::new(Vec::new()), Err(ConfigError::EmptyRamp));
    }

    #[test]
    fn test_below_domain_returns_first_stop() {
        let ramp = ColorRamp::aqi();
        for v in [-1000.0, -1.0, 0.0] {
            assert_eq!(ramp.color_at(v, 0.0, 150.0), AQI_COLORS[0]);
        }
        assert_eq!(ramp.color_at(f32::NAN, 0.0, 150.0), AQI_COLORS[0]);
    }

    #[test]
    fn test_above_domain_returns_last_stop() {
        let ramp = ColorRamp::aqi();
        for v in [150.0, 151.0, 1.0e9, f32::INFINITY] {
            assert_eq!(ramp.color_at(v, 0.0, 150.0), AQI_COLORS[5]);
        }
    }

    #[test]
    fn test_breakpoints_are_exact() {
        // 6 stops over [0, 150] -> breakpoints every 30
        let ramp = ColorRamp::aqi();
        for (i, stop) in AQI_COLORS.iter().enumerate().take(5) {
            let v = i as f32 * 30.0;
            assert_eq!(ramp.color_at(v, 0.0, 150.0), *stop);
        }
    }

    #[test]
    fn test_continuity_at_breakpoints() {
        let ramp = ColorRamp::aqi();
        for i in 1..5 {
            let v = i as f32 * 30.0;
            let below = ramp.color_at(v - 1e-4, 0.0, 150.0);
            let above = ramp.color_at(v + 1e-4, 0.0, 150.0);
            assert!(approx(below, AQI_COLORS[i]));
            assert!(approx(above, AQI_COLORS[i]));
        }
    }

    #[test]
    fn test_midpoint_interpolates_each_channel() {
        let ramp = ColorRamp::new(vec![Vec3::ZERO, Vec3::new(1.0, 0.5, 0.25)]).unwrap();
        let mid = ramp.color_at(5.0, 0.0, 10.0);
        assert!(approx(mid, Vec3::new(0.5, 0.25, 0.125)));
    }

    #[test]
    fn test_single_stop_ramp() {
        let ramp = ColorRamp::new(vec![Vec3::ONE]).unwrap();
        assert_eq!(ramp.color_at(3.0, 0.0, 10.0), Vec3::ONE);
    }

    #[test]
    fn test_sparkle_bands() {
        assert_eq!(sparkle_band(10.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sparkle_band(50.0), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(sparkle_band(100.0), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgb8() {
        assert!(approx(rgb8(255, 0, 51), Vec3::new(1.0, 0.0, 0.2)));
    }
}
