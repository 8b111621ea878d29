//! Smoothed "displayed year" and fractional-year interpolation.
//!
//! The scene never jumps between years. Input moves a *target* year; every
//! frame [`TimeCursor::advance`] closes a fixed fraction of the remaining gap
//! and snaps once the gap is smaller than an epsilon. The index value shown
//! for a fractional year is a linear blend of the two surrounding yearly means.

use crate::config::CursorConfig;
use crate::series::{mean, DataProvider};
use std::ops::RangeInclusive;

/// Continuous year position that eases toward a target year.
#[derive(Debug, Clone)]
pub struct TimeCursor {
    current: f32,
    target: f32,
    first_year: i32,
    last_year: i32,
    smoothing: f32,
    epsilon: f32,
}

impl TimeCursor {
    /// Create a cursor resting on the first year of `years`.
    pub fn new(years: RangeInclusive<i32>, config: &CursorConfig) -> Self {
        let first_year = *years.start();
        let last_year = (*years.end()).max(first_year);
        Self {
            current: first_year as f32,
            target: first_year as f32,
            first_year,
            last_year,
            smoothing: config.smoothing,
            epsilon: config.snap_epsilon,
        }
    }

    /// The displayed (rendered) year.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// The year the cursor is easing toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Integer year currently displayed.
    #[inline]
    pub fn current_year(&self) -> i32 {
        (self.current.floor() as i32).clamp(self.first_year, self.last_year)
    }

    /// Whether the displayed year has reached the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Move one frame toward the target. Call exactly once per frame.
    ///
    /// Closes `smoothing` of the gap, never overshooting, and snaps to the
    /// target once the gap is at most the epsilon.
    pub fn advance(&mut self) {
        if (self.current - self.target).abs() > self.epsilon {
            self.current += (self.target - self.current) * self.smoothing;
        } else {
            self.current = self.target;
        }
    }

    /// Set the target year, clamped into the series range.
    pub fn set_target(&mut self, year: f32) {
        let year = if year.is_nan() { self.first_year as f32 } else { year };
        self.target = year.clamp(self.first_year as f32, self.last_year as f32);
    }

    /// Move the target by whole years from its integer part, clamped.
    pub fn step_target(&mut self, years: i32) {
        let base = self.target.floor() as i32;
        self.set_target(base.saturating_add(years) as f32);
    }

    /// Interpolated overall index value at the displayed year.
    pub fn sample_value<D: DataProvider + ?Sized>(&self, data: &D) -> f32 {
        self.interpolate(|year| mean(data.sample(year)))
    }

    /// Interpolated value of one district at the displayed year.
    pub fn sample_district<D: DataProvider + ?Sized>(&self, data: &D, district: usize) -> f32 {
        self.interpolate(|year| mean(data.district_sample(district, year)))
    }

    /// Blend `mean_of(floor(current))` toward `mean_of(floor(current) + 1)` by
    /// the fractional part. Both years are clamped into range first.
    fn interpolate(&self, mean_of: impl Fn(i32) -> f32) -> f32 {
        let year = self.current_year();
        let next = (year + 1).min(self.last_year);
        let frac = (self.current - year as f32).clamp(0.0, 1.0);

        let a = mean_of(year);
        if frac == 0.0 || next == year {
            return a;
        }
        let b = mean_of(next);
        a + (b - a) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{RegionalDataset, TimeSeries};

    fn cursor() -> TimeCursor {
        TimeCursor::new(1993..=2023, &CursorConfig::default())
    }

    fn linear_data() -> RegionalDataset {
        // Year y has constant samples equal to (y - 2000) * 10
        let years = (0..5).map(|i| vec![i as f32 * 10.0; 4]).collect();
        RegionalDataset::new(TimeSeries::new(2000, years).unwrap(), Vec::new()).unwrap()
    }

    #[test]
    fn test_starts_settled_on_first_year() {
        let c = cursor();
        assert_eq!(c.current(), 1993.0);
        assert!(c.is_settled());
    }

    #[test]
    fn test_set_target_clamps() {
        let mut c = cursor();
        c.set_target(3000.0);
        assert_eq!(c.target(), 2023.0);
        c.set_target(-5.0);
        assert_eq!(c.target(), 1993.0);
        c.set_target(f32::NAN);
        assert_eq!(c.target(), 1993.0);
    }

    #[test]
    fn test_step_target() {
        let mut c = cursor();
        c.step_target(1);
        assert_eq!(c.target(), 1994.0);
        c.step_target(-5);
        assert_eq!(c.target(), 1993.0);
    }

    #[test]
    fn test_convergence_is_monotonic_and_exact() {
        for start in [1993.0, 2000.5, 2023.0] {
            for target in [1993.0, 2008.0, 2023.0] {
                let mut c = cursor();
                c.set_target(start);
                for _ in 0..1000 {
                    c.advance();
                }
                assert_eq!(c.current(), start);

                c.set_target(target);
                let mut gap = (c.current() - target).abs();
                let mut steps = 0;
                while c.current() != target {
                    c.advance();
                    let next_gap = (c.current() - target).abs();
                    assert!(next_gap <= gap, "gap grew from {} to {}", gap, next_gap);
                    gap = next_gap;
                    steps += 1;
                    assert!(steps < 400, "did not converge from {} to {}", start, target);
                }
            }
        }
    }

    #[test]
    fn test_sample_value_interpolates_between_means() {
        let data = linear_data();
        let mut c = TimeCursor::new(2000..=2004, &CursorConfig::default());
        c.current = 2001.25;
        let v = c.sample_value(&data);
        assert!((v - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_sample_value_at_last_year_is_exact() {
        let data = linear_data();
        let mut c = TimeCursor::new(2000..=2004, &CursorConfig::default());
        c.set_target(2004.0);
        while !c.is_settled() {
            c.advance();
        }
        assert_eq!(c.sample_value(&data), 40.0);
    }

    #[test]
    fn test_sample_value_bounded_by_neighbour_means() {
        let mut rng = <rand::rngs::SmallRng as rand::SeedableRng>::seed_from_u64(3);
        let data = RegionalDataset::hong_kong(&mut rng);
        let mut c = cursor();
        for step in 0..300 {
            c.current = 1993.0 + step as f32 * 0.1;
            let year = c.current_year();
            let next = (year + 1).min(2023);
            let a = data.overall().mean(year);
            let b = data.overall().mean(next);
            let v = c.sample_value(&data);
            assert!(v >= a.min(b) - 1e-3 && v <= a.max(b) + 1e-3);
        }
    }
}
