//! Whole-series statistics for the statistics overlay.

use crate::series::{mean, DataProvider};

/// Summary of the overall series by yearly mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    /// Year with the lowest mean (first one on ties).
    pub best_year: i32,
    pub best_mean: f32,
    /// Year with the highest mean (first one on ties).
    pub worst_year: i32,
    pub worst_mean: f32,
    /// Average drop in the yearly mean per year, first year to last.
    /// Positive means the air got cleaner.
    pub yearly_improvement: f32,
}

impl SeriesStats {
    pub fn compute<D: DataProvider + ?Sized>(data: &D) -> Self {
        let years = data.years();
        let (first, last) = (*years.start(), *years.end());

        let mut best = (first, f32::INFINITY);
        let mut worst = (first, f32::NEG_INFINITY);
        for year in years {
            let m = mean(data.sample(year));
            if m < best.1 {
                best = (year, m);
            }
            if m > worst.1 {
                worst = (year, m);
            }
        }

        let span = (last - first) as f32;
        let yearly_improvement = if span > 0.0 {
            (mean(data.sample(first)) - mean(data.sample(last))) / span
        } else {
            0.0
        };

        Self {
            best_year: best.0,
            best_mean: best.1,
            worst_year: worst.0,
            worst_mean: worst.1,
            yearly_improvement,
        }
    }
}
