//! Yearly time series and the data-provider seam.
//!
//! The engine treats the dataset as an opaque provider behind the
//! [`DataProvider`] trait: it asks for a year's samples (overall or per
//! district) and never writes back. Years passed to a provider are always
//! clamped to its range first, so providers only ever see in-range queries.
//!
//! [`TimeSeries`] is the validated storage type: every year carries the same
//! number of samples. [`RegionalDataset`] bundles one overall series with any
//! number of named district series and implements [`DataProvider`].

use crate::error::SeriesError;
use rand::Rng;
use std::ops::RangeInclusive;

/// Read-only access to a yearly index dataset.
pub trait DataProvider {
    /// Inclusive range of years covered by every series.
    fn years(&self) -> RangeInclusive<i32>;

    /// Samples for the overall series in `year`.
    fn sample(&self, year: i32) -> &[f32];

    /// Number of districts.
    fn district_count(&self) -> usize;

    /// Display name of a district.
    fn district_name(&self, district: usize) -> &str;

    /// Samples for `district` in `year`.
    fn district_sample(&self, district: usize, year: i32) -> &[f32];

    /// Clamp `year` into [`DataProvider::years`].
    fn clamp_year(&self, year: i32) -> i32 {
        let years = self.years();
        year.clamp(*years.start(), *years.end())
    }
}

impl<T: DataProvider + ?Sized> DataProvider for &T {
    fn years(&self) -> RangeInclusive<i32> {
        (**self).years()
    }

    fn sample(&self, year: i32) -> &[f32] {
        (**self).sample(year)
    }

    fn district_count(&self) -> usize {
        (**self).district_count()
    }

    fn district_name(&self, district: usize) -> &str {
        (**self).district_name(district)
    }

    fn district_sample(&self, district: usize, year: i32) -> &[f32] {
        (**self).district_sample(district, year)
    }
}

/// Arithmetic mean of a sample slice. An empty slice has mean 0.
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Mapping from consecutive years to equally sized sample vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    first_year: i32,
    samples_per_year: usize,
    years: Vec<Vec<f32>>,
}

impl TimeSeries {
    /// Build a series starting at `first_year`, one entry per consecutive year.
    ///
    /// Fails if there are no years, a year is empty, or the sample counts differ.
    pub fn new(first_year: i32, years: Vec<Vec<f32>>) -> Result<Self, SeriesError> {
        let expected = years.first().map(Vec::len).ok_or(SeriesError::Empty)?;
        if expected == 0 {
            return Err(SeriesError::NoSamples { year: first_year });
        }
        for (offset, samples) in years.iter().enumerate() {
            if samples.len() != expected {
                return Err(SeriesError::Ragged {
                    year: first_year + offset as i32,
                    expected,
                    found: samples.len(),
                });
            }
        }
        Ok(Self {
            first_year,
            samples_per_year: expected,
            years,
        })
    }

    /// First covered year.
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last covered year.
    pub fn last_year(&self) -> i32 {
        self.first_year + self.years.len() as i32 - 1
    }

    /// Inclusive year range.
    pub fn year_range(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year()
    }

    /// Number of samples every year carries.
    pub fn samples_per_year(&self) -> usize {
        self.samples_per_year
    }

    /// Samples for `year`, clamped into range.
    pub fn get(&self, year: i32) -> &[f32] {
        let idx = (year.clamp(self.first_year, self.last_year()) - self.first_year) as usize;
        &self.years[idx]
    }

    /// Mean of `year`'s samples, clamped into range.
    pub fn mean(&self, year: i32) -> f32 {
        mean(self.get(year))
    }

    fn map_samples(&self, mut f: impl FnMut(i32, &[f32]) -> Vec<f32>) -> Self {
        let years = self
            .years
            .iter()
            .enumerate()
            .map(|(offset, s)| f(self.first_year + offset as i32, s))
            .collect();
        Self {
            first_year: self.first_year,
            samples_per_year: self.samples_per_year,
            years,
        }
    }
}

/// One overall series plus named district series over the same years.
#[derive(Debug, Clone)]
pub struct RegionalDataset {
    overall: TimeSeries,
    districts: Vec<(String, TimeSeries)>,
}

/// District names of the illustrative Hong Kong dataset.
pub const HONG_KONG_DISTRICTS: [&str; 9] = [
    "Central & Western",
    "Eastern",
    "Southern",
    "Wan Chai",
    "Kowloon City",
    "Kwun Tong",
    "Sham Shui Po",
    "Wong Tai Sin",
    "Yau Tsim Mong",
];

// Monthly baselines for each policy era.
const ERA_1993_2000: [f32; 12] = [85., 95., 80., 75., 70., 65., 90., 100., 85., 80., 75., 70.];
const ERA_2001_2010: [f32; 12] = [70., 75., 65., 60., 55., 50., 80., 85., 70., 65., 60., 55.];
const ERA_2011_2015: [f32; 12] = [55., 60., 50., 45., 40., 35., 65., 70., 55., 50., 45., 40.];
const ERA_2016_2020: [f32; 12] = [40., 45., 35., 30., 25., 20., 50., 55., 40., 35., 30., 25.];
const ERA_2021_2023: [f32; 12] = [35., 40., 30., 25., 20., 15., 45., 50., 35., 30., 25., 20.];

fn era_baseline(year: i32) -> &'static [f32; 12] {
    match year {
        i32::MIN..=2000 => &ERA_1993_2000,
        2001..=2010 => &ERA_2001_2010,
        2011..=2015 => &ERA_2011_2015,
        2016..=2020 => &ERA_2016_2020,
        _ => &ERA_2021_2023,
    }
}

impl RegionalDataset {
    /// Bundle an overall series with district series.
    ///
    /// Every district must cover exactly the overall year range.
    pub fn new(
        overall: TimeSeries,
        districts: Vec<(String, TimeSeries)>,
    ) -> Result<Self, SeriesError> {
        for (name, series) in &districts {
            if series.year_range() != overall.year_range() {
                return Err(SeriesError::YearMismatch {
                    district: name.clone(),
                });
            }
        }
        Ok(Self { overall, districts })
    }

    /// Illustrative 1993-2023 monthly series for Hong Kong.
    ///
    /// Each year starts from its era baseline plus up to ±`5` of noise per
    /// month; each district adds a per-year regional offset of up to ±`10`.
    /// All values are clamped to `[0, 150]`.
    pub fn hong_kong<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let years: Vec<Vec<f32>> = (1993..=2023)
            .map(|year| {
                era_baseline(year)
                    .iter()
                    .map(|base| (base + rng.gen_range(-5.0f32..=5.0)).clamp(0.0, 150.0))
                    .collect::<Vec<f32>>()
            })
            .collect();
        // Infallible: every year has 12 samples.
        let overall = TimeSeries {
            first_year: 1993,
            samples_per_year: 12,
            years,
        };

        let districts = HONG_KONG_DISTRICTS
            .iter()
            .map(|name| {
                let series = overall.map_samples(|_, samples| {
                    let offset: f32 = rng.gen_range(-10.0..=10.0);
                    samples.iter().map(|v| (v + offset).clamp(0.0, 150.0)).collect()
                });
                (name.to_string(), series)
            })
            .collect();

        Self { overall, districts }
    }

    /// The overall series.
    pub fn overall(&self) -> &TimeSeries {
        &self.overall
    }

    /// Series of one district, if it exists.
    pub fn district(&self, district: usize) -> Option<&TimeSeries> {
        self.districts.get(district).map(|(_, s)| s)
    }
}

impl DataProvider for RegionalDataset {
    fn years(&self) -> RangeInclusive<i32> {
        self.overall.year_range()
    }

    fn sample(&self, year: i32) -> &[f32] {
        self.overall.get(year)
    }

    fn district_count(&self) -> usize {
        self.districts.len()
    }

    fn district_name(&self, district: usize) -> &str {
        self.districts
            .get(district)
            .map(|(name, _)| name.as_str())
            .unwrap_or("")
    }

    fn district_sample(&self, district: usize, year: i32) -> &[f32] {
        match self.districts.get(district) {
            Some((_, series)) => series.get(year),
            None => &[],
        }
    }
}
