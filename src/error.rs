//! Error types for airglow.
//!
//! The per-frame engine never fails. Errors only come out of scene
//! construction (bad configuration or malformed data) and out of writing
//! rendered frames to disk.

use std::fmt;

/// Errors found while validating a [`SceneConfig`](crate::config::SceneConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Screen width or height is zero or not finite.
    InvalidScreen { width: f32, height: f32 },
    /// The ambient particle population is empty.
    NoParticles,
    /// A color ramp has no breakpoints.
    EmptyRamp,
    /// The index domain is empty or inverted.
    InvalidDomain { min: f32, max: f32 },
    /// The year smoothing factor must lie strictly between 0 and 1.
    InvalidSmoothing(f32),
    /// A spawn probability is outside `[0, 1]`.
    InvalidProbability { name: &'static str, value: f64 },
    /// A tuning parameter is not finite or falls below its minimum.
    InvalidParameter { name: &'static str, value: f32 },
    /// The district layout needs at least one column and a positive cell size.
    InvalidLayout,
    /// The data provider's year range is inverted.
    InvalidYears { first: i32, last: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScreen { width, height } => {
                write!(f, "Invalid screen size {}x{}: both sides must be positive", width, height)
            }
            ConfigError::NoParticles => write!(f, "Ambient particle population must be at least 1"),
            ConfigError::EmptyRamp => write!(f, "Color ramp needs at least one breakpoint"),
            ConfigError::InvalidDomain { min, max } => {
                write!(f, "Invalid index domain [{}, {}]: min must be below max", min, max)
            }
            ConfigError::InvalidSmoothing(s) => {
                write!(f, "Smoothing factor {} must be strictly between 0 and 1", s)
            }
            ConfigError::InvalidProbability { name, value } => {
                write!(f, "Probability `{}` = {} is outside [0, 1]", name, value)
            }
            ConfigError::InvalidParameter { name, value } => {
                write!(f, "Parameter `{}` = {} is out of range", name, value)
            }
            ConfigError::InvalidLayout => {
                write!(f, "District layout needs at least one column and a positive cell size")
            }
            ConfigError::InvalidYears { first, last } => {
                write!(f, "Year range {}..={} is empty", first, last)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised when building a time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// The series has no years.
    Empty,
    /// A year has a different number of samples than the first year.
    Ragged { year: i32, expected: usize, found: usize },
    /// A year has no samples at all.
    NoSamples { year: i32 },
    /// District series do not cover the same years as the overall series.
    YearMismatch { district: String },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::Empty => write!(f, "Time series has no years"),
            SeriesError::Ragged { year, expected, found } => write!(
                f,
                "Year {} has {} samples, expected {} like every other year",
                year, found, expected
            ),
            SeriesError::NoSamples { year } => write!(f, "Year {} has no samples", year),
            SeriesError::YearMismatch { district } => {
                write!(f, "District `{}` does not cover the overall year range", district)
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// Errors that can occur when writing a rendered frame.
#[derive(Debug)]
pub enum RenderError {
    /// Failed to encode the frame.
    Image(image::ImageError),
    /// Failed to prepare the output location.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Image(e) => write!(f, "Failed to encode frame: {}", e),
            RenderError::Io(e) => write!(f, "Failed to write frame: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Image(e) => Some(e),
            RenderError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}
