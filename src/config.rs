//! Scene configuration.
//!
//! One immutable [`SceneConfig`] value describes the whole scene: screen
//! size, ambient population, cursor smoothing, spawn probabilities, the
//! district layout and the color ramp. [`Scene::new`](crate::Scene::new)
//! validates it once and hands each component the piece it needs; nothing
//! reads configuration from globals.
//!
//! ```
//! use airglow::config::SceneConfig;
//!
//! let config = SceneConfig::new()
//!     .with_screen_size(800.0, 600.0)
//!     .with_particle_count(500)
//!     .with_seed(42)
//!     .with_fixed_timestep(1.0 / 60.0);
//! assert!(config.validate().is_ok());
//! ```
//!
//! All types round-trip through serde, so a scene can be described in JSON.

use crate::error::ConfigError;
use crate::ramp::ColorRamp;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Output surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Shared ambient appearance for index values below `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppearanceBand {
    /// Exclusive upper bound of the band. The last band also catches
    /// everything above it.
    pub upper: f32,
    pub color: Vec3,
    pub size: f32,
    pub speed: f32,
}

/// Ambient particle population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Number of ambient particles, fixed for the life of the scene.
    pub count: usize,
    /// Pseudo-depth half range: `z` stays within `[-z_max, z_max]`.
    pub z_max: f32,
    /// Maximum heading change per frame in radians.
    pub heading_jitter: f32,
    /// Appearance bands in ascending order of `upper`.
    pub bands: Vec<AppearanceBand>,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 200,
            z_max: 50.0,
            heading_jitter: 0.1,
            bands: vec![
                AppearanceBand {
                    upper: 50.0,
                    color: Vec3::new(50.0 / 255.0, 205.0 / 255.0, 50.0 / 255.0),
                    size: 3.0,
                    speed: 1.0,
                },
                AppearanceBand {
                    upper: 100.0,
                    color: Vec3::new(1.0, 1.0, 0.0),
                    size: 4.0,
                    speed: 1.5,
                },
                AppearanceBand {
                    upper: 150.0,
                    color: Vec3::new(1.0, 165.0 / 255.0, 0.0),
                    size: 5.0,
                    speed: 2.0,
                },
                AppearanceBand {
                    upper: 150.0,
                    color: Vec3::new(1.0, 0.0, 0.0),
                    size: 6.0,
                    speed: 2.5,
                },
            ],
        }
    }
}

/// Year smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Fraction of the remaining gap closed per frame, in `(0, 1)`.
    pub smoothing: f32,
    /// Gap below which the displayed year snaps to the target.
    pub snap_epsilon: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.05,
            snap_epsilon: 0.01,
        }
    }
}

/// Spawn triggers and interaction tuning for transient effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Index value above which fog may roll in.
    pub fog_threshold: f32,
    /// Index value below which rain may fall.
    pub rain_threshold: f32,
    /// Per-frame chance of fog while above the fog threshold.
    pub fog_probability: f64,
    /// Per-frame chance of rain while below the rain threshold.
    pub rain_probability: f64,
    /// Per-frame chance that sparkles are considered at all.
    pub sparkle_probability: f64,
    /// Per-district chance once the sparkle gate passed.
    pub sparkle_region_probability: f64,
    /// Per-frame chance of spawning floating particles under a hovering pointer.
    pub hover_probability: f64,
    /// Floating particles spawned per successful hover roll.
    pub hover_particles: usize,
    /// Floating particles spawned by a click on a district.
    pub click_particles: usize,
    /// Floating particles spawned by a click on the timeline.
    pub timeline_particles: usize,
    /// Sub-particles in an explosion fired from the keyboard.
    pub explosion_intensity: usize,
    /// Pointer travel needed before the rainbow trail gains a point.
    pub trail_min_distance: f32,
    /// Frames a rainbow trail point lives.
    pub trail_life: u32,
    /// Pointer positions kept for the plain pointer trail.
    pub pointer_trail_len: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            fog_threshold: 100.0,
            rain_threshold: 50.0,
            fog_probability: 0.02,
            rain_probability: 0.01,
            sparkle_probability: 0.1,
            sparkle_region_probability: 0.3,
            hover_probability: 0.3,
            hover_particles: 2,
            click_particles: 10,
            timeline_particles: 8,
            explosion_intensity: 30,
            trail_min_distance: 5.0,
            trail_life: 120,
            pointer_trail_len: 15,
        }
    }
}

/// District grid placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal margin on both sides.
    pub margin: f32,
    /// Distance from the top of the screen to the first row.
    pub top: f32,
    /// Cells per row.
    pub columns: usize,
    /// Row pitch in pixels.
    pub cell_height: f32,
    /// Empty space subtracted from each cell's width and height.
    pub gap: f32,
    /// Horizontal inset of the timeline strip from both screen edges.
    pub timeline_inset: f32,
    /// Distance from the bottom of the screen to the top of the timeline.
    pub timeline_bottom: f32,
    /// Timeline strip height.
    pub timeline_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            top: 100.0,
            columns: 3,
            cell_height: 200.0,
            gap: 10.0,
            timeline_inset: 150.0,
            timeline_bottom: 200.0,
            timeline_height: 150.0,
        }
    }
}

/// Value range mapped onto the color ramp and appearance bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexDomain {
    pub min: f32,
    pub max: f32,
}

impl IndexDomain {
    /// Clamp a raw index value into the domain. NaN maps to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

impl Default for IndexDomain {
    fn default() -> Self {
        Self { min: 0.0, max: 150.0 }
    }
}

/// Complete scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub screen: ScreenConfig,
    pub ambient: AmbientConfig,
    pub cursor: CursorConfig,
    pub effects: EffectsConfig,
    pub layout: LayoutConfig,
    pub ramp: ColorRamp,
    pub index_domain: IndexDomain,
    /// Frames between automatic year advances. `None` disables autoplay.
    pub autoplay_interval: Option<u32>,
    /// Fixed seconds per frame. `None` follows the wall clock.
    pub fixed_timestep: Option<f32>,
    /// Seed for every random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            ambient: AmbientConfig::default(),
            cursor: CursorConfig::default(),
            effects: EffectsConfig::default(),
            layout: LayoutConfig::default(),
            ramp: ColorRamp::aqi(),
            index_domain: IndexDomain::default(),
            autoplay_interval: Some(300),
            fixed_timestep: None,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output surface size in pixels.
    pub fn with_screen_size(mut self, width: f32, height: f32) -> Self {
        self.screen = ScreenConfig { width, height };
        self
    }

    /// Set the ambient particle population.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.ambient.count = count;
        self
    }

    /// Seed every random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Advance the scene clock by a fixed step per frame.
    pub fn with_fixed_timestep(mut self, seconds: f32) -> Self {
        self.fixed_timestep = Some(seconds);
        self
    }

    /// Set or disable autoplay.
    pub fn with_autoplay(mut self, interval: Option<u32>) -> Self {
        self.autoplay_interval = interval;
        self
    }

    /// Replace the spawn/interaction tuning.
    pub fn with_effects(mut self, effects: EffectsConfig) -> Self {
        self.effects = effects;
        self
    }

    /// Replace the color ramp.
    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Screen size as a vector.
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.screen.width, self.screen.height)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScreenConfig { width, height } = self.screen;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidScreen { width, height });
        }
        if self.ambient.count == 0 || self.ambient.bands.is_empty() {
            return Err(ConfigError::NoParticles);
        }
        if self.ramp.stops().is_empty() {
            return Err(ConfigError::EmptyRamp);
        }
        let IndexDomain { min, max } = self.index_domain;
        if !(min < max) {
            return Err(ConfigError::InvalidDomain { min, max });
        }
        let s = self.cursor.smoothing;
        if !(s > 0.0 && s < 1.0) {
            return Err(ConfigError::InvalidSmoothing(s));
        }
        let e = &self.effects;
        for (name, value) in [
            ("fog_probability", e.fog_probability),
            ("rain_probability", e.rain_probability),
            ("sparkle_probability", e.sparkle_probability),
            ("sparkle_region_probability", e.sparkle_region_probability),
            ("hover_probability", e.hover_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        let epsilon = self.cursor.snap_epsilon;
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "cursor.snap_epsilon",
                value: epsilon,
            });
        }
        for (name, value) in [
            ("ambient.z_max", self.ambient.z_max),
            ("ambient.heading_jitter", self.ambient.heading_jitter),
            ("effects.trail_min_distance", e.trail_min_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        let l = &self.layout;
        if l.columns == 0 || l.cell_height <= l.gap || l.cell_height <= 0.0 {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }
}
