//! # airglow - Air-quality particle scene engine
//!
//! A small engine that turns a yearly air-quality index series into a living
//! particle scene. Ambient particles change color, size and speed with the
//! index value, districts light up with the color ramp, and a set of
//! short-lived effects (ripples, floating particles, explosions, sparkles,
//! weather, pointer trails) react to the data and to the user.
//!
//! ## Quick Start
//!
//! ```
//! use airglow::prelude::*;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//! let data = RegionalDataset::hong_kong(&mut rng);
//!
//! let config = SceneConfig::new()
//!     .with_seed(42)
//!     .with_particle_count(100)
//!     .with_fixed_timestep(1.0 / 60.0);
//! let mut scene = Scene::new(config, data).unwrap();
//!
//! let mut canvas = RasterCanvas::new(1200, 800);
//! for _ in 0..3 {
//!     scene.advance_frame(Vec2::new(400.0, 300.0));
//! }
//! scene.draw(&mut canvas);
//! ```
//!
//! ## Core Concepts
//!
//! ### Data
//!
//! Anything implementing [`DataProvider`] can drive a scene. It exposes an
//! inclusive year range, the raw samples for a year and optional per-district
//! series. [`RegionalDataset`] is the in-memory implementation and
//! [`RegionalDataset::hong_kong`] builds the bundled synthetic dataset.
//!
//! ### Frames
//!
//! A [`Scene`] is advanced with [`Scene::advance_frame`] and drawn with
//! [`Scene::draw`] into any [`Canvas`]. Drawing is read-only and visits the
//! layers in [`Layer::ORDER`]. [`DrawList`] records commands for tests and
//! external renderers; [`RasterCanvas`] rasterizes on the CPU.
//!
//! ### Effects
//!
//! Every transient visual implements [`effects::Effect`]: it updates once per
//! frame, reports whether it is still alive and draws itself with an alpha
//! derived from its age. The [`EffectManager`] owns one collection per kind
//! and drops expired effects during the update.
//!
//! ### Input
//!
//! [`input::Input`] maps winit events to [`Command`]s which the scene applies
//! through [`Scene::handle`].
//!
//! ## Feature Overview
//!
//! | Category | Items |
//! |----------|-------|
//! | Data | [`DataProvider`], [`RegionalDataset`], [`TimeSeries`], [`TimeCursor`] |
//! | Color | [`ColorRamp`], [`ramp::AQI_COLORS`], [`ramp::RAINBOW`] |
//! | Particles | [`AmbientField`], [`effects`] |
//! | Drawing | [`Canvas`], [`DrawList`], [`RasterCanvas`], [`compositor`] |
//! | Config | [`SceneConfig`] and its sub-configs |

pub mod ambient;
pub mod canvas;
pub mod compositor;
pub mod config;
pub mod cursor;
pub mod effects;
pub mod error;
pub mod input;
pub mod layout;
pub mod manager;
pub mod ramp;
pub mod raster;
pub mod scene;
pub mod series;
pub mod stats;
pub mod time;

pub use ambient::{AmbientField, Appearance};
pub use canvas::{BlendMode, Canvas, DrawCommand, DrawList, Layer};
pub use config::{
    AmbientConfig, AppearanceBand, CursorConfig, EffectsConfig, IndexDomain, LayoutConfig, SceneConfig,
    ScreenConfig,
};
pub use cursor::TimeCursor;
pub use error::{ConfigError, RenderError, SeriesError};
pub use glam::{Vec2, Vec3, Vec4};
pub use input::Command;
pub use manager::{EffectManager, EffectRngs};
pub use ramp::ColorRamp;
pub use raster::RasterCanvas;
pub use scene::{Mode, Scene};
pub use series::{DataProvider, RegionalDataset, TimeSeries};
pub use stats::SeriesStats;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```
/// use airglow::prelude::*;
/// ```
///
/// This imports the scene and its config, the data types, both canvases, the
/// input types, the glam vector types and [`rand::SeedableRng`] for seeding
/// the random sources handed to a scene.
pub mod prelude {
    pub use crate::canvas::{BlendMode, Canvas, DrawList, Layer};
    pub use crate::config::{EffectsConfig, SceneConfig};
    pub use crate::effects::WeatherKind;
    pub use crate::input::{Command, Input, Key};
    pub use crate::manager::EffectRngs;
    pub use crate::ramp::ColorRamp;
    pub use crate::raster::RasterCanvas;
    pub use crate::scene::{Mode, Scene};
    pub use crate::series::{DataProvider, RegionalDataset, TimeSeries};
    pub use crate::{Vec2, Vec3, Vec4};
    pub use rand::SeedableRng;
}
