//! The engine façade.
//!
//! A [`Scene`] owns every piece of per-run state: the frame clock, the time
//! cursor, the ambient field, the effect manager and the district geometry.
//! Presentation glue drives it with two calls per frame:
//!
//! ```
//! use airglow::prelude::*;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
//! let data = RegionalDataset::hong_kong(&mut rng);
//! let config = SceneConfig::new().with_seed(7).with_fixed_timestep(1.0 / 60.0);
//! let mut scene = Scene::new(config, data).unwrap();
//!
//! let mut canvas = DrawList::new(Vec2::new(1200.0, 800.0));
//! scene.set_target_year(2023.0);
//! for _ in 0..10 {
//!     scene.advance_frame(Vec2::new(600.0, 400.0));
//! }
//! scene.draw(&mut canvas);
//! assert!(scene.current_year() > 1993.0);
//! ```
//!
//! # Frame order
//!
//! [`Scene::advance_frame`] runs, in order:
//! 1. the clock ticks and the cursor eases toward the target year
//! 2. the overall and per-district values are re-interpolated and clamped
//! 3. the ambient field takes the shared appearance and moves
//! 4. every effect updates and expired ones are dropped
//! 5. hover, weather and sparkle triggers run
//! 6. autoplay advances the target year when its interval elapses
//!
//! Nothing in the frame loop can fail. Out-of-range years clamp and NaN index
//! values fall back to the domain minimum.

use crate::ambient::{AmbientField, Appearance};
use crate::canvas::Canvas;
use crate::compositor::{compose, Frame, RegionLayer};
use crate::config::SceneConfig;
use crate::cursor::TimeCursor;
use crate::effects::WeatherKind;
use crate::error::ConfigError;
use crate::input::Command;
use crate::layout::{DistrictLayout, Timeline};
use crate::manager::{EffectManager, EffectRngs, HoverTarget};
use crate::ramp::HIGHLIGHT;
use crate::series::{mean, DataProvider};
use crate::stats::SeriesStats;
use crate::time::FrameClock;
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Toggleable display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rainbow trail follows the pointer instead of the plain trail.
    Rainbow,
    /// Statistics overlay requested from the HUD glue.
    Statistics,
}

/// Particle scene driven by a yearly index dataset.
pub struct Scene<D: DataProvider> {
    config: SceneConfig,
    data: D,
    clock: FrameClock,
    cursor: TimeCursor,
    ambient: AmbientField,
    ambient_rng: Box<dyn RngCore>,
    effects: EffectManager,
    layout: DistrictLayout,
    timeline: Timeline,
    stats: SeriesStats,

    pointer: Vec2,
    index_value: f32,
    district_values: Vec<f32>,
    district_colors: Vec<Vec3>,
    selected: Option<usize>,
    show_statistics: bool,
    autoplay_frames: u32,
}

impl<D: DataProvider> Scene<D> {
    /// Validate `config` and build a scene resting on the first year of `data`.
    ///
    /// Random sources are seeded from `config.seed`, or from entropy.
    pub fn new(config: SceneConfig, data: D) -> Result<Self, ConfigError> {
        let ambient_rng: Box<dyn RngCore> = match config.seed {
            Some(seed) => Box::new(SmallRng::seed_from_u64(seed)),
            None => Box::new(SmallRng::from_entropy()),
        };
        let rngs = EffectRngs::seeded(config.seed);
        Self::with_rngs(config, data, ambient_rng, rngs)
    }

    /// Like [`Scene::new`] with caller-supplied random sources.
    pub fn with_rngs(
        config: SceneConfig,
        data: D,
        mut ambient_rng: Box<dyn RngCore>,
        rngs: EffectRngs,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let years = data.years();
        if years.start() > years.end() {
            return Err(ConfigError::InvalidYears {
                first: *years.start(),
                last: *years.end(),
            });
        }

        let bounds = config.bounds();
        let cursor = TimeCursor::new(years.clone(), &config.cursor);
        let layout = DistrictLayout::new(&config.layout, bounds.x, data.district_count());
        let timeline = Timeline::new(&config.layout, bounds, years.clone());
        let index_value = config.index_domain.clamp(cursor.sample_value(&data));
        let appearance = Appearance::for_value(&config.ambient.bands, index_value);
        let ambient = AmbientField::new(&config.ambient, bounds, appearance, ambient_rng.as_mut());
        let effects = EffectManager::new(&config.effects, bounds, rngs);
        let stats = SeriesStats::compute(&data);

        log::info!(
            "Scene ready: {} ambient particles, years {}..={}, {} districts",
            ambient.len(),
            years.start(),
            years.end(),
            layout.len()
        );

        let mut scene = Self {
            clock: FrameClock::from_step(config.fixed_timestep),
            config,
            data,
            cursor,
            ambient,
            ambient_rng,
            effects,
            layout,
            timeline,
            stats,
            pointer: Vec2::ZERO,
            index_value,
            district_values: Vec::new(),
            district_colors: Vec::new(),
            selected: None,
            show_statistics: false,
            autoplay_frames: 0,
        };
        scene.refresh_values();
        Ok(scene)
    }

    /// Advance the whole scene one frame with the pointer at `pointer`.
    pub fn advance_frame(&mut self, pointer: Vec2) {
        self.pointer = pointer;
        let time = self.clock.tick();
        self.cursor.advance();
        self.refresh_values();

        let appearance = Appearance::for_value(&self.config.ambient.bands, self.index_value);
        self.ambient.tick(appearance, time, self.ambient_rng.as_mut());

        self.effects.update(pointer);
        let hover = self.layout.hit_test(pointer).and_then(|district| {
            let cell = self.layout.cell(district)?;
            Some(HoverTarget {
                district,
                center: cell.center(),
                color: self.district_colors.get(district).copied().unwrap_or(Vec3::ONE),
            })
        });
        self.effects.hover(pointer, hover);
        self.effects
            .spawn_triggers(self.index_value, &self.district_values, &self.layout);

        self.tick_autoplay();
    }

    /// Draw the current state. Read-only.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let frame = Frame {
            regions: RegionLayer {
                layout: &self.layout,
                colors: &self.district_colors,
                hovered: self.effects.hovered(),
                selected: self.selected,
                pointer: self.pointer,
                time: self.clock.elapsed(),
            },
            ambient: &self.ambient,
            effects: &self.effects,
        };
        compose(&frame, canvas);
    }

    /// Ease toward `year`, clamped to the data range.
    pub fn set_target_year(&mut self, year: f32) {
        self.cursor.set_target(year);
        log::debug!("Target year set to {}", self.cursor.target());
    }

    /// Move the target by whole years from its integer part.
    pub fn step_year(&mut self, years: i32) {
        self.cursor.step_target(years);
        log::debug!("Target year stepped to {}", self.cursor.target());
    }

    /// Flip a display mode and return its new state. Turning rainbow mode on
    /// or off restarts the rainbow trail.
    pub fn toggle_mode(&mut self, mode: Mode) -> bool {
        let enabled = match mode {
            Mode::Rainbow => {
                let enabled = !self.effects.rainbow_mode();
                self.effects.set_rainbow_mode(enabled);
                enabled
            }
            Mode::Statistics => {
                self.show_statistics = !self.show_statistics;
                self.show_statistics
            }
        };
        log::debug!("{:?} mode {}", mode, if enabled { "on" } else { "off" });
        enabled
    }

    pub fn spawn_explosion(&mut self, position: Vec2, color: Vec3, intensity: usize) {
        self.effects.spawn_explosion(position, color, intensity);
    }

    /// Replace the weather: fog when the current year's mean is above the fog
    /// threshold, rain otherwise.
    pub fn spawn_weather(&mut self) -> WeatherKind {
        let value = self.year_mean();
        let kind = if value > self.config.effects.fog_threshold {
            WeatherKind::Fog
        } else {
            WeatherKind::Rain
        };
        self.effects.override_weather(kind, value);
        kind
    }

    /// Drop explosions, sparkles, weather, floating particles and the rainbow
    /// trail.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
        log::debug!("Effects cleared");
    }

    /// React to a click. The timeline jumps to the clicked year; a district
    /// cell becomes selected. Either spawns a ripple and floating particles.
    /// Clicks elsewhere do nothing.
    pub fn click(&mut self, position: Vec2) {
        if let Some(year) = self.timeline.year_at(position) {
            self.set_target_year(year as f32);
            let anchor = self.timeline.anchor(year);
            self.effects.spawn_ripple(anchor, HIGHLIGHT);
            self.effects
                .spawn_floating(anchor, HIGHLIGHT, self.config.effects.timeline_particles);
            return;
        }
        let Some(cell) = self.layout.hit_test(position).and_then(|d| self.layout.cell(d)).copied() else {
            return;
        };
        self.selected = Some(cell.index);
        log::debug!("Selected district {}", self.data.district_name(cell.index));
        let color = self.district_colors.get(cell.index).copied().unwrap_or(Vec3::ONE);
        self.effects.spawn_ripple(cell.center(), color);
        self.effects
            .spawn_floating(cell.center(), color, self.config.effects.click_particles);
    }

    /// Restart the autoplay interval from zero.
    pub fn restart_autoplay(&mut self) {
        self.autoplay_frames = 0;
    }

    /// Apply an input command. Returns `false` for [`Command::Quit`].
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::NextYear => self.step_year(1),
            Command::PreviousYear => self.step_year(-1),
            Command::ToggleStatistics => {
                self.toggle_mode(Mode::Statistics);
            }
            Command::ToggleRainbow => {
                self.toggle_mode(Mode::Rainbow);
            }
            Command::Explode => {
                let color = self.ramp_color(self.year_mean());
                self.spawn_explosion(self.pointer, color, self.config.effects.explosion_intensity);
            }
            Command::Weather => {
                self.spawn_weather();
            }
            Command::ClearEffects => self.clear_effects(),
            Command::RestartAutoplay => self.restart_autoplay(),
            Command::Click(position) => self.click(position),
            Command::Quit => return false,
        }
        true
    }

    fn tick_autoplay(&mut self) {
        let Some(interval) = self.config.autoplay_interval else {
            return;
        };
        self.autoplay_frames += 1;
        if self.autoplay_frames < interval {
            return;
        }
        self.autoplay_frames = 0;
        let years = self.data.years();
        if self.cursor.target() >= *years.end() as f32 {
            log::debug!("Autoplay wrapped to {}", years.start());
            self.cursor.set_target(*years.start() as f32);
        } else {
            self.cursor.step_target(1);
        }
    }

    fn refresh_values(&mut self) {
        let domain = self.config.index_domain;
        self.index_value = domain.clamp(self.cursor.sample_value(&self.data));

        self.district_values.clear();
        self.district_colors.clear();
        for district in 0..self.layout.len() {
            let value = domain.clamp(self.cursor.sample_district(&self.data, district));
            self.district_values.push(value);
            self.district_colors
                .push(self.config.ramp.color_at(value, domain.min, domain.max));
        }
    }

    /// Mean of the displayed integer year, clamped to the domain.
    fn year_mean(&self) -> f32 {
        let year = self.data.clamp_year(self.cursor.current_year());
        self.config.index_domain.clamp(mean(self.data.sample(year)))
    }

    fn ramp_color(&self, value: f32) -> Vec3 {
        let domain = self.config.index_domain;
        self.config.ramp.color_at(value, domain.min, domain.max)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn cursor(&self) -> &TimeCursor {
        &self.cursor
    }

    /// Displayed (continuous) year.
    pub fn current_year(&self) -> f32 {
        self.cursor.current()
    }

    pub fn target_year(&self) -> f32 {
        self.cursor.target()
    }

    /// Interpolated overall index value, clamped to the domain.
    pub fn index_value(&self) -> f32 {
        self.index_value
    }

    /// Interpolated value per district, clamped to the domain.
    pub fn district_values(&self) -> &[f32] {
        &self.district_values
    }

    pub fn ambient(&self) -> &AmbientField {
        &self.ambient
    }

    pub fn effects(&self) -> &EffectManager {
        &self.effects
    }

    pub fn layout(&self) -> &DistrictLayout {
        &self.layout
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn selected_district(&self) -> Option<usize> {
        self.selected
    }

    pub fn show_statistics(&self) -> bool {
        self.show_statistics
    }

    pub fn rainbow_mode(&self) -> bool {
        self.effects.rainbow_mode()
    }

    /// Best/worst year and mean improvement of the overall series.
    pub fn statistics(&self) -> SeriesStats {
        self.stats
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Seconds covered by the last frame.
    pub fn frame_delta(&self) -> f32 {
        self.clock.delta()
    }
}
