//! Ownership and scheduling of transient effects.
//!
//! [`EffectManager`] holds one collection per effect kind. Each frame it
//! first updates every effect and drops the ones that expired, then runs the
//! data-driven spawn triggers. Ripples, floating particles and explosions
//! only appear in response to input; weather and sparkles appear on their own
//! with small per-frame probabilities.
//!
//! Every trigger draws from its own random source ([`EffectRngs`]), so a test
//! can force one trigger to fire while keeping another silent.

use crate::config::EffectsConfig;
use crate::effects::{
    draw_all, update_all, DataSparkle, Effect, Explosion, FloatingParticle, PointerTrail,
    RainbowTrail, Ripple, UpdateContext, Weather, WeatherKind,
};
use crate::canvas::Canvas;
use crate::layout::DistrictLayout;
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Maximum pixel offset of floating particles around their spawn point.
const FLOATING_SCATTER: i32 = 20;

/// Independent random sources, one per trigger.
pub struct EffectRngs {
    /// Weather spawn rolls.
    pub weather: Box<dyn RngCore>,
    /// Sparkle gate, per-district rolls and placement.
    pub sparkle: Box<dyn RngCore>,
    /// Hover spawn rolls.
    pub hover: Box<dyn RngCore>,
    /// Initial state of spawned effects (sizes, headings, lifetimes).
    pub spawn: Box<dyn RngCore>,
    /// Randomness effects consume while alive.
    pub motion: Box<dyn RngCore>,
}

impl EffectRngs {
    /// Seed every source from `seed`, or from entropy when `None`.
    pub fn seeded(seed: Option<u64>) -> Self {
        let mut stream = 0u64;
        Self::from_fn(|| {
            stream += 1;
            let rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(stream)),
                None => SmallRng::from_entropy(),
            };
            Box::new(rng)
        })
    }

    /// Build every source with `make`.
    pub fn from_fn(mut make: impl FnMut() -> Box<dyn RngCore>) -> Self {
        Self {
            weather: make(),
            sparkle: make(),
            hover: make(),
            spawn: make(),
            motion: make(),
        }
    }
}

/// Bernoulli draw that never panics: non-positive `p` never fires.
fn roll(rng: &mut dyn RngCore, p: f64) -> bool {
    p > 0.0 && rng.gen::<f64>() < p
}

/// District under the pointer, as seen by the hover trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTarget {
    pub district: usize,
    pub center: Vec2,
    pub color: Vec3,
}

/// Owns and advances every transient effect.
pub struct EffectManager {
    config: EffectsConfig,
    bounds: Vec2,
    rngs: EffectRngs,

    ripples: Vec<Ripple>,
    floating: Vec<FloatingParticle>,
    explosions: Vec<Explosion>,
    sparkles: Vec<DataSparkle>,
    weather: Option<Weather>,

    rainbow_mode: bool,
    rainbow: RainbowTrail,
    pointer_trail: PointerTrail,
    hovered: Option<usize>,
}

impl EffectManager {
    pub fn new(config: &EffectsConfig, bounds: Vec2, rngs: EffectRngs) -> Self {
        Self {
            config: *config,
            bounds,
            rngs,
            ripples: Vec::new(),
            floating: Vec::new(),
            explosions: Vec::new(),
            sparkles: Vec::new(),
            weather: None,
            rainbow_mode: false,
            rainbow: RainbowTrail::new(config.trail_min_distance, config.trail_life),
            pointer_trail: PointerTrail::new(config.pointer_trail_len),
            hovered: None,
        }
    }

    /// Advance every effect one frame and drop the expired ones.
    ///
    /// Also feeds the pointer trails: the plain trail always, the rainbow
    /// trail only while rainbow mode is on.
    pub fn update(&mut self, pointer: Vec2) {
        let mut ctx = UpdateContext::new(pointer, self.bounds, self.rngs.motion.as_mut());

        update_all(&mut self.ripples, &mut ctx);
        update_all(&mut self.floating, &mut ctx);
        update_all(&mut self.explosions, &mut ctx);
        update_all(&mut self.sparkles, &mut ctx);
        if let Some(weather) = &mut self.weather {
            if !weather.update(&mut ctx) {
                self.weather = None;
            }
        }

        self.pointer_trail.push(pointer);
        if self.rainbow_mode {
            self.rainbow.update(&mut ctx);
            self.rainbow.record(pointer);
        }
    }

    /// Run the autonomous spawn triggers for this frame.
    ///
    /// `index_value` is the current overall value; `district_values` holds
    /// one current value per layout cell.
    pub fn spawn_triggers(&mut self, index_value: f32, district_values: &[f32], layout: &DistrictLayout) {
        self.weather_trigger(index_value);
        self.sparkle_trigger(district_values, layout);
    }

    fn weather_trigger(&mut self, index_value: f32) {
        if self.weather.is_some() {
            return;
        }
        let kind = if index_value > self.config.fog_threshold {
            roll(self.rngs.weather.as_mut(), self.config.fog_probability).then_some(WeatherKind::Fog)
        } else if index_value < self.config.rain_threshold {
            roll(self.rngs.weather.as_mut(), self.config.rain_probability).then_some(WeatherKind::Rain)
        } else {
            None
        };
        if let Some(kind) = kind {
            log::debug!("{:?} rolled in at index value {:.1}", kind, index_value);
            self.weather = Some(Weather::new(kind, index_value, self.bounds, self.rngs.spawn.as_mut()));
        }
    }

    fn sparkle_trigger(&mut self, district_values: &[f32], layout: &DistrictLayout) {
        let rng = self.rngs.sparkle.as_mut();
        if !roll(rng, self.config.sparkle_probability) {
            return;
        }
        for (cell, &value) in layout.cells().iter().zip(district_values) {
            if roll(rng, self.config.sparkle_region_probability) {
                let position = cell.random_point(rng);
                self.sparkles.push(DataSparkle::new(position, value, rng));
            }
        }
    }

    /// Hover feedback: a ripple at the cell center when the pointer enters a
    /// district, and a chance of floating particles every frame it stays.
    pub fn hover(&mut self, pointer: Vec2, target: Option<HoverTarget>) {
        let Some(target) = target else {
            self.hovered = None;
            return;
        };
        if roll(self.rngs.hover.as_mut(), self.config.hover_probability) {
            self.spawn_floating(pointer, target.color, self.config.hover_particles);
        }
        if self.hovered != Some(target.district) {
            self.spawn_ripple(target.center, target.color);
        }
        self.hovered = Some(target.district);
    }

    pub fn spawn_ripple(&mut self, center: Vec2, color: Vec3) {
        self.ripples.push(Ripple::new(center, color));
    }

    /// Spawn `count` floating particles scattered up to 20 px around `origin`.
    pub fn spawn_floating(&mut self, origin: Vec2, color: Vec3, count: usize) {
        let rng = self.rngs.spawn.as_mut();
        self.floating.extend((0..count).map(|_| {
            let offset = Vec2::new(
                rng.gen_range(-FLOATING_SCATTER..=FLOATING_SCATTER) as f32,
                rng.gen_range(-FLOATING_SCATTER..=FLOATING_SCATTER) as f32,
            );
            FloatingParticle::new(origin + offset, color, rng)
        }));
    }

    pub fn spawn_explosion(&mut self, origin: Vec2, color: Vec3, intensity: usize) {
        log::debug!("Explosion of {} sparks at ({:.0}, {:.0})", intensity, origin.x, origin.y);
        self.explosions
            .push(Explosion::new(origin, color, intensity, self.rngs.spawn.as_mut()));
    }

    /// Replace any active weather with a fresh effect of `kind`.
    pub fn override_weather(&mut self, kind: WeatherKind, index_value: f32) {
        log::debug!("Weather override: {:?}", kind);
        self.weather = Some(Weather::new(kind, index_value, self.bounds, self.rngs.spawn.as_mut()));
    }

    /// Turn rainbow mode on or off. The trail restarts either way.
    pub fn set_rainbow_mode(&mut self, enabled: bool) {
        self.rainbow_mode = enabled;
        self.rainbow.clear();
    }

    pub fn rainbow_mode(&self) -> bool {
        self.rainbow_mode
    }

    /// Drop explosions, sparkles, weather, the rainbow trail and floating
    /// particles. Ripples finish on their own.
    pub fn clear(&mut self) {
        self.explosions.clear();
        self.sparkles.clear();
        self.weather = None;
        self.rainbow.clear();
        self.floating.clear();
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn floating(&self) -> &[FloatingParticle] {
        &self.floating
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn sparkles(&self) -> &[DataSparkle] {
        &self.sparkles
    }

    pub fn weather(&self) -> Option<&Weather> {
        self.weather.as_ref()
    }

    pub fn rainbow(&self) -> &RainbowTrail {
        &self.rainbow
    }

    pub fn pointer_trail(&self) -> &PointerTrail {
        &self.pointer_trail
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Number of live effects across all collections, trail points included.
    pub fn total(&self) -> usize {
        self.ripples.len()
            + self.floating.len()
            + self.explosions.len()
            + self.sparkles.len()
            + usize::from(self.weather.is_some())
            + self.rainbow.points().len()
    }

    /// Whichever trail is active.
    pub(crate) fn draw_trail(&self, canvas: &mut dyn Canvas) {
        if self.rainbow_mode {
            self.rainbow.draw(canvas);
        } else {
            self.pointer_trail.draw(canvas);
        }
    }

    pub(crate) fn draw_ripples(&self, canvas: &mut dyn Canvas) {
        draw_all(&self.ripples, canvas);
    }

    pub(crate) fn draw_floating(&self, canvas: &mut dyn Canvas) {
        draw_all(&self.floating, canvas);
    }

    pub(crate) fn draw_explosions(&self, canvas: &mut dyn Canvas) {
        draw_all(&self.explosions, canvas);
    }

    pub(crate) fn draw_sparkles(&self, canvas: &mut dyn Canvas) {
        draw_all(&self.sparkles, canvas);
    }

    pub(crate) fn draw_weather(&self, canvas: &mut dyn Canvas) {
        if let Some(weather) = &self.weather {
            weather.draw(canvas);
        }
    }
}
