use super::{Effect, UpdateContext};
use crate::canvas::{rgba, Canvas};
use crate::ramp::sparkle_band;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

const DRIFT_TURN: f32 = 0.02;
const FLASH_RATE: f32 = 0.2;
/// Sparkles fainter than this are not drawn at all.
const MIN_VISIBLE_ALPHA: f32 = 20.0 / 255.0;
const ARM_WIDTH: f32 = 2.0;

/// Four-armed flashing star marking a district's current index value.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSparkle {
    pub position: Vec2,
    /// Index value the sparkle was spawned with; picks its color band.
    pub value: f32,
    size: f32,
    angle: f32,
    speed: f32,
    lifetime: u32,
    age: u32,
}

impl DataSparkle {
    /// Randomize size (1 to 3), drift and a lifetime of 180 to 300 frames.
    pub fn new<R: Rng + ?Sized>(position: Vec2, value: f32, rng: &mut R) -> Self {
        Self {
            position,
            value,
            size: rng.gen_range(1.0..3.0),
            angle: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(0.5..1.5),
            lifetime: rng.gen_range(180..=300),
            age: 0,
        }
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Brightness multiplier in `[0.5, 1.0]`, independent of position.
    pub fn flash(&self) -> f32 {
        (self.age as f32 * FLASH_RATE).sin().abs() * 0.5 + 0.5
    }
}

impl Effect for DataSparkle {
    fn update(&mut self, _ctx: &mut UpdateContext) -> bool {
        self.angle += DRIFT_TURN;
        self.position += Vec2::from_angle(self.angle) * self.speed;
        self.age += 1;
        self.age < self.lifetime
    }

    fn alpha(&self) -> f32 {
        (1.0 - self.age as f32 / self.lifetime as f32).max(0.0)
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha();
        if alpha <= MIN_VISIBLE_ALPHA {
            return;
        }
        let color = rgba(sparkle_band(self.value), alpha * self.flash());
        let reach = self.size * 2.0;
        for arm in 0..4 {
            let tip = self.position + Vec2::from_angle(arm as f32 * FRAC_PI_2) * reach;
            canvas.line(self.position, tip, ARM_WIDTH, color);
        }
    }

    fn max_updates(&self) -> Option<u32> {
        Some(self.lifetime)
    }
}
