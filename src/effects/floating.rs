use super::{Effect, UpdateContext};
use crate::canvas::{rgba, BlendMode, Canvas};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Frames a floating particle lives.
pub const FLOATING_LIFETIME: u32 = 180;
/// Angular velocity of the drift circle in radians per frame.
const DRIFT_TURN: f32 = 0.05;
/// Attraction is `min(REACH / distance, MAX_PULL) * PULL_SCALE`.
const REACH: f32 = 50.0;
const MAX_PULL: f32 = 2.0;
const PULL_SCALE: f32 = 0.1;

/// Mote that drifts in slow circles while being pulled toward the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingParticle {
    pub position: Vec2,
    pub color: Vec3,
    size: f32,
    angle: f32,
    speed: f32,
    age: u32,
}

impl FloatingParticle {
    /// Randomize size, drift heading and drift speed.
    pub fn new<R: Rng + ?Sized>(position: Vec2, color: Vec3, rng: &mut R) -> Self {
        Self {
            position,
            color,
            size: rng.gen_range(2..=6) as f32,
            angle: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(0.5..2.0),
            age: 0,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

/// Displacement toward `target`: inverse-distance pull, capped. Zero when
/// the two points coincide.
pub(crate) fn attraction(from: Vec2, target: Vec2) -> Vec2 {
    let delta = target - from;
    let distance = delta.length();
    if distance <= 0.0 || !distance.is_finite() {
        return Vec2::ZERO;
    }
    let force = (REACH / distance).min(MAX_PULL);
    delta / distance * force * PULL_SCALE
}

impl Effect for FloatingParticle {
    fn update(&mut self, ctx: &mut UpdateContext) -> bool {
        self.position += attraction(self.position, ctx.pointer);

        self.angle += DRIFT_TURN;
        self.position += Vec2::from_angle(self.angle) * self.speed;

        self.age += 1;
        self.age < FLOATING_LIFETIME
    }

    fn alpha(&self) -> f32 {
        (1.0 - self.age as f32 / FLOATING_LIFETIME as f32).max(0.0)
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha();
        if alpha <= 0.0 {
            return;
        }
        canvas.fill_circle(self.position, self.size, rgba(self.color, alpha), BlendMode::Alpha);
    }

    fn max_updates(&self) -> Option<u32> {
        Some(FLOATING_LIFETIME)
    }
}
