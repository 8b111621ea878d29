use super::{Effect, UpdateContext};
use crate::canvas::{rgba, BlendMode, Canvas};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Frames an explosion may live even if sparks remain.
pub const EXPLOSION_LIFETIME: u32 = 120;
/// Downward acceleration in pixels per frame squared.
const GRAVITY: f32 = 0.1;
/// Horizontal velocity multiplier per frame.
const DRAG: f32 = 0.99;
/// Spark life that maps to full opacity.
const SPARK_FULL_LIFE: f32 = 120.0;

/// One ballistic sub-particle of an explosion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    /// Remaining frames; the spark is dropped once this reaches zero.
    pub life: i32,
}

impl Spark {
    fn step(&mut self) {
        self.position += self.velocity;
        self.velocity.y += GRAVITY;
        self.velocity.x *= DRAG;
        self.life -= 1;
    }

    fn alpha(&self) -> f32 {
        (self.life as f32 / SPARK_FULL_LIFE).clamp(0.0, 1.0)
    }
}

/// Burst of sparks thrown out radially from one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub color: Vec3,
    sparks: Vec<Spark>,
    age: u32,
}

impl Explosion {
    /// Create `intensity` sparks at `origin` with random heading, speed
    /// (2 to 8 px/frame), size (2 to 5 px) and life (60 to 120 frames).
    pub fn new<R: Rng + ?Sized>(origin: Vec2, color: Vec3, intensity: usize, rng: &mut R) -> Self {
        let sparks = (0..intensity)
            .map(|_| {
                let heading: f32 = rng.gen_range(0.0..TAU);
                let speed: f32 = rng.gen_range(2.0..8.0);
                Spark {
                    position: origin,
                    velocity: Vec2::from_angle(heading) * speed,
                    size: rng.gen_range(2..=5) as f32,
                    life: rng.gen_range(60..=120),
                }
            })
            .collect();
        Self {
            color,
            sparks,
            age: 0,
        }
    }

    /// Sparks still alive.
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn age(&self) -> u32 {
        self.age
    }
}

impl Effect for Explosion {
    fn update(&mut self, _ctx: &mut UpdateContext) -> bool {
        self.age += 1;
        self.sparks.retain_mut(|spark| {
            spark.step();
            spark.life > 0
        });
        self.age < EXPLOSION_LIFETIME && !self.sparks.is_empty()
    }

    fn alpha(&self) -> f32 {
        self.sparks.iter().map(Spark::alpha).fold(0.0, f32::max)
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for spark in &self.sparks {
            let alpha = spark.alpha();
            if alpha > 0.0 {
                canvas.fill_circle(spark.position, spark.size, rgba(self.color, alpha), BlendMode::Alpha);
            }
        }
    }

    fn max_updates(&self) -> Option<u32> {
        Some(EXPLOSION_LIFETIME)
    }
}
