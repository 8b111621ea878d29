use super::{Effect, UpdateContext};
use crate::canvas::{rgba, Canvas};
use glam::{Vec2, Vec3};

/// Pixels the ring grows per frame.
pub const RIPPLE_SPEED: f32 = 3.0;
/// Radius at which the ring disappears.
pub const RIPPLE_MAX_RADIUS: f32 = 100.0;
const STROKE_WIDTH: f32 = 2.0;

/// Expanding ring that fades as it grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub color: Vec3,
    radius: f32,
    alpha: f32,
}

impl Ripple {
    pub fn new(center: Vec2, color: Vec3) -> Self {
        Self {
            center,
            color,
            radius: 0.0,
            alpha: 1.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Effect for Ripple {
    fn update(&mut self, _ctx: &mut UpdateContext) -> bool {
        self.radius += RIPPLE_SPEED;
        self.alpha = (1.0 - self.radius / RIPPLE_MAX_RADIUS).max(0.0);
        self.radius < RIPPLE_MAX_RADIUS
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.alpha <= 0.0 {
            return;
        }
        canvas.stroke_circle(self.center, self.radius, STROKE_WIDTH, rgba(self.color, self.alpha));
    }

    fn max_updates(&self) -> Option<u32> {
        Some((RIPPLE_MAX_RADIUS / RIPPLE_SPEED).ceil() as u32)
    }
}
