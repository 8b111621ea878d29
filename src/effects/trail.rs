use super::{update_all, Effect, UpdateContext};
use crate::canvas::{rgba, BlendMode, Canvas};
use crate::ramp::RAINBOW;
use glam::{Vec2, Vec3};
use std::collections::VecDeque;

const RAINBOW_WIDTH: f32 = 5.0;
const POINTER_DOT_RADIUS: f32 = 3.0;
const POINTER_MIN_ALPHA: f32 = 20.0 / 255.0;

/// One static point of the rainbow trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    pub color: Vec3,
    life: u32,
    max_life: u32,
}

impl TrailPoint {
    pub fn new(position: Vec2, color: Vec3, life: u32) -> Self {
        Self {
            position,
            color,
            life,
            max_life: life.max(1),
        }
    }

    pub fn life(&self) -> u32 {
        self.life
    }
}

impl Effect for TrailPoint {
    fn update(&mut self, _ctx: &mut UpdateContext) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }

    /// Round joint; the segments are drawn by [`RainbowTrail`].
    fn draw(&self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha();
        if alpha > 0.0 {
            canvas.fill_circle(self.position, RAINBOW_WIDTH * 0.5, rgba(self.color, alpha), BlendMode::Alpha);
        }
    }

    fn max_updates(&self) -> Option<u32> {
        Some(self.life)
    }
}

/// Fading polyline that follows the pointer while rainbow mode is on.
#[derive(Debug, Clone, PartialEq)]
pub struct RainbowTrail {
    points: Vec<TrailPoint>,
    min_distance: f32,
    life: u32,
}

impl RainbowTrail {
    /// `min_distance` is the pointer travel needed for a new point, `life`
    /// the frames each point lives.
    pub fn new(min_distance: f32, life: u32) -> Self {
        Self {
            points: Vec::new(),
            min_distance,
            life,
        }
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Age every point and drop the dead ones.
    pub fn update(&mut self, ctx: &mut UpdateContext) {
        update_all(&mut self.points, ctx);
    }

    /// Append `pointer` if the trail is empty or the pointer has moved more
    /// than the minimum distance from the last point. Colors cycle through
    /// the rainbow by trail length.
    pub fn record(&mut self, pointer: Vec2) -> bool {
        let far_enough = match self.points.last() {
            Some(last) => last.position.distance(pointer) > self.min_distance,
            None => true,
        };
        if far_enough {
            let color = RAINBOW[self.points.len() % RAINBOW.len()];
            self.points.push(TrailPoint::new(pointer, color, self.life));
        }
        far_enough
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for pair in self.points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let alpha = to.alpha();
            if alpha <= 0.0 {
                continue;
            }
            canvas.line(from.position, to.position, RAINBOW_WIDTH, rgba(to.color, alpha));
            to.draw(canvas);
        }
    }
}

/// The last few pointer positions, drawn as fading dots.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTrail {
    positions: VecDeque<Vec2>,
    capacity: usize,
}

impl PointerTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, position: Vec2) {
        self.positions.push_back(position);
        while self.positions.len() > self.capacity {
            self.positions.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Oldest positions are faintest; the very oldest is never drawn.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let n = self.positions.len() as f32;
        for (i, position) in self.positions.iter().enumerate().skip(1) {
            let alpha = i as f32 / n;
            if alpha > POINTER_MIN_ALPHA {
                canvas.fill_circle(*position, POINTER_DOT_RADIUS, rgba(Vec3::ONE, alpha / 3.0), BlendMode::Alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::effects::test_support::run_to_expiry;
    use rand::rngs::mock::StepRng;

    fn age(trail: &mut RainbowTrail) {
        let mut rng = StepRng::new(0, 1);
        let mut ctx = UpdateContext::new(Vec2::ZERO, Vec2::splat(100.0), &mut rng);
        trail.update(&mut ctx);
    }

    #[test]
    fn test_trail_point_expires_after_life() {
        let mut point = TrailPoint::new(Vec2::ZERO, Vec3::ONE, 120);
        assert_eq!(run_to_expiry(&mut point, 1000), Some(120));
        assert_eq!(point.alpha(), 0.0);
    }

    #[test]
    fn test_record_requires_minimum_distance() {
        let mut trail = RainbowTrail::new(5.0, 120);
        assert!(trail.record(Vec2::ZERO));
        assert!(!trail.record(Vec2::new(3.0, 4.0)));
        assert!(trail.record(Vec2::new(3.0, 4.1)));
        assert_eq!(trail.points().len(), 2);
        assert_eq!(trail.points()[0].color, RAINBOW[0]);
        assert_eq!(trail.points()[1].color, RAINBOW[1]);
    }

    #[test]
    fn test_colors_cycle() {
        let mut trail = RainbowTrail::new(5.0, 120);
        for i in 0..9 {
            trail.record(Vec2::new(i as f32 * 10.0, 0.0));
        }
        assert_eq!(trail.points()[7].color, RAINBOW[0]);
        assert_eq!(trail.points()[8].color, RAINBOW[1]);
    }

    #[test]
    fn test_points_age_out() {
        let mut trail = RainbowTrail::new(5.0, 3);
        trail.record(Vec2::ZERO);
        age(&mut trail);
        age(&mut trail);
        assert_eq!(trail.points().len(), 1);
        age(&mut trail);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_rainbow_draws_segments() {
        let mut trail = RainbowTrail::new(5.0, 120);
        trail.record(Vec2::ZERO);
        trail.record(Vec2::new(10.0, 0.0));
        trail.record(Vec2::new(20.0, 0.0));
        let mut list = DrawList::default();
        trail.draw(&mut list);
        let lines = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_pointer_trail_keeps_last_positions() {
        let mut trail = PointerTrail::new(15);
        for i in 0..40 {
            trail.push(Vec2::splat(i as f32));
        }
        assert_eq!(trail.len(), 15);

        let mut list = DrawList::default();
        trail.draw(&mut list);
        // i = 1..15 all exceed 20/255 when n = 15
        assert_eq!(list.len(), 14);
    }
}
