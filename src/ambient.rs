//! The ambient particle field.
//!
//! A fixed population of particles that wander the whole screen. Appearance
//! is shared: every frame [`AmbientField::tick`] overwrites each particle's
//! color, size and speed with one [`Appearance`] derived from the current
//! index value, so particles differ only in position and phase.
//!
//! Motion per particle and frame:
//! 1. the heading takes a bounded random step
//! 2. the particle moves `speed` pixels along the heading
//! 3. `z` is recomputed as `z_max * sin(t + heading)`
//! 4. positions past an edge wrap to the opposite edge, keeping the overshoot
//!
//! Drawing sorts by `z` ascending so nearer particles land on top, and scales
//! size and brightness with normalized depth.

use crate::canvas::{rgba, BlendMode, Canvas};
use crate::config::{AmbientConfig, AppearanceBand};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Alpha of the additive glow halo.
const GLOW_ALPHA: f32 = 50.0 / 255.0;

/// Shared look of every ambient particle for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub color: Vec3,
    pub size: f32,
    pub speed: f32,
}

impl Appearance {
    /// Pick the first band whose upper bound exceeds `value`, or the last
    /// band. NaN selects the first band.
    pub fn for_value(bands: &[AppearanceBand], value: f32) -> Self {
        let band = if value.is_nan() {
            bands.first()
        } else {
            bands.iter().find(|b| value < b.upper).or(bands.last())
        };
        match band {
            Some(b) => Self {
                color: b.color,
                size: b.size,
                speed: b.speed,
            },
            None => Self {
                color: Vec3::ONE,
                size: 1.0,
                speed: 0.0,
            },
        }
    }
}

/// One wandering particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientParticle {
    pub position: Vec2,
    /// Pseudo-depth in `[-z_max, z_max]`; larger is nearer.
    pub z: f32,
    pub heading: f32,
    pub appearance: Appearance,
}

/// Fixed-size population of ambient particles.
#[derive(Debug, Clone)]
pub struct AmbientField {
    particles: Vec<AmbientParticle>,
    bounds: Vec2,
    z_max: f32,
    heading_jitter: f32,
}

impl AmbientField {
    /// Scatter `config.count` particles uniformly over the screen.
    pub fn new<R: Rng + ?Sized>(
        config: &AmbientConfig,
        bounds: Vec2,
        appearance: Appearance,
        rng: &mut R,
    ) -> Self {
        let z_max = config.z_max.abs();
        let particles = (0..config.count)
            .map(|_| AmbientParticle {
                position: Vec2::new(rng.gen_range(0.0..=bounds.x), rng.gen_range(0.0..=bounds.y)),
                z: if z_max > 0.0 { rng.gen_range(-z_max..=z_max) } else { 0.0 },
                heading: rng.gen_range(0.0..TAU),
                appearance,
            })
            .collect();
        Self {
            particles,
            bounds,
            z_max,
            heading_jitter: config.heading_jitter.abs(),
        }
    }

    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Normalized depth in `[0, 1]`: 0 farthest, 1 nearest.
    pub fn depth_factor(&self, z: f32) -> f32 {
        if self.z_max <= 0.0 {
            return 0.5;
        }
        ((z + self.z_max) / (2.0 * self.z_max)).clamp(0.0, 1.0)
    }

    /// Apply `appearance` to every particle and advance one frame.
    ///
    /// `time` is the elapsed scene time in seconds and drives the depth bob.
    pub fn tick<R: Rng + ?Sized>(&mut self, appearance: Appearance, time: f32, rng: &mut R) {
        let jitter = self.heading_jitter;
        for p in &mut self.particles {
            p.appearance = appearance;
            if jitter > 0.0 {
                p.heading += rng.gen_range(-jitter..=jitter);
            }
            p.position += Vec2::from_angle(p.heading) * appearance.speed;
            p.z = self.z_max * (time + p.heading).sin();
            p.position = wrap(p.position, self.bounds);
        }
    }

    /// Draw back to front.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let mut order: Vec<&AmbientParticle> = self.particles.iter().collect();
        order.sort_by(|a, b| a.z.total_cmp(&b.z));

        for p in order {
            let depth = self.depth_factor(p.z);
            let size = p.appearance.size * (0.5 + 0.5 * depth);
            let color = p.appearance.color * (0.7 + 0.3 * depth);
            canvas.fill_circle(p.position, size, rgba(color, 1.0), BlendMode::Alpha);
            canvas.fill_circle(p.position, size * 2.0, rgba(color, GLOW_ALPHA), BlendMode::Additive);
        }
    }
}

/// Toroidal wrap: a coordinate past one edge re-enters from the other with
/// the same overshoot.
pub fn wrap(position: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(position.x, bounds.x), wrap_axis(position.y, bounds.y))
}

fn wrap_axis(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    if v < 0.0 {
        (v + extent).max(0.0)
    } else if v > extent {
        (v - extent).min(extent)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(1200.0, 800.0);

    fn field(count: usize) -> (AmbientField, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(21);
        let config = AmbientConfig {
            count,
            ..AmbientConfig::default()
        };
        let bands = config.bands.clone();
        let field = AmbientField::new(&config, BOUNDS, Appearance::for_value(&bands, 0.0), &mut rng);
        (field, rng)
    }

    #[test]
    fn test_appearance_bands() {
        let bands = AmbientConfig::default().bands;
        assert_eq!(Appearance::for_value(&bands, 10.0).size, 3.0);
        assert_eq!(Appearance::for_value(&bands, 50.0).size, 4.0);
        assert_eq!(Appearance::for_value(&bands, 99.9).speed, 1.5);
        assert_eq!(Appearance::for_value(&bands, 149.0).size, 5.0);
        assert_eq!(Appearance::for_value(&bands, 150.0).size, 6.0);
        assert_eq!(Appearance::for_value(&bands, 1.0e6).speed, 2.5);
        assert_eq!(Appearance::for_value(&bands, f32::NAN).size, 3.0);
    }

    #[test]
    fn test_population_is_fixed() {
        let (mut field, mut rng) = field(200);
        let look = Appearance::for_value(&AmbientConfig::default().bands, 120.0);
        for frame in 0..500 {
            field.tick(look, frame as f32 / 60.0, &mut rng);
        }
        assert_eq!(field.len(), 200);
    }

    #[test]
    fn test_tick_shares_appearance() {
        let (mut field, mut rng) = field(50);
        let look = Appearance {
            color: Vec3::new(0.1, 0.2, 0.3),
            size: 7.0,
            speed: 1.0,
        };
        field.tick(look, 0.0, &mut rng);
        assert!(field.particles().iter().all(|p| p.appearance == look));
    }

    #[test]
    fn test_positions_and_depth_stay_bounded() {
        let (mut field, mut rng) = field(100);
        let look = Appearance {
            color: Vec3::ONE,
            size: 3.0,
            speed: 40.0,
        };
        for frame in 0..300 {
            field.tick(look, frame as f32 * 0.016, &mut rng);
            for p in field.particles() {
                assert!((0.0..=1200.0).contains(&p.position.x));
                assert!((0.0..=800.0).contains(&p.position.y));
                assert!(p.z.abs() <= 50.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_wrap_keeps_overshoot() {
        assert_eq!(wrap(Vec2::new(1203.0, 400.0), BOUNDS), Vec2::new(3.0, 400.0));
        assert_eq!(wrap(Vec2::new(-2.0, 400.0), BOUNDS), Vec2::new(1198.0, 400.0));
        assert_eq!(wrap(Vec2::new(10.0, 801.5), BOUNDS), Vec2::new(10.0, 1.5));
        assert_eq!(wrap(Vec2::new(10.0, -0.5), BOUNDS), Vec2::new(10.0, 799.5));
    }

    #[test]
    fn test_wrap_preserves_heading() {
        let (mut field, mut rng) = field(1);
        field.heading_jitter = 0.0;
        field.particles[0].position = Vec2::new(1199.0, 400.0);
        field.particles[0].heading = 0.0;
        let look = Appearance {
            color: Vec3::ONE,
            size: 3.0,
            speed: 2.5,
        };
        field.tick(look, 0.0, &mut rng);
        let p = field.particles()[0];
        assert!((p.position.x - 1.5).abs() < 1e-4);
        assert_eq!(p.heading, 0.0);
        field.tick(look, 0.0, &mut rng);
        assert!((field.particles()[0].position.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_draw_is_depth_sorted() {
        let (mut field, _) = field(3);
        field.particles[0].z = 40.0;
        field.particles[1].z = -40.0;
        field.particles[2].z = 0.0;

        let mut list = DrawList::default();
        field.draw(&mut list);

        let radii: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle {
                    radius,
                    blend: BlendMode::Alpha,
                    ..
                } => Some(*radius),
                _ => None,
            })
            .collect();
        // size grows with depth, so back-to-front means ascending radii
        assert_eq!(radii.len(), 3);
        assert!(radii[0] < radii[1] && radii[1] < radii[2]);
    }

    #[test]
    fn test_depth_factor() {
        let (field, _) = field(1);
        assert_eq!(field.depth_factor(-50.0), 0.0);
        assert_eq!(field.depth_factor(0.0), 0.5);
        assert_eq!(field.depth_factor(50.0), 1.0);
    }
}
