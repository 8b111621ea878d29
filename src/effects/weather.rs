use super::{Effect, UpdateContext};
use crate::canvas::{rgba, BlendMode, Canvas};
use crate::ramp::rgb8;
use glam::Vec2;
use rand::Rng;

const MIN_PARTICLES: f32 = 10.0;
const MAX_PARTICLES: f32 = 100.0;
/// Drops start up to this far above the top edge.
const RAIN_HEADROOM: f32 = 100.0;
/// Fog blobs wrap once this far past a side edge.
const FOG_OVERHANG: f32 = 50.0;
const RAIN_WIDTH: f32 = 2.0;

/// Which kind of weather a [`Weather`] effect shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Rain,
    Fog,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    pub position: Vec2,
    pub speed: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogBlob {
    pub position: Vec2,
    pub drift: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Screen-wide swarm of rain drops or fog blobs.
///
/// Weather never expires on its own. The manager holds at most one and
/// replaces it on override.
#[derive(Debug, Clone, PartialEq)]
pub enum Weather {
    Rain { drops: Vec<RainDrop> },
    Fog { blobs: Vec<FogBlob> },
}

/// Swarm size for an index value: the value clamped to `[10, 100]`.
pub fn particle_count(index_value: f32) -> usize {
    if index_value.is_nan() {
        return MIN_PARTICLES as usize;
    }
    index_value.clamp(MIN_PARTICLES, MAX_PARTICLES) as usize
}

fn random_drop_origin<R: Rng + ?Sized>(bounds: Vec2, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..=bounds.x),
        rng.gen_range(-RAIN_HEADROOM..=0.0),
    )
}

impl Weather {
    /// Build a swarm sized by `index_value` over a screen of `bounds` pixels.
    pub fn new<R: Rng + ?Sized>(kind: WeatherKind, index_value: f32, bounds: Vec2, rng: &mut R) -> Self {
        let count = particle_count(index_value);
        match kind {
            WeatherKind::Rain => Weather::Rain {
                drops: (0..count)
                    .map(|_| RainDrop {
                        position: random_drop_origin(bounds, rng),
                        speed: rng.gen_range(3.0..8.0),
                        length: rng.gen_range(10..=20) as f32,
                    })
                    .collect(),
            },
            WeatherKind::Fog => Weather::Fog {
                blobs: (0..count)
                    .map(|_| FogBlob {
                        position: Vec2::new(
                            rng.gen_range(0.0..=bounds.x),
                            rng.gen_range(0.0..=bounds.y),
                        ),
                        drift: Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.2..0.2)),
                        size: rng.gen_range(20..=50) as f32,
                        alpha: rng.gen_range(10..=30) as f32 / 255.0,
                    })
                    .collect(),
            },
        }
    }

    pub fn kind(&self) -> WeatherKind {
        match self {
            Weather::Rain { .. } => WeatherKind::Rain,
            Weather::Fog { .. } => WeatherKind::Fog,
        }
    }

    /// Number of drops or blobs.
    pub fn len(&self) -> usize {
        match self {
            Weather::Rain { drops } => drops.len(),
            Weather::Fog { blobs } => blobs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Effect for Weather {
    fn update(&mut self, ctx: &mut UpdateContext) -> bool {
        let bounds = ctx.bounds;
        match self {
            Weather::Rain { drops } => {
                for drop in drops {
                    drop.position.y += drop.speed;
                    if drop.position.y > bounds.y {
                        drop.position = random_drop_origin(bounds, &mut *ctx.rng);
                    }
                }
            }
            Weather::Fog { blobs } => {
                for blob in blobs {
                    blob.position += blob.drift;
                    if blob.position.x < -FOG_OVERHANG {
                        blob.position.x = bounds.x + FOG_OVERHANG;
                    } else if blob.position.x > bounds.x + FOG_OVERHANG {
                        blob.position.x = -FOG_OVERHANG;
                    }
                }
            }
        }
        true
    }

    fn alpha(&self) -> f32 {
        match self {
            Weather::Rain { .. } => 1.0,
            Weather::Fog { blobs } => blobs.iter().map(|b| b.alpha).fold(0.0, f32::max),
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        match self {
            Weather::Rain { drops } => {
                let color = rgba(rgb8(100, 150, 255), 1.0);
                for drop in drops {
                    let tail = drop.position + Vec2::new(0.0, drop.length);
                    canvas.line(drop.position, tail, RAIN_WIDTH, color);
                }
            }
            Weather::Fog { blobs } => {
                let grey = rgb8(200, 200, 200);
                for blob in blobs {
                    canvas.fill_circle(blob.position, blob.size, rgba(grey, blob.alpha), BlendMode::Alpha);
                }
            }
        }
    }

    fn max_updates(&self) -> Option<u32> {
        None
    }
}
