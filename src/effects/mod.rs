//! Transient visual effects.
//!
//! Every effect kind is its own struct with a fixed set of typed fields and
//! implements the shared [`Effect`] contract:
//!
//! - [`Effect::update`] advances motion and age by one frame and returns
//!   `false` exactly once, on the frame the effect should be removed.
//! - [`Effect::draw`] is read-only and emits nothing once the visible alpha
//!   has reached zero, even if the effect is still alive for one more frame.
//!
//! The [`EffectManager`](crate::manager::EffectManager) keeps one collection
//! per kind and drops an effect in the same frame its `update` reports expiry.
//!
//! | Kind | Expires when |
//! |---|---|
//! | [`Ripple`] | radius reaches its maximum |
//! | [`FloatingParticle`] | age reaches 180 frames |
//! | [`Explosion`] | age reaches 120 frames or every spark has died |
//! | [`DataSparkle`] | age reaches its lifetime (180 to 300 frames) |
//! | [`Weather`] | never; the manager caps and replaces it |
//! | [`TrailPoint`] | life counts down to zero |

mod explosion;
mod floating;
mod ripple;
mod sparkle;
mod trail;
mod weather;

pub use explosion::{Explosion, Spark};
pub use floating::FloatingParticle;
pub use ripple::Ripple;
pub use sparkle::DataSparkle;
pub use trail::{PointerTrail, RainbowTrail, TrailPoint};
pub use weather::{Weather, WeatherKind};

use crate::canvas::Canvas;
use glam::Vec2;
use rand::RngCore;

/// Per-frame inputs handed to every effect update.
pub struct UpdateContext<'a> {
    /// Current pointer position in screen pixels.
    pub pointer: Vec2,
    /// Screen size in pixels.
    pub bounds: Vec2,
    /// Random source for effects that re-randomize while alive.
    pub rng: &'a mut dyn RngCore,
}

impl<'a> UpdateContext<'a> {
    pub fn new(pointer: Vec2, bounds: Vec2, rng: &'a mut dyn RngCore) -> Self {
        Self {
            pointer,
            bounds,
            rng,
        }
    }
}

/// Lifecycle shared by all transient effects.
pub trait Effect {
    /// Advance one frame. Returns `false` when the effect should be removed.
    fn update(&mut self, ctx: &mut UpdateContext) -> bool;

    /// Remaining visible alpha in `0.0..=1.0`.
    fn alpha(&self) -> f32;

    /// Issue drawing calls. Must draw nothing once [`Effect::alpha`] is zero.
    fn draw(&self, canvas: &mut dyn Canvas);

    /// Upper bound on `update` calls before expiry, or `None` for effects
    /// that only leave when the manager removes them.
    fn max_updates(&self) -> Option<u32>;
}

/// Drop every effect whose update reports expiry.
pub(crate) fn update_all<E: Effect>(effects: &mut Vec<E>, ctx: &mut UpdateContext) {
    effects.retain_mut(|effect| effect.update(ctx));
}

/// Draw a whole collection in insertion order.
pub(crate) fn draw_all<E: Effect>(effects: &[E], canvas: &mut dyn Canvas) {
    for effect in effects {
        effect.draw(canvas);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// Run `update` until expiry and return the number of calls made.
    pub fn run_to_expiry<E: Effect>(effect: &mut E, limit: u32) -> Option<u32> {
        let mut rng = StepRng::new(0, 1);
        let mut ctx = UpdateContext::new(Vec2::new(600.0, 400.0), Vec2::new(1200.0, 800.0), &mut rng);
        (1..=limit).find(|_| !effect.update(&mut ctx))
    }
}
