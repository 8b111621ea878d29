//! Fixed-order scene composition.
//!
//! Layers are emitted back to front in [`Layer::ORDER`]: background, district
//! cells, depth-sorted ambient particles, the active pointer trail, ripples,
//! floating particles, explosions, sparkles and weather. Each layer is
//! announced with [`Canvas::begin_layer`] even when it has nothing to draw.

use crate::ambient::AmbientField;
use crate::canvas::{rgba, Canvas, Layer};
use crate::layout::DistrictLayout;
use crate::manager::EffectManager;
use crate::ramp::{BACKGROUND, HIGHLIGHT};
use glam::{Vec2, Vec3};

const HOVER_GLOW_PAD: f32 = 10.0;
const HOVER_GLOW_ALPHA: f32 = 30.0 / 255.0;
const BORDER_WIDTH: f32 = 3.0;
const LINK_WIDTH: f32 = 2.0;

/// District cells as they should appear this frame.
#[derive(Debug, Clone, Copy)]
pub struct RegionLayer<'a> {
    pub layout: &'a DistrictLayout,
    /// One color per cell.
    pub colors: &'a [Vec3],
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
    pub pointer: Vec2,
    /// Elapsed scene time in seconds; drives the hover border flash.
    pub time: f32,
}

/// Borrowed view of everything drawn in one frame.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub regions: RegionLayer<'a>,
    pub ambient: &'a AmbientField,
    pub effects: &'a EffectManager,
}

/// Draw a whole frame.
pub fn compose(frame: &Frame, canvas: &mut dyn Canvas) {
    for layer in Layer::ORDER {
        canvas.begin_layer(layer);
        match layer {
            Layer::Background => canvas.clear(BACKGROUND),
            Layer::Regions => draw_regions(&frame.regions, canvas),
            Layer::Ambient => frame.ambient.draw(canvas),
            Layer::Trail => frame.effects.draw_trail(canvas),
            Layer::Ripples => frame.effects.draw_ripples(canvas),
            Layer::FloatingParticles => frame.effects.draw_floating(canvas),
            Layer::Explosions => frame.effects.draw_explosions(canvas),
            Layer::Sparkles => frame.effects.draw_sparkles(canvas),
            Layer::Weather => frame.effects.draw_weather(canvas),
        }
    }
}

/// Brightness of the hover border, pulsing between 155/255 and 1.
fn border_flash(time: f32) -> f32 {
    ((time * 10.0).sin().abs() * 100.0 + 155.0) / 255.0
}

/// Opacity of the pointer-to-center link: fades with distance down to a floor.
/// `None` when the pointer sits exactly on the center.
fn link_alpha(distance: f32) -> Option<f32> {
    if distance <= 0.0 || !distance.is_finite() {
        return None;
    }
    Some((255.0 - 2.0 * distance).max(50.0) / 255.0)
}

fn draw_regions(regions: &RegionLayer, canvas: &mut dyn Canvas) {
    let bounds = canvas.size();
    for (cell, &color) in regions.layout.cells().iter().zip(regions.colors) {
        let hovered = regions.hovered == Some(cell.index);

        if hovered {
            let pad = Vec2::splat(HOVER_GLOW_PAD);
            canvas.fill_rect(cell.origin - pad, cell.size + 2.0 * pad, rgba(color, HOVER_GLOW_ALPHA));
        }

        canvas.fill_rect(cell.origin, cell.size, rgba(color, 1.0));

        if hovered {
            let flash = border_flash(regions.time);
            canvas.stroke_rect(cell.origin, cell.size, BORDER_WIDTH, Vec3::splat(flash).extend(1.0));

            let center = cell.center();
            if let Some(alpha) = link_alpha(regions.pointer.distance(center)) {
                for offset in -2..=2 {
                    let shift = Vec2::splat(offset as f32);
                    let start = regions.pointer + shift;
                    if start.x >= 0.0 && start.y >= 0.0 && start.x < bounds.x && start.y < bounds.y {
                        canvas.line(start, center + shift, LINK_WIDTH, rgba(color, alpha));
                    }
                }
            }
        }

        if regions.selected == Some(cell.index) {
            canvas.stroke_rect(cell.origin, cell.size, BORDER_WIDTH, rgba(HIGHLIGHT, 1.0));
        }
    }
}
