//! The presentation-layer contract.
//!
//! The engine never owns an output surface. It issues primitive drawing calls
//! against anything implementing [`Canvas`] and leaves the surface lifecycle
//! to the caller. Two implementations ship with the crate:
//!
//! - [`RasterCanvas`](crate::raster::RasterCanvas) rasterizes into an RGBA image
//! - [`DrawList`] records every call, which is what tests assert against
//!
//! Colors are linear RGBA in `0.0..=1.0` ([`Vec4`]); positions are screen
//! pixels with the origin top-left.

use glam::{Vec2, Vec3, Vec4};

/// How a primitive combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha-over blending (default).
    #[default]
    Alpha,

    /// Additive blending.
    ///
    /// Source color scaled by its alpha is added to the destination.
    /// Overlapping primitives get brighter; used for glows.
    Additive,
}

/// Scene layers in draw order, back to front.
///
/// A canvas is told when a layer begins so backends can batch or retarget
/// per layer. The compositor always emits them in [`Layer::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Regions,
    Ambient,
    Trail,
    Ripples,
    FloatingParticles,
    Explosions,
    Sparkles,
    Weather,
}

impl Layer {
    /// Every layer, back to front.
    pub const ORDER: [Layer; 9] = [
        Layer::Background,
        Layer::Regions,
        Layer::Ambient,
        Layer::Trail,
        Layer::Ripples,
        Layer::FloatingParticles,
        Layer::Explosions,
        Layer::Sparkles,
        Layer::Weather,
    ];
}

/// Primitive drawing operations the engine needs from a presentation backend.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> Vec2;

    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Vec3);

    /// Filled disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4, blend: BlendMode);

    /// Circle outline of the given stroke width.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Vec4);

    /// Straight segment of the given width.
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);

    /// Filled convex polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4);

    /// Filled axis-aligned rectangle, translucent when `color.w < 1`.
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Vec4);

    /// Rectangle outline of the given stroke width.
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Vec4);

    /// Called before the primitives of `layer` are issued.
    fn begin_layer(&mut self, _layer: Layer) {}
}

/// Attach an alpha channel to an RGB color.
#[inline]
pub fn rgba(color: Vec3, alpha: f32) -> Vec4 {
    color.extend(alpha)
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Layer(Layer),
    Clear(Vec3),
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Vec4,
        blend: BlendMode,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Vec4,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Vec4,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Vec4,
    },
    FillRect {
        min: Vec2,
        size: Vec2,
        color: Vec4,
    },
    StrokeRect {
        min: Vec2,
        size: Vec2,
        width: f32,
        color: Vec4,
    },
}

impl DrawCommand {
    /// Alpha of the primitive, if it has one.
    pub fn alpha(&self) -> Option<f32> {
        match self {
            DrawCommand::Layer(_) | DrawCommand::Clear(_) => None,
            DrawCommand::FillCircle { color, .. }
            | DrawCommand::StrokeCircle { color, .. }
            | DrawCommand::Line { color, .. }
            | DrawCommand::Polygon { color, .. }
            | DrawCommand::FillRect { color, .. }
            | DrawCommand::StrokeRect { color, .. } => Some(color.w),
        }
    }
}

/// A canvas that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Empty list for a surface of `size` pixels.
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Every recorded call in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Layers in the order they were begun.
    pub fn layers(&self) -> Vec<Layer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Calls issued between the start of `layer` and the next layer marker.
    pub fn layer_commands(&self, layer: Layer) -> &[DrawCommand] {
        let Some(start) = self
            .commands
            .iter()
            .position(|c| *c == DrawCommand::Layer(layer))
        else {
            return &[];
        };
        let rest = &self.commands[start + 1..];
        let end = rest
            .iter()
            .position(|c| matches!(c, DrawCommand::Layer(_)))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Forget all recorded calls.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Vec3) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4, blend: BlendMode) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
            blend,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Vec4) {
        self.commands.push(DrawCommand::FillRect { min, size, color });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::StrokeRect {
            min,
            size,
            width,
            color,
        });
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.commands.push(DrawCommand::Layer(layer));
    }
}
