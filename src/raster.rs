//! CPU reference backend for [`Canvas`].
//!
//! [`RasterCanvas`] keeps a linear RGB float buffer, blends every primitive
//! with hard-edged pixel coverage (sampled at pixel centers) and converts to
//! an 8-bit [`RgbaImage`] on demand. It is meant for headless rendering and
//! visual checks, not for speed.

use crate::canvas::{BlendMode, Canvas};
use crate::error::RenderError;
use glam::{Vec2, Vec3, Vec4};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Software canvas backed by a float framebuffer.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

/// Inclusive pixel range covered by an axis-aligned box, clipped to the surface.
struct Span {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl RasterCanvas {
    /// Black canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Convert to an 8-bit opaque image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixels[(y * self.width + x) as usize].clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            Rgba([c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255])
        })
    }

    /// Write the frame as an image file; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.to_image().save(path)?;
        Ok(())
    }

    fn span(&self, min: Vec2, max: Vec2) -> Option<Span> {
        if !(min.is_finite() && max.is_finite()) || self.width == 0 || self.height == 0 {
            return None;
        }
        let lo = min.floor().max(Vec2::ZERO);
        let hi = max.ceil().min(Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0));
        if lo.x > hi.x || lo.y > hi.y {
            return None;
        }
        Some(Span {
            x0: lo.x as u32,
            y0: lo.y as u32,
            x1: hi.x as u32,
            y1: hi.y as u32,
        })
    }

    /// Blend `color` into every pixel of the box whose center passes `covers`.
    fn shade(&mut self, min: Vec2, max: Vec2, color: Vec4, blend: BlendMode, covers: impl Fn(Vec2) -> bool) {
        let alpha = color.w.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some(span) = self.span(min, max) else {
            return;
        };
        let src = color.truncate();
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !covers(center) {
                    continue;
                }
                let dst = &mut self.pixels[(y * self.width + x) as usize];
                *dst = match blend {
                    BlendMode::Alpha => dst.lerp(src, alpha),
                    BlendMode::Additive => (*dst + src * alpha).min(Vec3::ONE),
                };
            }
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Even-odd point in polygon test.
fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Canvas for RasterCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn clear(&mut self, color: Vec3) {
        self.pixels.fill(color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4, blend: BlendMode) {
        if radius <= 0.0 {
            return;
        }
        let r = Vec2::splat(radius);
        let r_sq = radius * radius;
        self.shade(center - r, center + r, color, blend, |p| p.distance_squared(center) <= r_sq);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Vec4) {
        let half = (width * 0.5).max(0.5);
        let outer = Vec2::splat(radius + half);
        self.shade(center - outer, center + outer, color, BlendMode::Alpha, |p| {
            (p.distance(center) - radius).abs() <= half
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        let half = (width * 0.5).max(0.5);
        let pad = Vec2::splat(half);
        self.shade(from.min(to) - pad, from.max(to) + pad, color, BlendMode::Alpha, |p| {
            segment_distance(p, from, to) <= half
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
        let max = points.iter().copied().fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
        self.shade(min, max, color, BlendMode::Alpha, |p| polygon_contains(points, p));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Vec4) {
        let max = min + size;
        self.shade(min, max, color, BlendMode::Alpha, |p| {
            p.x >= min.x && p.y >= min.y && p.x < max.x && p.y < max.y
        });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Vec4) {
        let max = min + size;
        let inner_min = min + Vec2::splat(width);
        let inner_max = max - Vec2::splat(width);
        self.shade(min, max, color, BlendMode::Alpha, |p| {
            let inside = p.x >= min.x && p.y >= min.y && p.x < max.x && p.y < max.y;
            let hollow = p.x >= inner_min.x && p.y >= inner_min.y && p.x < inner_max.x && p.y < inner_max.y;
            inside && !hollow
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_clear_and_pixel() {
        let mut canvas = RasterCanvas::new(4, 3);
        canvas.clear(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(canvas.size(), Vec2::new(4.0, 3.0));
        assert_eq!(canvas.pixel(3, 2), Some(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_alpha_blend() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.clear(Vec3::ZERO);
        canvas.fill_circle(Vec2::new(4.0, 4.0), 2.0, Vec4::new(1.0, 0.0, 0.0, 0.5), BlendMode::Alpha);
        assert!(approx(canvas.pixel(4, 4).unwrap(), Vec3::new(0.5, 0.0, 0.0)));
        assert_eq!(canvas.pixel(0, 0), Some(Vec3::ZERO));
    }

    #[test]
    fn test_additive_saturates() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.clear(Vec3::splat(0.8));
        canvas.fill_circle(Vec2::new(2.0, 2.0), 3.0, Vec4::new(1.0, 0.1, 0.0, 0.5), BlendMode::Additive);
        assert!(approx(canvas.pixel(2, 2).unwrap(), Vec3::new(1.0, 0.85, 0.8)));
    }

    #[test]
    fn test_line_coverage() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.line(Vec2::new(0.0, 5.5), Vec2::new(10.0, 5.5), 1.0, Vec4::ONE);
        assert_eq!(canvas.pixel(3, 5), Some(Vec3::ONE));
        assert_eq!(canvas.pixel(3, 2), Some(Vec3::ZERO));
    }

    #[test]
    fn test_polygon_fill() {
        let mut canvas = RasterCanvas::new(10, 10);
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(8.0, 2.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(2.0, 8.0),
        ];
        canvas.fill_polygon(&square, Vec4::ONE);
        assert_eq!(canvas.pixel(5, 5), Some(Vec3::ONE));
        assert_eq!(canvas.pixel(9, 9), Some(Vec3::ZERO));
    }

    #[test]
    fn test_stroke_rect_is_hollow() {
        let mut canvas = RasterCanvas::new(20, 20);
        canvas.stroke_rect(Vec2::new(2.0, 2.0), Vec2::new(16.0, 16.0), 2.0, Vec4::ONE);
        assert_eq!(canvas.pixel(2, 10), Some(Vec3::ONE));
        assert_eq!(canvas.pixel(10, 10), Some(Vec3::ZERO));
    }

    #[test]
    fn test_offscreen_and_degenerate_primitives_are_ignored() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.fill_circle(Vec2::new(-100.0, -100.0), 5.0, Vec4::ONE, BlendMode::Alpha);
        canvas.fill_circle(Vec2::new(f32::NAN, 1.0), 5.0, Vec4::ONE, BlendMode::Alpha);
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Vec4::ONE);
        assert!(canvas.pixels.iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn test_to_image() {
        let mut canvas = RasterCanvas::new(2, 2);
        canvas.clear(Vec3::new(1.0, 0.5, 0.0));
        let img = canvas.to_image();
        assert_eq!(img.get_pixel(1, 1).0, [255, 128, 0, 255]);
    }
}
