//! District grid layout and the timeline strip.
//!
//! Districts are laid out row-major in a fixed number of columns below a top
//! margin. The same geometry feeds the region layer, hover and click hit
//! testing, and sparkle placement. The [`Timeline`] is a horizontal strip near
//! the bottom of the screen that maps a click to a year.

use crate::config::LayoutConfig;
use glam::Vec2;
use rand::Rng;
use std::ops::RangeInclusive;

/// Inset used when scattering points inside a cell.
const SCATTER_INSET: f32 = 10.0;

/// Screen rectangle of one district.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub index: usize,
    /// Top-left corner of the grid slot.
    pub origin: Vec2,
    /// Visible rectangle size (slot size minus the gap).
    pub size: Vec2,
    /// Slot size before the gap is removed.
    pub pitch: Vec2,
}

impl Cell {
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Half-open containment: left and top edges are inside, right and bottom
    /// are not.
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }

    /// Random point in the slot, inset from its edges.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let lo = SCATTER_INSET;
        let hi_x = (self.pitch.x - 2.0 * SCATTER_INSET).max(lo);
        let hi_y = (self.pitch.y - 2.0 * SCATTER_INSET).max(lo);
        self.origin + Vec2::new(rng.gen_range(lo..=hi_x), rng.gen_range(lo..=hi_y))
    }
}

/// Row-major grid of district cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictLayout {
    cells: Vec<Cell>,
}

impl DistrictLayout {
    /// Lay out `count` districts across a screen `screen_width` pixels wide.
    pub fn new(config: &LayoutConfig, screen_width: f32, count: usize) -> Self {
        let columns = config.columns.max(1);
        let cell_width = ((screen_width - 2.0 * config.margin) / columns as f32).floor().max(0.0);
        let pitch = Vec2::new(cell_width, config.cell_height);
        let size = (pitch - Vec2::splat(config.gap)).max(Vec2::ZERO);

        let cells = (0..count)
            .map(|index| {
                let row = index / columns;
                let col = index % columns;
                Cell {
                    index,
                    origin: Vec2::new(
                        config.margin + col as f32 * cell_width,
                        config.top + row as f32 * config.cell_height,
                    ),
                    size,
                    pitch,
                }
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// District under `point`, if any.
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.cells.iter().find(|c| c.contains(point)).map(|c| c.index)
    }
}

/// Horizontal strip mapping x positions onto a year range.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub origin: Vec2,
    pub size: Vec2,
    first_year: i32,
    last_year: i32,
}

impl Timeline {
    pub fn new(config: &LayoutConfig, screen: Vec2, years: RangeInclusive<i32>) -> Self {
        let first_year = *years.start();
        Self {
            origin: Vec2::new(config.timeline_inset, screen.y - config.timeline_bottom),
            size: Vec2::new(
                (screen.x - 2.0 * config.timeline_inset).max(0.0),
                config.timeline_height.max(0.0),
            ),
            first_year,
            last_year: (*years.end()).max(first_year),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }

    /// Nearest whole year under `point`, or `None` outside the strip.
    pub fn year_at(&self, point: Vec2) -> Option<i32> {
        if !self.contains(point) || self.size.x <= 0.0 {
            return None;
        }
        let frac = (point.x - self.origin.x) / self.size.x;
        let span = (self.last_year - self.first_year) as f32;
        let year = (self.first_year as f32 + frac * span).round() as i32;
        Some(year.clamp(self.first_year, self.last_year))
    }

    /// Point on the strip's center line for `year`.
    pub fn anchor(&self, year: i32) -> Vec2 {
        let span = (self.last_year - self.first_year).max(1) as f32;
        let frac = (year.clamp(self.first_year, self.last_year) - self.first_year) as f32 / span;
        Vec2::new(self.origin.x + frac * self.size.x, self.origin.y + self.size.y * 0.5)
    }
}
