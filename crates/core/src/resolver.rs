//! Resolution of placement requests into pixel geometry.
//!
//! [`PositioningResolver`] turns a [`PositionRequest`]/[`SizeRequest`] pair into
//! absolute [`Bounds`] against a reference extent, applying grid snapping when
//! enabled. The free functions in this module implement alignment and even
//! distribution over sets of bounds.

use crate::config::GridSettings;
use crate::geometry::{
    Alignment, Axis, Bounds, HorizontalAlign, PositionRequest, SizeRequest, VerticalAlign,
};
use crate::surface::SurfaceProfile;

/// Tolerance added before flooring fractional coordinates, so that values a
/// hair below an integer (e.g. `0.1 * 3000.0`) land on it.
const FRACTION_EPSILON: f64 = 1e-6;

/// Snap a coordinate to the nearest multiple of `cell`.
///
/// Idempotent: snapping an already snapped value returns it unchanged.
pub fn snap_to_grid(value: f64, cell: u32) -> i32 {
    if cell == 0 {
        return value.round() as i32;
    }
    let cell = cell as f64;
    ((value / cell).round() * cell) as i32
}

/// `fraction * extent`, floored.
pub(crate) fn fraction_to_pixels(fraction: f64, extent: u32) -> i64 {
    (fraction * extent as f64 + FRACTION_EPSILON).floor() as i64
}

pub(crate) fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub(crate) fn clamp_size(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

/// Resolves placement requests against a reference extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositioningResolver {
    grid: GridSettings,
}

impl PositioningResolver {
    pub fn new(grid: GridSettings) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    /// Resolve a position against the full surface.
    pub fn resolve_position(
        &self,
        request: PositionRequest,
        surface: &SurfaceProfile,
    ) -> (i32, i32) {
        self.resolve_position_in(request, surface.pixel_extent())
    }

    /// Resolve a position against an arbitrary `(width, height)` extent.
    pub fn resolve_position_in(&self, request: PositionRequest, extent: (u32, u32)) -> (i32, i32) {
        match request {
            PositionRequest::Absolute { x, y } => {
                if self.grid.snap_enabled {
                    self.snap(x as f64, y as f64)
                } else {
                    (x, y)
                }
            }
            PositionRequest::Relative { fx, fy } => {
                if self.grid.snap_enabled {
                    self.snap(fx * extent.0 as f64, fy * extent.1 as f64)
                } else {
                    (
                        clamp_i32(fraction_to_pixels(fx, extent.0)),
                        clamp_i32(fraction_to_pixels(fy, extent.1)),
                    )
                }
            }
            PositionRequest::Grid { col, row } => (
                clamp_i32(col as i64 * self.grid.cell_width as i64),
                clamp_i32(row as i64 * self.grid.cell_height as i64),
            ),
        }
    }

    /// Resolve a size against the full surface.
    pub fn resolve_size(&self, request: SizeRequest, surface: &SurfaceProfile) -> (u32, u32) {
        self.resolve_size_in(request, surface.pixel_extent())
    }

    /// Resolve a size against an arbitrary `(width, height)` extent.
    ///
    /// Negative relative sizes clamp to zero.
    pub fn resolve_size_in(&self, request: SizeRequest, extent: (u32, u32)) -> (u32, u32) {
        let (width, height) = match request {
            SizeRequest::Absolute { width, height } if !self.grid.snap_enabled => {
                return (width, height);
            }
            SizeRequest::Absolute { width, height } => (width as f64, height as f64),
            SizeRequest::Relative { fw, fh } if !self.grid.snap_enabled => {
                return (
                    clamp_size(fraction_to_pixels(fw, extent.0)),
                    clamp_size(fraction_to_pixels(fh, extent.1)),
                );
            }
            SizeRequest::Relative { fw, fh } => (fw * extent.0 as f64, fh * extent.1 as f64),
            SizeRequest::Grid { cols, rows } => {
                return (
                    clamp_size(cols as i64 * self.grid.cell_width as i64),
                    clamp_size(rows as i64 * self.grid.cell_height as i64),
                );
            }
        };

        // Snap the raw product; flooring first can cross a half-cell boundary.
        let (w, h) = self.snap(width, height);
        (clamp_size(w as i64), clamp_size(h as i64))
    }

    /// Resolve a full position/size pair into bounds.
    pub fn resolve(
        &self,
        position: PositionRequest,
        size: SizeRequest,
        extent: (u32, u32),
    ) -> Bounds {
        let (x, y) = self.resolve_position_in(position, extent);
        let (width, height) = self.resolve_size_in(size, extent);
        Bounds::new(x, y, width, height)
    }

    /// Snap a point to the grid, independently per axis.
    pub fn snap(&self, x: f64, y: f64) -> (i32, i32) {
        (
            snap_to_grid(x, self.grid.cell_width),
            snap_to_grid(y, self.grid.cell_height),
        )
    }
}

fn align_x(bounds: Bounds, align: HorizontalAlign, container: Bounds, margin: i32) -> i32 {
    let (x, width, margin) = (container.x as i64, container.width as i64, margin as i64);
    let own = bounds.width as i64;
    clamp_i32(match align {
        HorizontalAlign::Left => x + margin,
        HorizontalAlign::Center => x + (width - own) / 2,
        HorizontalAlign::Right => x + width - own - margin,
    })
}

fn align_y(bounds: Bounds, align: VerticalAlign, container: Bounds, margin: i32) -> i32 {
    let (y, height, margin) = (container.y as i64, container.height as i64, margin as i64);
    let own = bounds.height as i64;
    clamp_i32(match align {
        VerticalAlign::Top => y + margin,
        VerticalAlign::Middle => y + (height - own) / 2,
        VerticalAlign::Bottom => y + height - own - margin,
    })
}

/// Align every element independently to `container`.
///
/// `margin` is kept between the element and the container edge it is aligned
/// to; centered axes ignore it.
pub fn align(
    elements: &[Bounds],
    alignment: Alignment,
    container: Bounds,
    margin: i32,
) -> Vec<Bounds> {
    elements
        .iter()
        .map(|b| {
            b.with_origin(
                align_x(*b, alignment.horizontal(), container, margin),
                align_y(*b, alignment.vertical(), container, margin),
            )
        })
        .collect()
}

/// Align the x axis only; y is left untouched.
pub fn align_horizontal(
    elements: &[Bounds],
    alignment: HorizontalAlign,
    container: Bounds,
    margin: i32,
) -> Vec<Bounds> {
    elements
        .iter()
        .map(|b| b.with_origin(align_x(*b, alignment, container, margin), b.y))
        .collect()
}

/// Align the y axis only; x is left untouched.
pub fn align_vertical(
    elements: &[Bounds],
    alignment: VerticalAlign,
    container: Bounds,
    margin: i32,
) -> Vec<Bounds> {
    elements
        .iter()
        .map(|b| b.with_origin(b.x, align_y(*b, alignment, container, margin)))
        .collect()
}

/// Align every element to the edges of the first one.
///
/// The first element is the reference and is returned unchanged.
pub fn align_to_reference(elements: &[Bounds], alignment: Alignment) -> Vec<Bounds> {
    let Some(reference) = elements.first().copied() else {
        return Vec::new();
    };

    let (ref_cx, ref_cy) = reference.center();
    elements
        .iter()
        .map(|b| {
            let x = match alignment.horizontal() {
                HorizontalAlign::Left => reference.x,
                HorizontalAlign::Center => (ref_cx - b.width as f64 / 2.0).round() as i32,
                HorizontalAlign::Right => {
                    clamp_i32(reference.x as i64 + reference.width as i64 - b.width as i64)
                }
            };
            let y = match alignment.vertical() {
                VerticalAlign::Top => reference.y,
                VerticalAlign::Middle => (ref_cy - b.height as f64 / 2.0).round() as i32,
                VerticalAlign::Bottom => {
                    clamp_i32(reference.y as i64 + reference.height as i64 - b.height as i64)
                }
            };
            b.with_origin(x, y)
        })
        .collect()
}

/// Spread elements evenly between `start` and `end` along `axis`.
///
/// Element `i` (1-indexed) gets its center at `start + i * spacing` where
/// `spacing = (end - start) / (count + 1)`. Sizes are kept, caller order is
/// placement order. Fewer than two elements are returned unchanged.
pub fn distribute(elements: &[Bounds], axis: Axis, start: i32, end: i32) -> Vec<Bounds> {
    if elements.len() < 2 {
        return elements.to_vec();
    }

    let spacing = (end as f64 - start as f64) / (elements.len() + 1) as f64;
    elements
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let center = start as f64 + (i + 1) as f64 * spacing;
            match axis {
                Axis::Horizontal => {
                    b.with_origin((center - b.width as f64 / 2.0).round() as i32, b.y)
                }
                Axis::Vertical => {
                    b.with_origin(b.x, (center - b.height as f64 / 2.0).round() as i32)
                }
            }
        })
        .collect()
}
