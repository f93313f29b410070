//! Geometry value types: bounds, placement requests and alignment modes.

use serde::{Deserialize, Serialize};

/// Absolute pixel rectangle of a placed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        (self.x as i64 + self.width as i64).min(i32::MAX as i64) as i32
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        (self.y as i64 + self.height as i64).min(i32::MAX as i64) as i32
    }

    /// Center point as fractional pixels.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same size, moved to a new origin.
    pub fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Shift the origin by `(dx, dy)`.
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds::new(
            x,
            y,
            (right as i64 - x as i64) as u32,
            (bottom as i64 - y as i64) as u32,
        )
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Requested position of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionRequest {
    /// Pixel coordinates.
    Absolute { x: i32, y: i32 },
    /// Fractions of the reference extent. Values outside `[0, 1]` are allowed.
    Relative { fx: f64, fy: f64 },
    /// Grid cell coordinates, multiplied by the grid cell size.
    Grid { col: i32, row: i32 },
}

/// Requested size of an element. Mirrors [`PositionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeRequest {
    Absolute { width: u32, height: u32 },
    Relative { fw: f64, fh: f64 },
    Grid { cols: u32, rows: u32 },
}

/// Horizontal component of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical component of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Nine-point alignment within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Alignment {
    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            Alignment::TopLeft | Alignment::MiddleLeft | Alignment::BottomLeft => {
                HorizontalAlign::Left
            }
            Alignment::TopCenter | Alignment::MiddleCenter | Alignment::BottomCenter => {
                HorizontalAlign::Center
            }
            Alignment::TopRight | Alignment::MiddleRight | Alignment::BottomRight => {
                HorizontalAlign::Right
            }
        }
    }

    pub fn vertical(self) -> VerticalAlign {
        match self {
            Alignment::TopLeft | Alignment::TopCenter | Alignment::TopRight => VerticalAlign::Top,
            Alignment::MiddleLeft | Alignment::MiddleCenter | Alignment::MiddleRight => {
                VerticalAlign::Middle
            }
            Alignment::BottomLeft | Alignment::BottomCenter | Alignment::BottomRight => {
                VerticalAlign::Bottom
            }
        }
    }
}

/// Layout axis for distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}
