//! Unit conversion between millimeters, inches, points and pixels.
//!
//! All functions are pure. Inputs are not validated: negative or zero
//! lengths produce zero-or-negative outputs and must be rejected upstream.

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert a physical size in millimeters to whole pixels at `dpi`.
///
/// `px = round(mm / 25.4 * dpi)` per axis.
pub fn mm_to_pixels(width_mm: f64, height_mm: f64, dpi: f64) -> (i32, i32) {
    (mm_to_px(width_mm, dpi), mm_to_px(height_mm, dpi))
}

/// Convert a pixel size back to millimeters at `dpi`.
pub fn pixels_to_mm(width_px: i32, height_px: i32, dpi: f64) -> (f64, f64) {
    (px_to_mm(width_px, dpi), px_to_mm(height_px, dpi))
}

fn mm_to_px(mm: f64, dpi: f64) -> i32 {
    (mm / MM_PER_INCH * dpi).round() as i32
}

fn px_to_mm(px: i32, dpi: f64) -> f64 {
    px as f64 / dpi * MM_PER_INCH
}

/// Convert inches to (fractional) pixels.
pub fn inches_to_pixels(inches: f64, dpi: f64) -> f64 {
    inches * dpi
}

/// Convert pixels to inches.
pub fn pixels_to_inches(pixels: f64, dpi: f64) -> f64 {
    pixels / dpi
}

/// Convert millimeters to inches.
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Convert typographic points to pixels.
pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / POINTS_PER_INCH
}

/// Convert pixels to typographic points.
pub fn pixels_to_points(pixels: f64, dpi: f64) -> f64 {
    pixels * POINTS_PER_INCH / dpi
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Standard paper sizes known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    Letter,
    Legal,
    Tabloid,
}

impl PageSize {
    /// Every standard size, in table order.
    pub fn all() -> &'static [PageSize] {
        use PageSize::*;
        &[
            A0, A1, A2, A3, A4, A5, A6, B0, B1, B2, B3, B4, B5, B6, Letter, Legal, Tabloid,
        ]
    }

    /// Portrait dimensions in millimeters (width, height).
    pub fn portrait_mm(self) -> (f64, f64) {
        match self {
            PageSize::A0 => (841.0, 1189.0),
            PageSize::A1 => (594.0, 841.0),
            PageSize::A2 => (420.0, 594.0),
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::A6 => (105.0, 148.0),
            PageSize::B0 => (1000.0, 1414.0),
            PageSize::B1 => (707.0, 1000.0),
            PageSize::B2 => (500.0, 707.0),
            PageSize::B3 => (353.0, 500.0),
            PageSize::B4 => (250.0, 353.0),
            PageSize::B5 => (176.0, 250.0),
            PageSize::B6 => (125.0, 176.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Tabloid => (279.4, 431.8),
        }
    }

    /// Dimensions in millimeters for the given orientation.
    pub fn size_mm(self, orientation: Orientation) -> (f64, f64) {
        orient(self.portrait_mm(), orientation)
    }

    pub fn name(self) -> &'static str {
        match self {
            PageSize::A0 => "A0",
            PageSize::A1 => "A1",
            PageSize::A2 => "A2",
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::A6 => "A6",
            PageSize::B0 => "B0",
            PageSize::B1 => "B1",
            PageSize::B2 => "B2",
            PageSize::B3 => "B3",
            PageSize::B4 => "B4",
            PageSize::B5 => "B5",
            PageSize::B6 => "B6",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::Tabloid => "Tabloid",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        PageSize::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| LayoutError::UnknownPageSize(s.to_string()))
    }
}

/// Look up a standard page size by name, oriented as requested.
pub fn standard_page_size_mm(name: &str, orientation: Orientation) -> Result<(f64, f64)> {
    Ok(name.parse::<PageSize>()?.size_mm(orientation))
}

/// Swap width and height when the orientation disagrees with the shape.
pub(crate) fn orient((w, h): (f64, f64), orientation: Orientation) -> (f64, f64) {
    match orientation {
        Orientation::Landscape if w < h => (h, w),
        Orientation::Portrait if w > h => (h, w),
        _ => (w, h),
    }
}
