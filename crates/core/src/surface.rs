//! Virtual design surfaces, optionally simulating a physical page.

use crate::error::{LayoutError, Result};
use crate::geometry::Bounds;
use crate::units::{self, Orientation, PageSize};
use serde::{Deserialize, Serialize};

/// Physical page specification for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageSpec {
    /// A size from the standard table.
    Standard(PageSize),
    /// Custom width and height in millimeters.
    Custom { width_mm: f64, height_mm: f64 },
}

impl From<PageSize> for PageSpec {
    fn from(page: PageSize) -> Self {
        PageSpec::Standard(page)
    }
}

impl PageSpec {
    /// Parse a standard size by name.
    pub fn named(name: &str) -> Result<Self> {
        Ok(PageSpec::Standard(name.parse()?))
    }

    fn size_mm(&self, orientation: Orientation) -> Result<(f64, f64)> {
        match *self {
            PageSpec::Standard(page) => Ok(page.size_mm(orientation)),
            PageSpec::Custom {
                width_mm,
                height_mm,
            } => {
                let valid = width_mm > 0.0
                    && height_mm > 0.0
                    && width_mm.is_finite()
                    && height_mm.is_finite();
                if !valid {
                    return Err(LayoutError::InvalidPageSize {
                        width_mm,
                        height_mm,
                    });
                }
                Ok(units::orient((width_mm, height_mm), orientation))
            }
        }
    }

    fn default_name(&self) -> String {
        match self {
            PageSpec::Standard(page) => page.name().to_string(),
            PageSpec::Custom { .. } => "Custom".to_string(),
        }
    }
}

/// A design surface: physical size (if any), DPI and the pixel extent they imply.
///
/// Pixel dimensions are always derived from the physical size and DPI when a
/// physical size is present, never stored independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProfile {
    name: String,
    page: Option<PageSpec>,
    size_mm: Option<(f64, f64)>,
    width_px: u32,
    height_px: u32,
    dpi: f64,
    orientation: Orientation,
}

fn validate_dpi(dpi: f64) -> Result<()> {
    if dpi > 0.0 && dpi.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidDpi(dpi))
    }
}

fn checked_extent(width: i64, height: i64) -> Result<(u32, u32)> {
    if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
        return Err(LayoutError::EmptySurface {
            width: width.clamp(0, u32::MAX as i64) as u32,
            height: height.clamp(0, u32::MAX as i64) as u32,
        });
    }
    Ok((width as u32, height as u32))
}

impl SurfaceProfile {
    /// Create a surface simulating a physical page.
    pub fn create(page: impl Into<PageSpec>, orientation: Orientation, dpi: f64) -> Result<Self> {
        validate_dpi(dpi)?;
        let page = page.into();
        let (width_mm, height_mm) = page.size_mm(orientation)?;
        let (w, h) = units::mm_to_pixels(width_mm, height_mm, dpi);
        let (width_px, height_px) = checked_extent(w as i64, h as i64)?;

        Ok(Self {
            name: page.default_name(),
            page: Some(page),
            size_mm: Some((width_mm, height_mm)),
            width_px,
            height_px,
            dpi,
            orientation,
        })
    }

    /// Create a purely pixel-defined surface with no physical size.
    pub fn from_pixels(width: u32, height: u32, dpi: f64) -> Result<Self> {
        validate_dpi(dpi)?;
        let (width_px, height_px) = checked_extent(width as i64, height as i64)?;
        let orientation = if width_px > height_px {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };

        Ok(Self {
            name: "Pixels".to_string(),
            page: None,
            size_mm: None,
            width_px,
            height_px,
            dpi,
            orientation,
        })
    }

    /// Set the surface identity recorded in saved layouts.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A copy of this surface at a new DPI.
    ///
    /// Physical size is kept and the pixel extent recomputed. Pixel-defined
    /// surfaces scale their extent by the DPI ratio.
    pub fn resize(&self, new_dpi: f64) -> Result<Self> {
        validate_dpi(new_dpi)?;
        let (width_px, height_px) = match self.size_mm {
            Some((width_mm, height_mm)) => {
                let (w, h) = units::mm_to_pixels(width_mm, height_mm, new_dpi);
                checked_extent(w as i64, h as i64)?
            }
            None => {
                let factor = new_dpi / self.dpi;
                checked_extent(
                    (self.width_px as f64 * factor).round() as i64,
                    (self.height_px as f64 * factor).round() as i64,
                )?
            }
        };

        Ok(Self {
            width_px,
            height_px,
            dpi: new_dpi,
            ..self.clone()
        })
    }

    /// Pixel extent `(width, height)`.
    pub fn pixel_extent(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    pub fn width(&self) -> u32 {
        self.width_px
    }

    pub fn height(&self) -> u32 {
        self.height_px
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> Option<PageSpec> {
        self.page
    }

    /// Physical size in millimeters, `None` for pixel-defined surfaces.
    pub fn physical_size_mm(&self) -> Option<(f64, f64)> {
        self.size_mm
    }

    /// The full surface as a rectangle at the origin.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0, 0, self.width_px, self.height_px)
    }
}
