//! Rescaling of resolved geometry after a DPI change.
//!
//! Position, size and font metric are scaled jointly by `new_dpi / old_dpi`.
//! Nested elements are processed parents first; a child's absolute origin is
//! scaled (not its parent-relative offset), so rounding error does not
//! compound down the tree.

use crate::element::ElementTable;
use crate::error::{LayoutError, Result};
use crate::geometry::Bounds;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Rescales element geometry from one DPI to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiReconciler {
    old_dpi: f64,
    new_dpi: f64,
}

impl DpiReconciler {
    pub fn new(old_dpi: f64, new_dpi: f64) -> Result<Self> {
        for dpi in [old_dpi, new_dpi] {
            if !(dpi > 0.0 && dpi.is_finite()) {
                return Err(LayoutError::InvalidDpi(dpi));
            }
        }
        Ok(Self { old_dpi, new_dpi })
    }

    /// `new_dpi / old_dpi`.
    pub fn factor(&self) -> f64 {
        self.new_dpi / self.old_dpi
    }

    pub fn is_identity(&self) -> bool {
        self.old_dpi == self.new_dpi
    }

    fn scale(&self, v: f64) -> f64 {
        (v * self.factor()).round()
    }

    /// Scale a standalone rectangle.
    pub fn rescale_bounds(&self, bounds: Bounds) -> Bounds {
        if self.is_identity() {
            return bounds;
        }
        Bounds::new(
            self.scale(bounds.x as f64) as i32,
            self.scale(bounds.y as f64) as i32,
            self.scale(bounds.width as f64) as u32,
            self.scale(bounds.height as f64) as u32,
        )
    }

    /// Scale a font size in points.
    pub fn rescale_font(&self, font_pt: f64) -> f64 {
        if self.is_identity() {
            return font_pt;
        }
        font_pt * self.factor()
    }

    /// Rescale every element in the table in place. Returns the ids touched,
    /// in processing order.
    pub(crate) fn rescale(&self, table: &mut ElementTable) -> Vec<String> {
        if self.is_identity() {
            return Vec::new();
        }

        let order = table.depth_first();
        // id -> (old absolute origin, new absolute origin)
        let mut origins: FxHashMap<String, ((i32, i32), (i32, i32))> = FxHashMap::default();

        for id in &order {
            let Some(record) = table.get(id) else {
                continue;
            };
            let (parent_old, parent_new) = record
                .parent
                .as_deref()
                .and_then(|p| origins.get(p).copied())
                .unwrap_or(((0, 0), (0, 0)));

            let old_abs = (
                parent_old.0.saturating_add(record.local.x),
                parent_old.1.saturating_add(record.local.y),
            );
            let new_abs = (
                self.scale(old_abs.0 as f64) as i32,
                self.scale(old_abs.1 as f64) as i32,
            );
            let local = Bounds::new(
                new_abs.0.saturating_sub(parent_new.0),
                new_abs.1.saturating_sub(parent_new.1),
                self.scale(record.local.width as f64) as u32,
                self.scale(record.local.height as f64) as u32,
            );
            let font_pt = record.font_pt.map(|pt| self.rescale_font(pt));

            if let Some(record) = table.get_mut(id) {
                record.local = local;
                record.font_pt = font_pt;
            }
            origins.insert(id.clone(), (old_abs, new_abs));
        }

        debug!(
            "Rescaled {} elements from {} to {} DPI (factor {:.4})",
            order.len(),
            self.old_dpi,
            self.new_dpi,
            self.factor()
        );
        order
    }
}
