//! Resolution-independent persistence of element geometry.
//!
//! A [`LayoutDocument`] records every element's bounds as fractions of the
//! surface pixel extent at save time. Loading replays those fractions against
//! the engine's *current* surface, so a layout saved on one page size or DPI
//! reproduces the same proportions on another.
//!
//! Documents are JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "surfaceName": "A4",
//!   "savedAt": "2024-05-01T12:00:00Z",
//!   "baselineFontPt": 12.0,
//!   "elements": [
//!     { "id": "btn1", "left": 0.5, "top": 0.4995, "width": 0.1259, "height": 0.0267, "fontScale": 1.0 }
//!   ]
//! }
//! ```

use crate::engine::LayoutEngine;
use crate::error::{LayoutError, Result};
use crate::geometry::Bounds;
use crate::resolver::{clamp_i32, clamp_size, fraction_to_pixels};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Font size in points that maps to a `fontScale` of 1.0.
pub const BASELINE_FONT_PT: f64 = 12.0;

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

fn default_baseline() -> f64 {
    BASELINE_FONT_PT
}

fn default_font_scale() -> f64 {
    1.0
}

/// Reads `null` as the baseline scale.
fn nullable_font_scale<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_font_scale))
}

/// One element's geometry as fractions of the surface extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLayout {
    pub id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Font size divided by the baseline. Elements without a font are
    /// written at the baseline (1.0).
    #[serde(default = "default_font_scale", deserialize_with = "nullable_font_scale")]
    pub font_scale: f64,
}

/// Persisted, surface-independent layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub surface_name: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default = "default_baseline")]
    pub baseline_font_pt: f64,
    pub elements: Vec<ElementLayout>,
}

impl LayoutDocument {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Serialization(e.to_string()))
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LayoutError::ParseError {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    pub fn element(&self, id: &str) -> Option<&ElementLayout> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Outcome of applying a document to an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Element ids whose geometry was restored.
    pub applied: Vec<String>,
    /// Document ids with no matching element in the engine.
    pub skipped: Vec<String>,
}

fn fraction(value: f64, extent: u32) -> f64 {
    value / extent as f64
}

/// Derive a document from the engine's current bounds and surface.
pub fn capture(engine: &LayoutEngine) -> Result<LayoutDocument> {
    let (width, height) = engine.surface().pixel_extent();
    let mut elements = Vec::with_capacity(engine.len());

    for id in engine.element_ids() {
        let bounds = engine.get_bounds(id)?;
        elements.push(ElementLayout {
            id: id.clone(),
            left: fraction(bounds.x as f64, width),
            top: fraction(bounds.y as f64, height),
            width: fraction(bounds.width as f64, width),
            height: fraction(bounds.height as f64, height),
            font_scale: engine
                .font_size(id)
                .map_or_else(default_font_scale, |pt| pt / BASELINE_FONT_PT),
        });
    }

    Ok(LayoutDocument {
        version: DOCUMENT_VERSION,
        surface_name: engine.surface().name().to_string(),
        saved_at: Utc::now(),
        baseline_font_pt: BASELINE_FONT_PT,
        elements,
    })
}

/// Replay a document onto the engine's current surface.
///
/// Unknown ids are skipped. Bounds are computed for every matching element
/// before any is written. Fractions outside `[0, 1]` are honored but saturate
/// at the pixel range. `fontScale` rescales elements that carry a font and is
/// ignored for the rest.
pub fn apply(engine: &mut LayoutEngine, document: &LayoutDocument) -> Result<LoadReport> {
    let (width, height) = engine.surface().pixel_extent();
    let mut report = LoadReport::default();
    let mut resolved: Vec<(String, Bounds, Option<f64>)> = Vec::new();

    // Parents before children, so each child converts against its parent's new origin.
    for id in engine.ids_depth_first() {
        if let Some(layout) = document.element(&id) {
            let bounds = Bounds::new(
                clamp_i32(fraction_to_pixels(layout.left, width)),
                clamp_i32(fraction_to_pixels(layout.top, height)),
                clamp_size(fraction_to_pixels(layout.width, width)),
                clamp_size(fraction_to_pixels(layout.height, height)),
            );
            let font_pt = engine
                .font_size(&id)
                .map(|_| layout.font_scale * document.baseline_font_pt);
            resolved.push((id, bounds, font_pt));
        }
    }

    for layout in &document.elements {
        if !engine.contains(&layout.id) {
            debug!("Skipping unknown element '{}' in layout document", layout.id);
            report.skipped.push(layout.id.clone());
        }
    }

    for (id, bounds, font_pt) in resolved {
        engine.set_absolute_bounds(&id, bounds)?;
        if font_pt.is_some() {
            engine.set_font_size(&id, font_pt)?;
        }
        report.applied.push(id);
    }

    Ok(report)
}

/// Write the engine's layout to `path` as JSON.
pub fn save(engine: &LayoutEngine, path: impl AsRef<Path>) -> Result<LayoutDocument> {
    let path = path.as_ref();
    let document = capture(engine)?;
    std::fs::write(path, document.to_json()?)?;

    info!(
        "Saved layout of {} elements on '{}' to {:?}",
        document.elements.len(),
        document.surface_name,
        path
    );
    Ok(document)
}

/// Read a layout document from `path` and apply it to the engine.
///
/// A missing or malformed file leaves the engine untouched.
pub fn load(engine: &mut LayoutEngine, path: impl AsRef<Path>) -> Result<LoadReport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LayoutError::FileNotFound(path.to_path_buf()),
        _ => LayoutError::Io(e),
    })?;

    let document: LayoutDocument =
        serde_json::from_str(&json).map_err(|e| LayoutError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if document.version > DOCUMENT_VERSION {
        warn!(
            "Layout document {:?} has version {}, newer than supported {}",
            path, document.version, DOCUMENT_VERSION
        );
    }

    let report = apply(engine, &document)?;
    info!(
        "Loaded layout from {:?}: {} applied, {} skipped",
        path,
        report.applied.len(),
        report.skipped.len()
    );
    Ok(report)
}
