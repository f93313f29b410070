//! Layout engine orchestrating surfaces, element placement and DPI changes.
//!
//! This module provides the high-level API: register elements with a
//! placement request, move and resize them, align and distribute sets of
//! them, and react to DPI changes. All geometry mutation goes through
//! [`LayoutEngine`]; the host UI reads back resolved [`Bounds`] and applies
//! them to whatever widgets it owns.
//!
//! The engine is single-threaded by contract and is neither `Send`-shared
//! nor `Sync`.

use crate::cache::{CacheStats, GeometryCache};
use crate::config::{EngineConfig, GridSettings};
use crate::element::{Element, ElementRecord, ElementTable};
use crate::error::{LayoutError, Result};
use crate::geometry::{
    Alignment, Axis, Bounds, HorizontalAlign, PositionRequest, SizeRequest, VerticalAlign,
};
use crate::reconcile::DpiReconciler;
use crate::resolver::{self, PositioningResolver};
use crate::surface::SurfaceProfile;
use std::cell::RefCell;
use tracing::{debug, info};

/// Pending repaint regions kept before they are merged into one.
pub const MAX_DIRTY_REGIONS: usize = 64;

/// Owns a surface and the elements placed on it.
#[derive(Debug)]
pub struct LayoutEngine {
    /// Current design surface.
    surface: SurfaceProfile,
    /// Resolver holding this engine's private copy of the grid.
    resolver: PositioningResolver,
    /// Element records, parent-relative.
    elements: ElementTable,
    /// Absolute bounds memoized per element.
    cache: RefCell<GeometryCache>,
    /// Regions touched since the last drain.
    dirty: Vec<Bounds>,
}

impl LayoutEngine {
    /// Create an engine with the given configuration.
    pub fn new(surface: SurfaceProfile, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing layout engine on '{}' ({}x{} px @ {} dpi), grid {}x{} snap={}",
            surface.name(),
            surface.width(),
            surface.height(),
            surface.dpi(),
            config.grid.cell_width,
            config.grid.cell_height,
            config.grid.snap_enabled
        );

        Ok(Self {
            surface,
            resolver: PositioningResolver::new(config.grid),
            elements: ElementTable::default(),
            cache: RefCell::new(GeometryCache::default()),
            dirty: Vec::new(),
        })
    }

    /// Create an engine using a copy of the process-wide default grid.
    pub fn with_surface(surface: SurfaceProfile) -> Self {
        Self {
            surface,
            resolver: PositioningResolver::new(GridSettings::global_default()),
            elements: ElementTable::default(),
            cache: RefCell::new(GeometryCache::default()),
            dirty: Vec::new(),
        }
    }

    pub fn surface(&self) -> &SurfaceProfile {
        &self.surface
    }

    pub fn grid(&self) -> GridSettings {
        self.resolver.grid()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    /// Element ids in registration order.
    pub fn element_ids(&self) -> &[String] {
        self.elements.ids()
    }

    /// Direct children of an element.
    pub fn children(&self, id: &str) -> Result<Vec<String>> {
        self.elements
            .get(id)
            .map(|r| r.children.clone())
            .ok_or_else(|| LayoutError::UnknownElement(id.to_string()))
    }

    /// Snapshot of an element, `None` if it is not registered.
    pub fn element(&self, id: &str) -> Option<Element> {
        let record = self.elements.get(id)?;
        Some(Element {
            id: id.to_string(),
            parent: record.parent.clone(),
            bounds: self.absolute_bounds(id)?,
            font_pt: record.font_pt,
        })
    }

    /// Register a top-level element placed against the surface.
    pub fn add_element(
        &mut self,
        id: impl Into<String>,
        position: PositionRequest,
        size: SizeRequest,
    ) -> Result<Element> {
        self.insert(id.into(), None, position, size)
    }

    /// Register an element inside `parent`.
    ///
    /// Relative requests use the parent's extent, absolute and grid requests
    /// are offsets from the parent's origin.
    pub fn add_child_element(
        &mut self,
        parent: &str,
        id: impl Into<String>,
        position: PositionRequest,
        size: SizeRequest,
    ) -> Result<Element> {
        if !self.elements.contains(parent) {
            return Err(LayoutError::UnknownParent(parent.to_string()));
        }
        self.insert(id.into(), Some(parent.to_string()), position, size)
    }

    fn insert(
        &mut self,
        id: String,
        parent: Option<String>,
        position: PositionRequest,
        size: SizeRequest,
    ) -> Result<Element> {
        if self.elements.contains(&id) {
            return Err(LayoutError::DuplicateId(id));
        }

        let extent = self.reference_extent(parent.as_deref());
        let local = self.resolver.resolve(position, size, extent);
        self.elements.insert(id.clone(), ElementRecord::new(parent, local));

        let bounds = self.get_bounds(&id)?;
        self.mark_dirty(bounds);
        debug!("Added element '{}' at {:?}", id, bounds);

        self.element(&id)
            .ok_or(LayoutError::UnknownElement(id))
    }

    /// Remove an element and everything nested in it.
    ///
    /// Returns false if the id is not registered.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let Some(root) = self.absolute_bounds(id) else {
            return false;
        };
        let covered = self
            .elements
            .subtree(id)
            .iter()
            .filter_map(|i| self.absolute_bounds(i))
            .fold(root, |acc, b| acc.union(&b));

        let removed = self.elements.remove_subtree(id);
        self.cache.get_mut().invalidate(&removed);
        self.mark_dirty(covered);
        debug!("Removed element '{}' ({} elements total)", id, removed.len());
        true
    }

    /// Move an element. Returns its new absolute bounds.
    pub fn reposition(&mut self, id: &str, position: PositionRequest) -> Result<Bounds> {
        let record = self.record(id)?;
        let extent = self.reference_extent(record.parent.as_deref());
        let (x, y) = self.resolver.resolve_position_in(position, extent);
        let local = record.local.with_origin(x, y);
        self.update_local(id, local)
    }

    /// Resize an element, keeping its origin. Returns its new absolute bounds.
    pub fn resize_element(&mut self, id: &str, size: SizeRequest) -> Result<Bounds> {
        let record = self.record(id)?;
        let extent = self.reference_extent(record.parent.as_deref());
        let (width, height) = self.resolver.resolve_size_in(size, extent);
        let local = Bounds {
            width,
            height,
            ..record.local
        };
        self.update_local(id, local)
    }

    /// Set or clear the base font size of an element.
    pub fn set_font_size(&mut self, id: &str, font_pt: Option<f64>) -> Result<()> {
        let record = self
            .elements
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownElement(id.to_string()))?;
        record.font_pt = font_pt;
        Ok(())
    }

    /// Absolute bounds of an element.
    pub fn get_bounds(&self, id: &str) -> Result<Bounds> {
        self.absolute_bounds(id)
            .ok_or_else(|| LayoutError::UnknownElement(id.to_string()))
    }

    /// Align each element to its container: the surface for top-level
    /// elements, the parent for nested ones.
    pub fn align<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        alignment: Alignment,
        margin: i32,
    ) -> Result<Vec<Bounds>> {
        self.align_each(ids, |bounds, container| {
            resolver::align(&[bounds], alignment, container, margin)[0]
        })
    }

    /// Align the x axis only.
    pub fn align_horizontal<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        alignment: HorizontalAlign,
        margin: i32,
    ) -> Result<Vec<Bounds>> {
        self.align_each(ids, |bounds, container| {
            resolver::align_horizontal(&[bounds], alignment, container, margin)[0]
        })
    }

    /// Align the y axis only.
    pub fn align_vertical<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        alignment: VerticalAlign,
        margin: i32,
    ) -> Result<Vec<Bounds>> {
        self.align_each(ids, |bounds, container| {
            resolver::align_vertical(&[bounds], alignment, container, margin)[0]
        })
    }

    fn align_each<S, F>(&mut self, ids: &[S], place: F) -> Result<Vec<Bounds>>
    where
        S: AsRef<str>,
        F: Fn(Bounds, Bounds) -> Bounds,
    {
        let current = self.bounds_of(ids)?;
        let mut targets = Vec::with_capacity(current.len());
        for (id, bounds) in ids.iter().zip(current) {
            let container = self.container_of(id.as_ref())?;
            targets.push(place(bounds, container));
        }
        self.apply_origins(ids, &targets)
    }

    /// Align every element to the first one in `ids`.
    pub fn align_to_reference<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        alignment: Alignment,
    ) -> Result<Vec<Bounds>> {
        let current = self.bounds_of(ids)?;
        let targets = resolver::align_to_reference(&current, alignment);
        self.apply_origins(ids, &targets)
    }

    /// Spread elements evenly between `start` and `end` (absolute pixels).
    pub fn distribute<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        axis: Axis,
        start: i32,
        end: i32,
    ) -> Result<Vec<Bounds>> {
        let current = self.bounds_of(ids)?;
        if current.len() < 2 {
            return Ok(current);
        }
        let targets = resolver::distribute(&current, axis, start, end);
        self.apply_origins(ids, &targets)
    }

    /// React to a DPI change: resize the surface and rescale every element.
    pub fn on_dpi_changed(&mut self, new_dpi: f64) -> Result<()> {
        let old_dpi = self.surface.dpi();
        let surface = self.surface.resize(new_dpi)?;
        let reconciler = DpiReconciler::new(old_dpi, new_dpi)?;
        if reconciler.is_identity() {
            return Ok(());
        }

        let old_extent = self.surface.bounds();
        let touched = reconciler.rescale(&mut self.elements);
        self.cache.get_mut().invalidate(&touched);
        self.surface = surface;
        self.mark_dirty(old_extent.union(&self.surface.bounds()));

        info!(
            "DPI changed {} -> {}, surface now {}x{} px, {} elements rescaled",
            old_dpi,
            new_dpi,
            self.surface.width(),
            self.surface.height(),
            touched.len()
        );
        Ok(())
    }

    /// Drain the regions that need repainting since the last call.
    pub fn take_dirty_regions(&mut self) -> Vec<Bounds> {
        std::mem::take(&mut self.dirty)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }

    /// Set an element's absolute bounds, converting to parent-relative.
    pub(crate) fn set_absolute_bounds(&mut self, id: &str, bounds: Bounds) -> Result<Bounds> {
        let record = self.record(id)?;
        let (ox, oy) = self.parent_origin(record.parent.as_deref())?;
        self.update_local(id, bounds.translate(ox.saturating_neg(), oy.saturating_neg()))
    }

    pub(crate) fn font_size(&self, id: &str) -> Option<f64> {
        self.elements.get(id).and_then(|r| r.font_pt)
    }

    /// Ids ordered so that parents precede their children.
    pub(crate) fn ids_depth_first(&self) -> Vec<String> {
        self.elements.depth_first()
    }

    fn record(&self, id: &str) -> Result<ElementRecord> {
        self.elements
            .get(id)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownElement(id.to_string()))
    }

    fn reference_extent(&self, parent: Option<&str>) -> (u32, u32) {
        parent
            .and_then(|p| self.elements.get(p))
            .map(|r| (r.local.width, r.local.height))
            .unwrap_or_else(|| self.surface.pixel_extent())
    }

    fn container_of(&self, id: &str) -> Result<Bounds> {
        match self.record(id)?.parent {
            Some(parent) => self.get_bounds(&parent),
            None => Ok(self.surface.bounds()),
        }
    }

    fn parent_origin(&self, parent: Option<&str>) -> Result<(i32, i32)> {
        match parent {
            Some(p) => self.get_bounds(p).map(|b| (b.x, b.y)),
            None => Ok((0, 0)),
        }
    }

    fn bounds_of<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Bounds>> {
        ids.iter().map(|id| self.get_bounds(id.as_ref())).collect()
    }

    fn apply_origins<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        targets: &[Bounds],
    ) -> Result<Vec<Bounds>> {
        let mut out = Vec::with_capacity(targets.len());
        for (id, target) in ids.iter().zip(targets) {
            out.push(self.set_absolute_bounds(id.as_ref(), *target)?);
        }
        Ok(out)
    }

    fn absolute_bounds(&self, id: &str) -> Option<Bounds> {
        let record = self.elements.get(id)?;
        let cached = self.cache.borrow_mut().get(id);
        if let Some(bounds) = cached {
            return Some(bounds);
        }

        let bounds = match record.parent.as_deref() {
            Some(parent) => {
                let origin = self.absolute_bounds(parent)?;
                record.local.translate(origin.x, origin.y)
            }
            None => record.local,
        };
        self.cache.borrow_mut().insert(id, bounds);
        Some(bounds)
    }

    /// Record a repaint region. Past [`MAX_DIRTY_REGIONS`] pending regions the
    /// list collapses into one covering rectangle.
    fn mark_dirty(&mut self, bounds: Bounds) {
        if self.dirty.len() >= MAX_DIRTY_REGIONS {
            let merged = self
                .dirty
                .drain(..)
                .fold(bounds, |acc, b| acc.union(&b));
            self.dirty.push(merged);
        } else {
            self.dirty.push(bounds);
        }
    }

    /// Replace an element's local bounds, invalidating it and its descendants.
    fn update_local(&mut self, id: &str, local: Bounds) -> Result<Bounds> {
        let subtree = self.elements.subtree(id);
        let before: Vec<Bounds> = subtree
            .iter()
            .filter_map(|i| self.absolute_bounds(i))
            .collect();

        let record = self
            .elements
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownElement(id.to_string()))?;
        if record.local == local {
            return self.get_bounds(id);
        }
        record.local = local;
        self.cache.get_mut().invalidate(&subtree);

        for (i, old) in subtree.iter().zip(before) {
            if let Some(new) = self.absolute_bounds(i) {
                self.mark_dirty(old.union(&new));
            }
        }
        self.get_bounds(id)
    }
}
