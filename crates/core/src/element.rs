//! Element records and the table that owns them.
//!
//! Records keep geometry relative to their parent's origin (or the surface
//! origin for top-level elements). Absolute bounds are derived by summing
//! ancestor origins.

use crate::geometry::Bounds;
use rustc_hash::FxHashMap;

/// Snapshot of a placed element, as handed out to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Caller-chosen id, unique within the engine.
    pub id: String,
    /// Parent element id, `None` for top-level elements.
    pub parent: Option<String>,
    /// Absolute pixel bounds on the surface.
    pub bounds: Bounds,
    /// Base font size in points, if the element carries text.
    pub font_pt: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ElementRecord {
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
    /// Bounds relative to the parent origin.
    pub(crate) local: Bounds,
    pub(crate) font_pt: Option<f64>,
}

impl ElementRecord {
    pub(crate) fn new(parent: Option<String>, local: Bounds) -> Self {
        Self {
            parent,
            children: Vec::new(),
            local,
            font_pt: None,
        }
    }
}

/// Arena of element records keyed by id, in insertion order.
#[derive(Debug, Default, Clone)]
pub(crate) struct ElementTable {
    records: FxHashMap<String, ElementRecord>,
    order: Vec<String>,
}

impl ElementTable {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&ElementRecord> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ElementRecord> {
        self.records.get_mut(id)
    }

    /// Ids in insertion order.
    pub(crate) fn ids(&self) -> &[String] {
        &self.order
    }

    /// Insert a record. The caller guarantees the id is free and the parent exists.
    pub(crate) fn insert(&mut self, id: String, record: ElementRecord) {
        if let Some(parent) = record.parent.as_deref() {
            if let Some(p) = self.records.get_mut(parent) {
                p.children.push(id.clone());
            }
        }
        self.order.push(id.clone());
        self.records.insert(id, record);
    }

    /// Remove an element and all of its descendants. Returns the removed ids,
    /// parent first.
    pub(crate) fn remove_subtree(&mut self, id: &str) -> Vec<String> {
        if !self.contains(id) {
            return Vec::new();
        }

        let removed = self.subtree(id);
        if let Some(parent) = self.records.get(id).and_then(|r| r.parent.clone()) {
            if let Some(p) = self.records.get_mut(&parent) {
                p.children.retain(|c| c != id);
            }
        }
        for gone in &removed {
            self.records.remove(gone);
        }
        self.order.retain(|o| self.records.contains_key(o));
        removed
    }

    /// `id` followed by all of its descendants, depth-first.
    pub(crate) fn subtree(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(next) = stack.pop() {
            if let Some(record) = self.records.get(&next) {
                stack.extend(record.children.iter().rev().cloned());
                out.push(next);
            }
        }
        out
    }

    /// Every id, depth-first from the roots; parents always precede children.
    pub(crate) fn depth_first(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        for root in self.order.iter().filter(|id| {
            self.records
                .get(id.as_str())
                .is_some_and(|r| r.parent.is_none())
        }) {
            out.extend(self.subtree(root));
        }
        out
    }

    /// Absolute origin of the element's parent, `(0, 0)` for top-level elements.
    #[cfg(test)]
    pub(crate) fn parent_origin(&self, id: &str) -> (i32, i32) {
        let mut origin = (0, 0);
        let mut current = self.records.get(id).and_then(|r| r.parent.as_deref());
        while let Some(parent) = current {
            match self.records.get(parent) {
                Some(record) => {
                    origin.0 += record.local.x;
                    origin.1 += record.local.y;
                    current = record.parent.as_deref();
                }
                None => break,
            }
        }
        origin
    }

    /// Absolute bounds, computed without the cache.
    #[cfg(test)]
    pub(crate) fn absolute(&self, id: &str) -> Option<Bounds> {
        let record = self.records.get(id)?;
        let (ox, oy) = self.parent_origin(id);
        Some(record.local.translate(ox, oy))
    }
}
