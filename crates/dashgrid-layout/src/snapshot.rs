#![forbid(unsafe_code)]

//! Layout snapshots: the serializable, ordered view of a grid's widgets.
//!
//! A [`Layout`] is derived state. The grid recomputes it after every
//! mutation and hands clones out through [`Grid::layout`] and the
//! layout-changed signal, so two calls with no mutation in between are
//! structurally identical.
//!
//! Reload via [`Grid::load_layout`] is best-effort, not atomic: each entry
//! resolves a factory by kind tag, and entries whose factory is missing or
//! fails are logged, skipped, and reported while the rest load. Snapshot
//! positions and sizes are applied verbatim with no collision
//! re-validation: a layout that was valid when saved is trusted on
//! reload, even if the grid has since shrunk.
//!
//! [`Grid::layout`]: crate::grid::Grid::layout
//! [`Grid::load_layout`]: crate::grid::Grid::load_layout

use dashgrid_core::{Cell, CellSize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::registry::{RegistryError, WidgetRegistry};
use crate::widget::{Widget, WidgetId};

/// One widget in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub id: WidgetId,
    /// Widget kind tag, resolved through the registry on reload.
    pub kind: String,
    pub title: String,
    pub position: Cell,
    pub size: CellSize,
}

/// An ordered, read-only snapshot of every widget on a grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
}

impl Layout {
    /// Build a snapshot from owned widgets, preserving insertion order.
    ///
    /// Widgets without an id are skipped; the grid never owns such a
    /// widget, so this only matters for hand-built layouts in tests.
    #[must_use]
    pub(crate) fn capture(widgets: &[Widget]) -> Self {
        let entries = widgets
            .iter()
            .filter_map(|w| {
                w.id.map(|id| LayoutEntry {
                    id,
                    kind: w.kind.as_tag().to_string(),
                    title: w.title.clone(),
                    position: w.position,
                    size: w.size,
                })
            })
            .collect();
        Self { entries }
    }

    /// Build a layout directly from entries, e.g. deserialized state.
    #[must_use]
    pub fn from_entries(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    /// The entries, in grid insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the snapshot holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, LayoutEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutEntry;
    type IntoIter = std::slice::Iter<'a, LayoutEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A snapshot entry that `load_layout` could not restore.
#[derive(Debug)]
pub struct SkippedEntry {
    /// Index of the entry within the loaded layout.
    pub index: usize,
    /// The kind tag that failed to resolve or build.
    pub kind: String,
    pub error: RegistryError,
}

/// Outcome of a best-effort [`Grid::load_layout`] call.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of widgets restored.
    pub loaded: usize,
    /// Entries that were skipped, in layout order.
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    /// True if every entry was restored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl Grid {
    /// The current layout snapshot.
    ///
    /// The snapshot is recomputed on mutation and cached, so repeated
    /// calls without intervening mutation return structurally identical
    /// values.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.snapshot.clone()
    }

    /// Replace all widgets with the contents of `layout`.
    ///
    /// Each entry resolves a widget through `registry` by kind tag; its
    /// snapshot id, position, and size are then applied verbatim (no
    /// collision re-validation; the snapshot is trusted). Entries whose
    /// factory is missing or fails are logged and skipped; the rest load.
    /// The id counter advances past the largest loaded id, and the usual
    /// auto-resize pass and layout-changed notification run once at the
    /// end.
    pub fn load_layout(&mut self, layout: &Layout, registry: &WidgetRegistry) -> LoadReport {
        let mut report = LoadReport::default();
        self.widgets.clear();

        for (index, entry) in layout.iter().enumerate() {
            match registry.create(entry) {
                Ok(mut widget) => {
                    widget.id = Some(entry.id);
                    widget.position = entry.position;
                    widget.size = entry.size;
                    self.next_id = self.next_id.max(entry.id.0 + 1);
                    self.widgets.push(widget);
                    report.loaded += 1;
                }
                Err(error) => {
                    warn!(
                        index,
                        kind = %entry.kind,
                        %error,
                        "skipping unloadable layout entry"
                    );
                    report.skipped.push(SkippedEntry {
                        index,
                        kind: entry.kind.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "layout loaded"
        );
        self.after_mutation();
        report
    }
}
