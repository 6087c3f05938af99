#![forbid(unsafe_code)]

//! The grid layout engine: widget lifecycle, collision-aware placement,
//! and the auto-resize policy.
//!
//! # Design
//!
//! A [`Grid`] owns a set of [`Widget`]s placed on an integer cell space.
//! Every mutating call runs to completion synchronously: apply the change,
//! run the auto-resize pass, rebuild the cached layout snapshot, notify
//! subscribers. There is no queued or batched update phase.
//!
//! # Invariants
//!
//! 1. Owned widgets always have an id; ids are unique within the grid.
//! 2. Owned widget positions are non-negative (clamped on entry, except
//!    for snapshot loads which are applied verbatim).
//! 3. With overlap disallowed, any position accepted by
//!    [`Grid::is_valid_position`] keeps all footprints disjoint.
//! 4. `grid-resized` fires only when a dimension actually changes;
//!    `layout-changed` fires after every mutation.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Zero dimension | `Grid::new(0, _, ..)` | `GridError::InvalidDimensions` |
//! | Unknown id | move/resize/remove with stale id | Silent no-op |
//! | No free slot | auto-placement on a full grid | Fallback to `(0, 0)` with a `warn!`; the add still succeeds |

use dashgrid_core::{Cell, CellRect, CellSize, Signal, Subscription};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::snapshot::Layout;
use crate::widget::{Widget, WidgetId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from grid construction and dimension changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height was zero.
    InvalidDimensions { width: u32, height: u32 },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions must be non-zero, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How logical cells map to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CellSizing {
    /// Every cell is a fixed pixel rectangle.
    Fixed { width_px: f32, height_px: f32 },
    /// Cells share the viewport proportionally.
    Proportional,
}

impl Default for CellSizing {
    fn default() -> Self {
        Self::Proportional
    }
}

/// Grid construction options.
///
/// Builder-style setters:
///
/// ```
/// use dashgrid_layout::grid::GridOptions;
///
/// let opts = GridOptions::new()
///     .allow_overlap(false)
///     .auto_resize_height(true)
///     .gap_px(4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Permit widget footprints to intersect. Default `false`.
    pub allow_overlap: bool,
    /// Let the width grow/shrink to fit widgets. Default `false`.
    pub auto_resize_width: bool,
    /// Let the height grow/shrink to fit widgets. Default `true`.
    pub auto_resize_height: bool,
    /// Shrink enabled axes below the initial dimension, down to 1.
    /// Default `false`.
    pub auto_shrink: bool,
    /// Pixel sizing mode for cells. Default proportional.
    pub cell_sizing: CellSizing,
    /// Gap between cells, in pixels. Default `0.0`.
    pub gap_px: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            allow_overlap: false,
            auto_resize_width: false,
            auto_resize_height: true,
            auto_shrink: false,
            cell_sizing: CellSizing::default(),
            gap_px: 0.0,
        }
    }
}

impl GridOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit widget footprints to intersect.
    #[must_use]
    pub fn allow_overlap(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    /// Let the width follow widget footprints.
    #[must_use]
    pub fn auto_resize_width(mut self, enabled: bool) -> Self {
        self.auto_resize_width = enabled;
        self
    }

    /// Let the height follow widget footprints.
    #[must_use]
    pub fn auto_resize_height(mut self, enabled: bool) -> Self {
        self.auto_resize_height = enabled;
        self
    }

    /// Allow shrinking below the initial dimensions, down to 1.
    #[must_use]
    pub fn auto_shrink(mut self, enabled: bool) -> Self {
        self.auto_shrink = enabled;
        self
    }

    /// Set the pixel sizing mode.
    #[must_use]
    pub fn cell_sizing(mut self, sizing: CellSizing) -> Self {
        self.cell_sizing = sizing;
        self
    }

    /// Set the inter-cell gap in pixels.
    #[must_use]
    pub fn gap_px(mut self, gap: f32) -> Self {
        self.gap_px = gap;
        self
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Payload for the layout-changed signal: the fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutChanged {
    pub layout: Layout,
}

/// Payload for the grid-resized signal: the new dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResized {
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Pixel metrics
// ---------------------------------------------------------------------------

/// Resolved pixel extent of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPx {
    pub width: f32,
    pub height: f32,
}

/// A widget footprint mapped to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A logical 2D cell space owning zero or more widgets.
#[derive(Debug)]
pub struct Grid {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Shrink floor for auto-resize when auto-shrink is off.
    pub(crate) initial_width: u32,
    pub(crate) initial_height: u32,
    pub(crate) options: GridOptions,
    /// Insertion-ordered; order is the snapshot order.
    pub(crate) widgets: Vec<Widget>,
    pub(crate) next_id: u64,
    pub(crate) snapshot: Layout,
    layout_changed: Signal<LayoutChanged>,
    grid_resized: Signal<GridResized>,
}

impl Grid {
    /// Create a grid of `width` × `height` cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is
    /// zero. This is the only fatal configuration error; everything after
    /// construction degrades rather than fails.
    pub fn new(width: u32, height: u32, options: GridOptions) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            initial_width: width,
            initial_height: height,
            options,
            widgets: Vec::new(),
            next_id: 1,
            snapshot: Layout::default(),
            layout_changed: Signal::new(),
            grid_resized: Signal::new(),
        })
    }

    /// Current dimensions in cells, `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Construction options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Explicitly set the grid dimensions.
    ///
    /// This also re-bases the auto-resize shrink floor, so a later
    /// auto-resize pass does not immediately undo the call. Emits
    /// `grid-resized` if a dimension actually changes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is
    /// zero.
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        self.initial_width = width;
        self.initial_height = height;
        let changed = width != self.width || height != self.height;
        self.width = width;
        self.height = height;
        if changed {
            debug!(width, height, "grid dimensions set");
            self.grid_resized.emit(&GridResized { width, height });
        }
        Ok(())
    }

    /// The widget with the given id, if owned by this grid.
    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == Some(id))
    }

    /// All owned widgets in insertion order.
    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Number of owned widgets.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    // -- subscriptions ------------------------------------------------------

    /// Subscribe to layout changes. Fired after every mutation with the
    /// fresh snapshot.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn on_layout_changed(
        &self,
        callback: impl Fn(&LayoutChanged) + 'static,
    ) -> Subscription {
        self.layout_changed.subscribe(callback)
    }

    /// Subscribe to dimension changes. Fired only when auto-resize or
    /// [`Grid::set_dimensions`] actually changes a dimension.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn on_grid_resized(&self, callback: impl Fn(&GridResized) + 'static) -> Subscription {
        self.grid_resized.subscribe(callback)
    }

    // -- widget lifecycle ---------------------------------------------------

    /// Add a widget, taking ownership.
    ///
    /// Assigns an id if the widget has none. With no explicit position the
    /// placement search runs; if it finds no free slot the widget is placed
    /// at the `(0, 0)` fallback (which may overlap) and a warning is
    /// logged. The add itself always succeeds.
    pub fn add_widget(&mut self, mut widget: Widget, position: Option<Cell>) -> WidgetId {
        let id = self.claim_id(widget.id);
        widget.id = Some(id);

        let pos = match position {
            Some(p) => p,
            None => match self.find_available_position(widget.size) {
                Some(p) => p,
                None => {
                    warn!(
                        id = %id,
                        size = %widget.size,
                        "no free slot for widget, placing at origin (may overlap)"
                    );
                    Cell::origin()
                }
            },
        };
        widget.position = clamp_non_negative(pos);

        debug!(id = %id, kind = %widget.kind, pos = %widget.position, "widget added");
        self.widgets.push(widget);
        self.after_mutation();
        id
    }

    /// Remove a widget, returning it detached (id cleared).
    ///
    /// Unknown ids are a silent no-op returning `None`.
    pub fn remove_widget(&mut self, id: WidgetId) -> Option<Widget> {
        let idx = self.widgets.iter().position(|w| w.id == Some(id))?;
        let mut widget = self.widgets.remove(idx);
        widget.id = None;
        debug!(id = %id, "widget removed");
        self.after_mutation();
        Some(widget)
    }

    /// Move a widget to a new position (clamped to non-negative).
    ///
    /// The position is applied as given; callers wanting collision safety
    /// validate first via [`Grid::is_valid_position`] or
    /// [`Grid::nearest_valid_position`]. Unknown ids are a silent no-op.
    pub fn move_widget(&mut self, id: WidgetId, position: Cell) {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == Some(id)) else {
            trace!(id = %id, "move ignored for unknown widget");
            return;
        };
        widget.position = clamp_non_negative(position);
        trace!(id = %id, pos = %widget.position, "widget moved");
        self.after_mutation();
    }

    /// Resize a widget.
    ///
    /// On each axis whose auto-resize is disabled the requested size is
    /// clamped to the space remaining between the widget and the grid edge
    /// (never below 1); the request is never rejected. Unknown ids are a
    /// silent no-op.
    pub fn resize_widget(&mut self, id: WidgetId, size: CellSize) {
        let (grid_w, grid_h) = (self.width, self.height);
        let opts = self.options.clone();
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == Some(id)) else {
            trace!(id = %id, "resize ignored for unknown widget");
            return;
        };

        let width = if opts.auto_resize_width {
            size.width
        } else {
            clamp_to_remaining(size.width, widget.position.x, grid_w)
        };
        let height = if opts.auto_resize_height {
            size.height
        } else {
            clamp_to_remaining(size.height, widget.position.y, grid_h)
        };

        widget.size = CellSize::new(width, height);
        trace!(id = %id, size = %widget.size, "widget resized");
        self.after_mutation();
    }

    // -- placement ----------------------------------------------------------

    /// First available origin for a footprint of `size`, scanning rows top
    /// to bottom and columns left to right (top-left bias).
    ///
    /// With overlap allowed this is unconditionally `(0, 0)`. On an axis
    /// with auto-resize enabled the scan extends past the current bound to
    /// the edge of existing content, so an add can grow the grid instead
    /// of failing. Returns `None` when the scan exhausts the grid without
    /// a fully free candidate; [`Grid::add_widget`] treats that as "place
    /// at origin anyway".
    #[must_use]
    pub fn find_available_position(&self, size: CellSize) -> Option<Cell> {
        if self.options.allow_overlap {
            return Some(Cell::origin());
        }

        let occupied = self.occupied_cells(None);
        let content_right = self
            .widgets
            .iter()
            .map(|w| w.footprint().right())
            .max()
            .unwrap_or(0);
        let content_bottom = self
            .widgets
            .iter()
            .map(|w| w.footprint().bottom())
            .max()
            .unwrap_or(0);

        let max_x = if self.options.auto_resize_width {
            (self.width as i64 - size.width as i64).max(content_right)
        } else {
            self.width as i64 - size.width as i64
        };
        let max_y = if self.options.auto_resize_height {
            (self.height as i64 - size.height as i64).max(content_bottom)
        } else {
            self.height as i64 - size.height as i64
        };

        // Negative bounds (widget larger than the grid) make the ranges
        // empty, which falls through to None.
        for y in 0..=max_y {
            for x in 0..=max_x {
                let candidate = CellRect::new(x as i32, y as i32, size.width, size.height);
                if candidate.cells().all(|c| !occupied.contains(&(c.x, c.y))) {
                    return Some(candidate.origin());
                }
            }
        }
        None
    }

    /// Nearest valid origin to `target` for a footprint of `size`,
    /// searching expanding Chebyshev rings of radius 0, 1, … up to
    /// `max(width, height)`.
    ///
    /// `exclude` names a widget whose own footprint does not count as an
    /// obstacle, so a dragged widget can land on cells it already covers.
    /// Returns `None` when the search space is exhausted.
    #[must_use]
    pub fn nearest_valid_position(
        &self,
        target: Cell,
        size: CellSize,
        exclude: Option<WidgetId>,
    ) -> Option<Cell> {
        let max_ring = self.width.max(self.height) as i32;
        for d in 0..=max_ring {
            for dy in -d..=d {
                for dx in -d..=d {
                    if dx.abs().max(dy.abs()) != d {
                        continue;
                    }
                    let candidate = target.offset(dx, dy);
                    if self.is_valid_position(candidate, size, exclude) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }

    /// Validity test for a candidate placement.
    ///
    /// Rejects negative positions, rejects bounds overflow on axes whose
    /// auto-resize is disabled, and, unless overlap is allowed, rejects
    /// any candidate intersecting a widget other than `exclude`.
    #[must_use]
    pub fn is_valid_position(
        &self,
        position: Cell,
        size: CellSize,
        exclude: Option<WidgetId>,
    ) -> bool {
        if position.is_negative() {
            return false;
        }

        let rect = CellRect::from_parts(position, size);
        if !self.options.auto_resize_width && rect.right() > self.width as i64 {
            return false;
        }
        if !self.options.auto_resize_height && rect.bottom() > self.height as i64 {
            return false;
        }

        if self.options.allow_overlap {
            return true;
        }

        // Owned widgets always carry Some(id), so comparing against
        // `exclude` drops exactly the named widget and nothing else.
        !self
            .widgets
            .iter()
            .filter(|w| w.id != exclude)
            .any(|w| w.footprint().intersects(rect))
    }

    // -- pixel bookkeeping --------------------------------------------------

    /// Resolve the pixel extent of one cell for a viewport of
    /// `viewport_w` × `viewport_h` pixels.
    ///
    /// Fixed sizing ignores the viewport; proportional sizing divides the
    /// viewport (minus gaps) evenly among the grid's cells.
    #[must_use]
    pub fn cell_px(&self, viewport_w: f32, viewport_h: f32) -> CellPx {
        match self.options.cell_sizing {
            CellSizing::Fixed { width_px, height_px } => CellPx {
                width: width_px,
                height: height_px,
            },
            CellSizing::Proportional => {
                let gap = self.options.gap_px;
                let cols = self.width as f32;
                let rows = self.height as f32;
                CellPx {
                    width: ((viewport_w - gap * (cols - 1.0)) / cols).max(0.0),
                    height: ((viewport_h - gap * (rows - 1.0)) / rows).max(0.0),
                }
            }
        }
    }

    /// Map a widget's footprint to pixels for the given viewport.
    ///
    /// Returns `None` for unknown ids.
    #[must_use]
    pub fn pixel_rect(&self, id: WidgetId, viewport_w: f32, viewport_h: f32) -> Option<PxRect> {
        let widget = self.widget(id)?;
        let cell = self.cell_px(viewport_w, viewport_h);
        let gap = self.options.gap_px;
        let (x, y) = (widget.position.x as f32, widget.position.y as f32);
        let (w, h) = (widget.size.width as f32, widget.size.height as f32);
        Some(PxRect {
            x: x * (cell.width + gap),
            y: y * (cell.height + gap),
            width: w * cell.width + (w - 1.0) * gap,
            height: h * cell.height + (h - 1.0) * gap,
        })
    }

    // -- internals ----------------------------------------------------------

    /// Assign or validate an id for an incoming widget, advancing the
    /// counter past any caller-provided id.
    pub(crate) fn claim_id(&mut self, requested: Option<WidgetId>) -> WidgetId {
        match requested {
            Some(id) if self.widget(id).is_none() => {
                self.next_id = self.next_id.max(id.0 + 1);
                id
            }
            Some(id) => {
                let fresh = WidgetId(self.next_id);
                self.next_id += 1;
                warn!(requested = %id, assigned = %fresh, "duplicate widget id, assigning fresh");
                fresh
            }
            None => {
                let fresh = WidgetId(self.next_id);
                self.next_id += 1;
                fresh
            }
        }
    }

    /// Occupied-cell set over all widget footprints, optionally excluding
    /// one widget.
    pub(crate) fn occupied_cells(&self, exclude: Option<WidgetId>) -> FxHashSet<(i32, i32)> {
        let mut occupied = FxHashSet::default();
        for widget in &self.widgets {
            if exclude.is_some() && widget.id == exclude {
                continue;
            }
            for cell in widget.footprint().cells() {
                occupied.insert((cell.x, cell.y));
            }
        }
        occupied
    }

    /// Auto-resize pass + snapshot rebuild + notification. Runs after
    /// every mutation.
    pub(crate) fn after_mutation(&mut self) {
        self.apply_auto_resize();
        self.snapshot = Layout::capture(&self.widgets);
        self.layout_changed.emit(&LayoutChanged {
            layout: self.snapshot.clone(),
        });
    }

    /// Grow/shrink enabled axes to the widget bounding box, bounded below
    /// by the shrink floor. Emits `grid-resized` only on actual change.
    fn apply_auto_resize(&mut self) {
        let required_w = self
            .widgets
            .iter()
            .map(|w| w.footprint().right().max(0) as u32)
            .max()
            .unwrap_or(0);
        let required_h = self
            .widgets
            .iter()
            .map(|w| w.footprint().bottom().max(0) as u32)
            .max()
            .unwrap_or(0);

        let mut changed = false;
        if self.options.auto_resize_width {
            let floor = if self.options.auto_shrink {
                1
            } else {
                self.initial_width
            };
            let new_width = required_w.max(floor);
            if new_width != self.width {
                self.width = new_width;
                changed = true;
            }
        }
        if self.options.auto_resize_height {
            let floor = if self.options.auto_shrink {
                1
            } else {
                self.initial_height
            };
            let new_height = required_h.max(floor);
            if new_height != self.height {
                self.height = new_height;
                changed = true;
            }
        }

        if changed {
            debug!(width = self.width, height = self.height, "grid auto-resized");
            self.grid_resized.emit(&GridResized {
                width: self.width,
                height: self.height,
            });
        }
    }
}

/// Clamp a position to the non-negative quadrant.
fn clamp_non_negative(pos: Cell) -> Cell {
    Cell::new(pos.x.max(0), pos.y.max(0))
}

/// Clamp a requested extent to the space between `origin` and the grid
/// edge at `limit`, never below 1.
fn clamp_to_remaining(requested: u32, origin: i32, limit: u32) -> u32 {
    let remaining = limit as i64 - origin as i64;
    requested.min(remaining.max(1) as u32)
}
