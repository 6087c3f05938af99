#![forbid(unsafe_code)]

//! Collision-aware grid dashboard layout engine.
//!
//! # Role in dashgrid
//! `dashgrid-layout` maintains rectangular widgets on an integer cell grid:
//! add/move/resize/remove, auto-placement into free space, overlap
//! prevention, nearest-slot search for drag targets, and auto-growing grid
//! dimensions. It is the single stateful component between the (external)
//! rendering, input, and persistence layers.
//!
//! # Primary responsibilities
//! - **Grid**: widget lifecycle and the placement/validity algorithms.
//! - **Snapshots**: ordered, serializable layout state with best-effort
//!   reload through a widget factory registry.
//! - **Signals**: layout-changed after every mutation, grid-resized on
//!   actual dimension change.
//!
//! # Concurrency
//! Single-threaded and synchronous by design: every operation runs to
//! completion inside one UI callback, so call order is the only ordering.
//!
//! # Example
//!
//! ```
//! use dashgrid_core::{Cell, CellSize};
//! use dashgrid_layout::{Grid, GridOptions, Widget, WidgetKind};
//!
//! let mut grid = Grid::new(6, 4, GridOptions::new())?;
//! let downloads = grid.add_widget(Widget::new(WidgetKind::Downloads), None);
//! let stats = grid.add_widget(
//!     Widget::new(WidgetKind::Statistics).with_size(CellSize::new(2, 2)),
//!     None,
//! );
//!
//! // Drag handling: snap a drop near (5, 0) to the closest free slot.
//! if let Some(slot) = grid.nearest_valid_position(Cell::new(5, 0), CellSize::new(2, 2), Some(stats)) {
//!     grid.move_widget(stats, slot);
//! }
//!
//! let saved = grid.layout();
//! # let _ = (downloads, saved);
//! # Ok::<(), dashgrid_layout::GridError>(())
//! ```

pub mod grid;
pub mod registry;
pub mod snapshot;
pub mod widget;

pub use grid::{
    CellPx, CellSizing, Grid, GridError, GridOptions, GridResized, LayoutChanged, PxRect,
};
pub use registry::{RegistryError, WidgetFactory, WidgetRegistry};
pub use snapshot::{Layout, LayoutEntry, LoadReport, SkippedEntry};
pub use widget::{Widget, WidgetFlags, WidgetId, WidgetKind};
