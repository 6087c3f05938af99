#![forbid(unsafe_code)]

//! Integer-cell geometry for grid layout.
//!
//! All positions and extents live on a logical grid of unit cells. Pixel
//! concerns (cell size, gaps) belong to the engine's metrics helpers, not
//! here.
//!
//! # Invariants
//!
//! 1. [`CellSize`] is never smaller than 1×1; constructors clamp.
//! 2. [`CellRect`] edges are half-open: `right()` and `bottom()` are
//!    exclusive, so two rects sharing an edge do **not** intersect.
//! 3. `cells()` yields footprint cells in row-major order (y outer,
//!    x inner), matching the engine's scan order.

use serde::{Deserialize, Serialize};

/// A position on the logical grid, in cells.
///
/// Coordinates are signed so that candidate positions produced by drag
/// offsets can go negative; the engine's validity test rejects those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Create a cell position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The grid origin, `(0, 0)`.
    #[inline]
    #[must_use]
    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// This cell displaced by `(dx, dy)`, saturating at the i32 range.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// True if either coordinate is negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.x < 0 || self.y < 0
    }

    /// Chebyshev (ring) distance to another cell: `max(|dx|, |dy|)`.
    ///
    /// This is the metric the nearest-position search expands by.
    #[inline]
    #[must_use]
    pub fn ring_distance(self, other: Cell) -> u32 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        dx.max(dy).min(u32::MAX as u64) as u32
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A widget extent in cells. Never smaller than 1×1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Create a size, clamping each axis to at least 1.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// The 1×1 unit size.
    #[inline]
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::unit()
    }
}

impl std::fmt::Display for CellSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A placed footprint: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    /// Create a rect from origin and extent. Extent is clamped to 1×1.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        let size = CellSize::new(width, height);
        Self {
            x,
            y,
            width: size.width,
            height: size.height,
        }
    }

    /// Build a rect from a position and size pair.
    #[inline]
    #[must_use]
    pub const fn from_parts(origin: Cell, size: CellSize) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The top-left cell.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Cell {
        Cell::new(self.x, self.y)
    }

    /// The extent.
    #[inline]
    #[must_use]
    pub const fn size(self) -> CellSize {
        CellSize::new(self.width, self.height)
    }

    /// Exclusive right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn right(self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn bottom(self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True if the two footprints share at least one cell.
    ///
    /// Half-open semantics: rects that merely touch along an edge do not
    /// intersect.
    #[inline]
    #[must_use]
    pub fn intersects(self, other: CellRect) -> bool {
        !(self.right() <= other.x as i64
            || other.right() <= self.x as i64
            || self.bottom() <= other.y as i64
            || other.bottom() <= self.y as i64)
    }

    /// True if `cell` lies inside this footprint.
    #[inline]
    #[must_use]
    pub fn contains_cell(self, cell: Cell) -> bool {
        (cell.x as i64) >= self.x as i64
            && (cell.x as i64) < self.right()
            && (cell.y as i64) >= self.y as i64
            && (cell.y as i64) < self.bottom()
    }

    /// Iterate the footprint cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let (x, y) = (self.x, self.y);
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |dy| (0..w).map(move |dx| Cell::new(x + dx, y + dy)))
    }
}

impl std::fmt::Display for CellRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.size(), self.origin())
    }
}
