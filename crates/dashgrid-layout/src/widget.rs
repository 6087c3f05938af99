#![forbid(unsafe_code)]

//! Widget identity, kinds, and capability flags.
//!
//! A [`Widget`] is a rectangular, positioned, sized dashboard unit. It is
//! created by client code, handed to [`Grid::add_widget`], mutated in place
//! by move/resize calls while the grid owns it, and detached on removal.
//!
//! [`Grid::add_widget`]: crate::grid::Grid::add_widget

use bitflags::bitflags;
use dashgrid_core::{Cell, CellRect, CellSize};
use serde::{Deserialize, Serialize};

/// Unique widget identifier within a grid.
///
/// Assigned from the grid's monotonic counter when the caller does not
/// provide one; preserved verbatim through layout snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WidgetId(pub u64);

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}", self.0)
    }
}

bitflags! {
    /// Per-widget capability flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// The widget may be removed from the grid by the user.
        const REMOVABLE = 1 << 0;
        /// The widget may be resized interactively.
        const RESIZABLE = 1 << 1;
        /// The widget may be dragged to a new position.
        const DRAGGABLE = 1 << 2;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Widget type tag: the built-in dashboard kinds plus custom tags resolved
/// through the widget registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Active download queue.
    Downloads,
    /// Application settings form.
    Settings,
    /// Transfer/throughput statistics.
    Statistics,
    /// Subscription feed cards.
    Subscriptions,
    /// Anything registered by the host application.
    Custom(String),
}

impl WidgetKind {
    /// Stable string tag, round-tripped through layout snapshots.
    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Downloads => "downloads",
            Self::Settings => "settings",
            Self::Statistics => "statistics",
            Self::Subscriptions => "subscriptions",
            Self::Custom(tag) => tag,
        }
    }

    /// Parse a tag back into a kind. Unrecognized tags become
    /// [`WidgetKind::Custom`]; whether such a kind is *loadable* is decided
    /// by the registry, not here.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "downloads" => Self::Downloads,
            "settings" => Self::Settings,
            "statistics" => Self::Statistics,
            "subscriptions" => Self::Subscriptions,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Default display title for the kind.
    #[must_use]
    pub fn default_title(&self) -> &str {
        match self {
            Self::Downloads => "Downloads",
            Self::Settings => "Settings",
            Self::Statistics => "Statistics",
            Self::Subscriptions => "Subscriptions",
            Self::Custom(tag) => tag,
        }
    }

    /// Default footprint for a freshly created widget of this kind.
    #[must_use]
    pub fn default_size(&self) -> CellSize {
        match self {
            Self::Downloads => CellSize::new(4, 3),
            Self::Settings => CellSize::new(2, 2),
            Self::Statistics => CellSize::new(2, 2),
            Self::Subscriptions => CellSize::new(4, 2),
            Self::Custom(_) => CellSize::unit(),
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A rectangular, positioned, sized dashboard unit.
///
/// `id` is `None` until a grid takes ownership via `add_widget`, and is
/// cleared again when the widget is detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: Option<WidgetId>,
    pub kind: WidgetKind,
    pub title: String,
    pub position: Cell,
    pub size: CellSize,
    pub flags: WidgetFlags,
}

impl Widget {
    /// Create a widget of the given kind with its default title and size.
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        let title = kind.default_title().to_string();
        let size = kind.default_size();
        Self {
            id: None,
            kind,
            title,
            position: Cell::origin(),
            size,
            flags: WidgetFlags::default(),
        }
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the extent in cells.
    #[must_use]
    pub fn with_size(mut self, size: CellSize) -> Self {
        self.size = size;
        self
    }

    /// Set the position in cells.
    #[must_use]
    pub fn with_position(mut self, position: Cell) -> Self {
        self.position = position;
        self
    }

    /// Set the capability flags.
    #[must_use]
    pub fn with_flags(mut self, flags: WidgetFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The footprint rectangle derived from position and size.
    #[inline]
    #[must_use]
    pub fn footprint(&self) -> CellRect {
        CellRect::from_parts(self.position, self.size)
    }

    /// True if the widget may be removed by the user.
    #[inline]
    #[must_use]
    pub fn is_removable(&self) -> bool {
        self.flags.contains(WidgetFlags::REMOVABLE)
    }

    /// True if the widget may be resized interactively.
    #[inline]
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.flags.contains(WidgetFlags::RESIZABLE)
    }

    /// True if the widget may be dragged.
    #[inline]
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.flags.contains(WidgetFlags::DRAGGABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_round_trip() {
        for kind in [
            WidgetKind::Downloads,
            WidgetKind::Settings,
            WidgetKind::Statistics,
            WidgetKind::Subscriptions,
            WidgetKind::Custom("episode-calendar".into()),
        ] {
            assert_eq!(WidgetKind::from_tag(kind.as_tag()), kind);
        }
    }

    #[test]
    fn unknown_tag_becomes_custom() {
        assert_eq!(
            WidgetKind::from_tag("rss-ticker"),
            WidgetKind::Custom("rss-ticker".into())
        );
    }

    #[test]
    fn new_widget_has_no_id() {
        let w = Widget::new(WidgetKind::Downloads);
        assert!(w.id.is_none());
        assert_eq!(w.title, "Downloads");
        assert_eq!(w.size, CellSize::new(4, 3));
    }

    #[test]
    fn builder_setters() {
        let w = Widget::new(WidgetKind::Settings)
            .with_title("Preferences")
            .with_size(CellSize::new(3, 1))
            .with_position(Cell::new(2, 4))
            .with_flags(WidgetFlags::RESIZABLE);
        assert_eq!(w.title, "Preferences");
        assert_eq!(w.footprint(), CellRect::new(2, 4, 3, 1));
        assert!(w.is_resizable());
        assert!(!w.is_removable());
        assert!(!w.is_draggable());
    }

    #[test]
    fn default_flags_allow_everything() {
        let w = Widget::new(WidgetKind::Statistics);
        assert!(w.is_removable() && w.is_resizable() && w.is_draggable());
    }
}
