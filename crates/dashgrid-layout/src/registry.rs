#![forbid(unsafe_code)]

//! Widget factory registry.
//!
//! The registry is an explicit, per-instance map from kind tag to factory.
//! There is no process-wide registration and no silent fallback to a
//! generic widget: a tag without a factory is an explicit
//! [`RegistryError::UnknownKind`], which `load_layout` logs and skips.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown tag | No factory registered | `RegistryError::UnknownKind` |
//! | Factory error | Factory returned `Err` | `RegistryError::Factory` wrapping it |

use rustc_hash::FxHashMap;

use crate::snapshot::LayoutEntry;
use crate::widget::{Widget, WidgetKind};

/// Errors from resolving a snapshot entry into a widget.
#[derive(Debug)]
pub enum RegistryError {
    /// No factory is registered for the kind tag.
    UnknownKind(String),
    /// The factory itself failed.
    Factory {
        kind: String,
        source: Box<dyn std::error::Error>,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(tag) => write!(f, "no widget factory for kind '{tag}'"),
            Self::Factory { kind, source } => {
                write!(f, "widget factory for kind '{kind}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownKind(_) => None,
            Self::Factory { source, .. } => Some(source.as_ref()),
        }
    }
}

/// A factory building a widget from a snapshot entry.
///
/// The grid applies the entry's id, position, and size afterwards; the
/// factory is responsible for kind, title, flags, and any widget-internal
/// state.
pub type WidgetFactory = Box<dyn Fn(&LayoutEntry) -> Result<Widget, Box<dyn std::error::Error>>>;

/// Map from kind tag to widget factory.
pub struct WidgetRegistry {
    factories: FxHashMap<String, WidgetFactory>,
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("WidgetRegistry").field("tags", &tags).finish()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl WidgetRegistry {
    /// An empty registry with no factories at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// A registry pre-populated with the built-in dashboard kinds
    /// (downloads, settings, statistics, subscriptions).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for kind in [
            WidgetKind::Downloads,
            WidgetKind::Settings,
            WidgetKind::Statistics,
            WidgetKind::Subscriptions,
        ] {
            let tag = kind.as_tag().to_string();
            registry.register(tag, move |entry: &LayoutEntry| {
                Ok(Widget::new(kind.clone()).with_title(entry.title.clone()))
            });
        }
        registry
    }

    /// Register a factory for a kind tag, replacing any previous one.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        factory: impl Fn(&LayoutEntry) -> Result<Widget, Box<dyn std::error::Error>> + 'static,
    ) {
        self.factories.insert(tag.into(), Box::new(factory));
    }

    /// Remove the factory for a tag. Returns true if one was registered.
    pub fn unregister(&mut self, tag: &str) -> bool {
        self.factories.remove(tag).is_some()
    }

    /// True if a factory is registered for the tag.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Resolve a snapshot entry into a widget.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownKind`] when no factory matches the entry's
    /// tag, [`RegistryError::Factory`] when the factory fails.
    pub fn create(&self, entry: &LayoutEntry) -> Result<Widget, RegistryError> {
        let factory = self
            .factories
            .get(&entry.kind)
            .ok_or_else(|| RegistryError::UnknownKind(entry.kind.clone()))?;
        factory(entry).map_err(|source| RegistryError::Factory {
            kind: entry.kind.clone(),
            source,
        })
    }
}
