#![forbid(unsafe_code)]

//! Core: cell geometry and change notification for dashgrid.
//!
//! # Role in dashgrid
//! `dashgrid-core` is the foundation layer. It owns the integer-cell
//! coordinate types the layout engine computes with, and the typed signal
//! primitive the engine uses to announce mutations.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Cell`], [`CellSize`], and [`CellRect`]: positions,
//!   extents, and footprints on the logical grid, with the intersection and
//!   iteration helpers collision tests are built from.
//! - **Signals**: [`Signal`] and [`Subscription`]: a typed observer list
//!   with RAII unsubscription.
//!
//! # How it fits in the system
//! The engine (`dashgrid-layout`) consumes these types and exposes them in
//! its public API. Rendering and persistence layers are external; they see
//! the same geometry through layout snapshots.

pub mod geometry;
pub mod signal;

pub use geometry::{Cell, CellRect, CellSize};
pub use signal::{Signal, Subscription};
