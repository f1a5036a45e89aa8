//! Rendering: themes, static markup, state projections, fragments
//!
//! This module is READ-ONLY with respect to game state. It never mutates a
//! session; projections are frozen snapshots taken on demand.

pub mod fragment;
pub mod markup;
pub mod projection;
pub mod theme;

pub use fragment::{escape_script_json, render_activity, Fragment, MountDescriptor, Renderer};
pub use markup::{battleships_markup, escape_html, memory_markup};
pub use projection::{BoardView, CardView, CellView, MemoryView};
pub use theme::{Color, Palette, Theme, DEFAULT_THEME};
