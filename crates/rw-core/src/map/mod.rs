//! Marker synchronization against an external map widget.
//!
//! The widget is reached only through [`MapBackend`]; its handles are opaque
//! associated types. [`MarkerSync`] owns the marker registry and is the only
//! component that creates or releases those handles.

mod backend;
mod icon;
mod memory;
mod popup;
mod sync;

pub use backend::{MapBackend, MapView, TileLayer};
pub use icon::{IconGlyph, IconSpec};
pub use memory::{InMemoryMap, MapEvent, MemoryIcon, MemoryMapHandle, MemoryMarker};
pub use popup::{escape_html, render_popup};
pub use sync::{MarkerSync, ReconcileReport};
