//! Drop Gallery - a local image gallery library.
//!
//! Files and folders dropped on the page (or, natively, paths dropped on a
//! window) are walked recursively into [`ImageRecord`]s. On top of the record
//! list the crate provides directory grouping, fuzzy search, the browsing
//! selection and a pan/zoom viewer. In the browser everything is driven
//! through the `WebGallery` facade.

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod format;
pub mod keybindings;
pub mod logging;
pub mod model;
pub mod search;
pub mod state;
pub mod zoom_math;

#[cfg(test)]
mod test_support;

pub use config::{GalleryConfig, LogLevel, ViewerSettings};
pub use error::{GalleryError, Result};
pub use model::{DirectoryInfo, ImageRecord, ViewMode, group_by_directory};
pub use search::{SearchIndex, SearchOptions};
pub use state::{BrowserState, FitMode, ViewerState};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
