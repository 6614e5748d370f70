//! Turning dropped or selected files into image records.
//!
//! This module provides:
//! - The platform seams (`DropEntry`, `DirectoryReader`, `SourceFile`,
//!   `DimensionProbe`) the traversal is written against
//! - The image record builder and its dimension probing decorator
//! - The recursive entry traversal engine
//! - Native (`std::fs`) and browser (`web-sys`) implementations of the seams
//!
//! ## Adding a New Source
//!
//! Implement `DropEntry` and `DirectoryReader` for the platform's entry
//! type, `SourceFile` for its file handle, and hand the entries to
//! [`process_dropped_entries`].

mod builder;
mod source;
mod traversal;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use builder::{create_image_record, records_from_selection, with_dimensions};
pub use source::{DimensionProbe, DirectoryReader, DropEntry, EntryKind, SourceFile};
pub use traversal::{join_path, process_dropped_entries};
