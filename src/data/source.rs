//! Platform seams for reading dropped entries.
//!
//! The traversal engine only talks to these traits. The browser build backs
//! them with the `FileSystemEntry` API, the native build with `std::fs`.
//!
//! All futures here run on a single cooperative thread and are not required
//! to be `Send`.

use std::future::Future;

use crate::error::Result;
use crate::model::{DataHandle, Dimensions, ImageRecord};

/// Whether a dropped entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of a drag-and-drop payload.
pub trait DropEntry: Sized {
    /// File handle produced by [`DropEntry::file`].
    type File: SourceFile;
    /// Reader produced by [`DropEntry::create_reader`].
    type Reader: DirectoryReader<Entry = Self>;

    /// Entry name (last path segment).
    fn name(&self) -> String;

    fn kind(&self) -> EntryKind;

    /// Resolve a file entry to its file handle.
    fn file(&self) -> impl Future<Output = Result<Self::File>>;

    /// Open a paginated reader over a directory entry's children.
    fn create_reader(&self) -> Result<Self::Reader>;
}

/// Paginated directory listing.
///
/// A listing is exhausted only once `read_entries` yields an empty page.
pub trait DirectoryReader {
    type Entry;

    /// Read the next page of children.
    fn read_entries(&mut self) -> impl Future<Output = Result<Vec<Self::Entry>>>;
}

/// A readable file, either from a dropped entry or a file input.
pub trait SourceFile {
    /// Bare file name.
    fn name(&self) -> String;

    /// Relative path when the file came from a folder selection.
    fn relative_path(&self) -> Option<String>;

    fn size(&self) -> u64;

    /// MIME type reported by the platform, possibly empty.
    fn mime_type(&self) -> String;

    /// Last modification time in milliseconds since the Unix epoch.
    fn last_modified_ms(&self) -> i64;

    /// Acquire a resource handle for the file's bytes.
    fn open_handle(&self) -> DataHandle;
}

/// Decodes an image far enough to learn its natural size.
pub trait DimensionProbe {
    /// Read the natural size of the record's image data.
    fn probe(&self, record: &ImageRecord) -> impl Future<Output = Result<Dimensions>>;
}
