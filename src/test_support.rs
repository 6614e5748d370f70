//! In-memory fixtures shared by the unit tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::data::{DimensionProbe, DirectoryReader, DropEntry, EntryKind, SourceFile};
use crate::error::{GalleryError, Result};
use crate::model::{BlobResource, DataHandle, Dimensions, ImageRecord};

/// Resource that counts how often it was released.
#[derive(Debug)]
pub struct CountingBlob {
    locator: String,
    releases: Rc<Cell<u32>>,
}

impl CountingBlob {
    pub fn new(locator: &str) -> (Self, Rc<Cell<u32>>) {
        let releases = Rc::new(Cell::new(0));
        let blob = Self {
            locator: locator.to_string(),
            releases: Rc::clone(&releases),
        };
        (blob, releases)
    }
}

impl BlobResource for CountingBlob {
    fn locator(&self) -> &str {
        &self.locator
    }

    fn release(self: Box<Self>) {
        self.releases.set(self.releases.get() + 1);
    }
}

/// Record at `path` backed by a counting blob.
pub fn record(path: &str) -> ImageRecord {
    record_counted(path).0
}

/// Record at `path` plus the release counter of its handle.
pub fn record_counted(path: &str) -> (ImageRecord, Rc<Cell<u32>>) {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (blob, releases) = CountingBlob::new(&format!("blob:{}", path));
    let record = ImageRecord::new(name, path, DataHandle::new(blob), 1024, 0, "image/png");
    (record, releases)
}

/// Future that returns `Pending` once before completing.
pub async fn yield_now() {
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    YieldNow(false).await
}

fn guess_mime(name: &str) -> String {
    match crate::model::file_extension(name).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "",
    }
    .to_string()
}

/// File handle with settable metadata.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    relative_path: Option<String>,
    size: u64,
    modified: i64,
    mime: String,
}

impl MemoryFile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            relative_path: None,
            size: 1024,
            modified: 0,
            mime: guess_mime(name),
        }
    }

    pub fn with_relative_path(mut self, path: &str) -> Self {
        self.relative_path = Some(path.to_string());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_modified(mut self, modified: i64) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime = mime.to_string();
        self
    }
}

impl SourceFile for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn relative_path(&self) -> Option<String> {
        self.relative_path.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> String {
        self.mime.clone()
    }

    fn last_modified_ms(&self) -> i64 {
        self.modified
    }

    fn open_handle(&self) -> DataHandle {
        let (blob, _) = CountingBlob::new(&format!("mem://{}", self.name));
        DataHandle::new(blob)
    }
}

#[derive(Debug, Clone)]
enum Node {
    File,
    Directory {
        children: Rc<Vec<MemoryEntry>>,
        page_size: usize,
    },
}

/// In-memory dropped entry tree. Every read yields once to interleave siblings.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    name: String,
    node: Node,
    failing: bool,
}

impl MemoryEntry {
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node: Node::File,
            failing: false,
        }
    }

    pub fn dir(name: &str, children: Vec<MemoryEntry>) -> Self {
        Self {
            name: name.to_string(),
            node: Node::Directory {
                children: Rc::new(children),
                page_size: 3,
            },
            failing: false,
        }
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        if let Node::Directory { page_size, .. } = &mut self.node {
            *page_size = size.max(1);
        }
        self
    }

    /// Make reads of this entry fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl DropEntry for MemoryEntry {
    type File = MemoryFile;
    type Reader = MemoryReader;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> EntryKind {
        match self.node {
            Node::File => EntryKind::File,
            Node::Directory { .. } => EntryKind::Directory,
        }
    }

    async fn file(&self) -> Result<MemoryFile> {
        yield_now().await;
        if self.failing {
            return Err(GalleryError::file_read(self.name.clone(), "file vanished"));
        }
        Ok(MemoryFile::new(&self.name))
    }

    fn create_reader(&self) -> Result<MemoryReader> {
        match &self.node {
            Node::Directory {
                children,
                page_size,
            } => Ok(MemoryReader {
                name: self.name.clone(),
                children: Rc::clone(children),
                cursor: 0,
                page_size: *page_size,
                failing: self.failing,
            }),
            Node::File => Err(GalleryError::directory_read(
                self.name.clone(),
                "not a directory",
            )),
        }
    }
}

/// Paged reader over a [`MemoryEntry`] directory.
#[derive(Debug)]
pub struct MemoryReader {
    name: String,
    children: Rc<Vec<MemoryEntry>>,
    cursor: usize,
    page_size: usize,
    failing: bool,
}

impl DirectoryReader for MemoryReader {
    type Entry = MemoryEntry;

    async fn read_entries(&mut self) -> Result<Vec<MemoryEntry>> {
        yield_now().await;
        if self.failing {
            return Err(GalleryError::directory_read(
                self.name.clone(),
                "permission denied",
            ));
        }
        let end = (self.cursor + self.page_size).min(self.children.len());
        let page = self.children[self.cursor..end].to_vec();
        self.cursor = end;
        Ok(page)
    }
}

/// Probe answering from a locator → size table; unknown locators fail.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    sizes: HashMap<String, Dimensions>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, locator: &str, width: u32, height: u32) -> Self {
        self.sizes
            .insert(locator.to_string(), Dimensions::new(width, height));
        self
    }
}

impl DimensionProbe for MemoryProbe {
    async fn probe(&self, record: &ImageRecord) -> Result<Dimensions> {
        yield_now().await;
        let locator = record.live_url()?;
        self.sizes
            .get(locator)
            .copied()
            .ok_or_else(|| GalleryError::decode(record.name(), "unsupported image data"))
    }
}
