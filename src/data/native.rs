//! Native (`std::fs`) implementation of the entry seams.
//!
//! Used when paths are dropped on a desktop window. Directory listings are
//! handed out in pages of [`DIRECTORY_PAGE_SIZE`] and file paths serve as
//! resource locators.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::constants::DIRECTORY_PAGE_SIZE;
use crate::data::{
    DimensionProbe, DirectoryReader, DropEntry, EntryKind, SourceFile, process_dropped_entries,
};
use crate::error::{GalleryError, Result};
use crate::model::{BlobResource, DataHandle, Dimensions, ImageRecord, file_extension};

/// MIME type for an image file name, empty when unknown.
pub fn mime_for_name(name: &str) -> String {
    let extension = file_extension(name);
    if extension == "svg" {
        return "image/svg+xml".to_string();
    }
    image::ImageFormat::from_extension(&extension)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// A dropped path on the local file system.
#[derive(Debug, Clone)]
pub struct NativeEntry {
    path: PathBuf,
    kind: EntryKind,
}

impl NativeEntry {
    /// Stat a path. Anything that is neither a file nor a directory is rejected.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Err(GalleryError::file_read(
                path.to_string_lossy(),
                "not a regular file or directory",
            ));
        };
        Ok(Self { path, kind })
    }

    /// Classify a directory listing item without following directory links.
    ///
    /// Symlinks to files are kept; symlinks to directories yield `None` so a
    /// link back to an ancestor cannot be walked again.
    fn from_dir_item(item: &fs::DirEntry) -> Result<Option<Self>> {
        let path = item.path();
        let file_type = item.file_type()?;
        if file_type.is_symlink() {
            if fs::metadata(&path)?.is_dir() {
                log::debug!("Skipping directory link {:?}", path);
                return Ok(None);
            }
            return Self::from_path(path).map(Some);
        }

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            return Ok(None);
        };
        Ok(Some(Self { path, kind }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DropEntry for NativeEntry {
    type File = NativeFile;
    type Reader = NativeDirectoryReader;

    fn name(&self) -> String {
        display_name(&self.path)
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }

    async fn file(&self) -> Result<NativeFile> {
        NativeFile::open(&self.path)
    }

    fn create_reader(&self) -> Result<NativeDirectoryReader> {
        Ok(NativeDirectoryReader::new(self.path.clone(), DIRECTORY_PAGE_SIZE))
    }
}

/// Paged reader over `fs::read_dir`.
///
/// The directory is opened lazily on the first read so open failures
/// surface as page read errors.
#[derive(Debug)]
pub struct NativeDirectoryReader {
    path: PathBuf,
    page_size: usize,
    entries: Option<fs::ReadDir>,
    exhausted: bool,
}

impl NativeDirectoryReader {
    pub fn new(path: PathBuf, page_size: usize) -> Self {
        Self {
            path,
            page_size: page_size.max(1),
            entries: None,
            exhausted: false,
        }
    }

    fn read_page(&mut self) -> Result<Vec<NativeEntry>> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        if self.entries.is_none() {
            let entries = fs::read_dir(&self.path).map_err(|e| {
                GalleryError::directory_read(self.path.to_string_lossy(), e.to_string())
            })?;
            self.entries = Some(entries);
        }
        let Some(entries) = self.entries.as_mut() else {
            return Ok(Vec::new());
        };

        let mut page = Vec::with_capacity(self.page_size);
        while page.len() < self.page_size {
            let Some(item) = entries.next() else {
                self.exhausted = true;
                break;
            };
            let item = item.map_err(|e| {
                GalleryError::directory_read(self.path.to_string_lossy(), e.to_string())
            })?;

            match NativeEntry::from_dir_item(&item) {
                Ok(Some(entry)) => page.push(entry),
                Ok(None) => {}
                Err(e) => log::trace!("Skipping {:?}: {}", item.path(), e),
            }
        }
        Ok(page)
    }
}

impl DirectoryReader for NativeDirectoryReader {
    type Entry = NativeEntry;

    async fn read_entries(&mut self) -> Result<Vec<NativeEntry>> {
        self.read_page()
    }
}

/// File on disk with its metadata captured at open time.
#[derive(Debug, Clone)]
pub struct NativeFile {
    path: PathBuf,
    name: String,
    size: u64,
    modified_ms: i64,
}

impl NativeFile {
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .map_err(|e| GalleryError::file_read(path.to_string_lossy(), e.to_string()))?;
        let modified_ms = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|age| age.as_millis() as i64)
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name: display_name(path),
            size: metadata.len(),
            modified_ms,
        })
    }
}

impl SourceFile for NativeFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn relative_path(&self) -> Option<String> {
        None
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> String {
        mime_for_name(&self.name)
    }

    fn last_modified_ms(&self) -> i64 {
        self.modified_ms
    }

    fn open_handle(&self) -> DataHandle {
        DataHandle::new(FileBlob {
            locator: self.path.to_string_lossy().into_owned(),
        })
    }
}

/// Resource handle naming a file on disk. Nothing is held open.
#[derive(Debug)]
pub struct FileBlob {
    locator: String,
}

impl BlobResource for FileBlob {
    fn locator(&self) -> &str {
        &self.locator
    }

    fn release(self: Box<Self>) {
        log::trace!("Released file handle {}", self.locator);
    }
}

/// Reads image headers with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeProbe;

impl DimensionProbe for DecodeProbe {
    async fn probe(&self, record: &ImageRecord) -> Result<Dimensions> {
        let locator = record.live_url()?;
        let (width, height) = image::image_dimensions(locator)
            .map_err(|e| GalleryError::decode(record.name(), e.to_string()))?;
        Ok(Dimensions::new(width, height))
    }
}

/// Traverse dropped paths to completion on the current thread.
pub fn load_dropped_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ImageRecord>> {
    let entries = paths
        .iter()
        .map(|path| NativeEntry::from_path(path.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    log::info!("Files dropped: {} paths", entries.len());
    pollster::block_on(process_dropped_entries(entries, &DecodeProbe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("a.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("b.png"), "image/png");
        assert_eq!(mime_for_name("c.svg"), "image/svg+xml");
        assert_eq!(mime_for_name("d.unknown"), "");
    }

    #[test]
    fn test_dropped_folder_on_disk() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let photos = temp_dir.path().join("Photos");
        fs::create_dir_all(photos.join("Sub")).unwrap();
        fs::write(photos.join("a.jpg"), b"not really a jpeg").unwrap();
        fs::write(photos.join("b.txt"), b"notes").unwrap();
        write_png(&photos.join("Sub").join("c.png"), 3, 2);

        let records = load_dropped_paths(&[&photos]).unwrap();
        let paths: BTreeSet<&str> = records.iter().map(|r| r.path()).collect();
        assert_eq!(paths, BTreeSet::from(["Photos/a.jpg", "Photos/Sub/c.png"]));

        let broken = records.iter().find(|r| r.name() == "a.jpg").unwrap();
        assert_eq!(broken.dimensions(), None);
        assert_eq!(broken.mime_type(), "image/jpeg");
        assert_eq!(broken.size_bytes(), 17);

        let png = records.iter().find(|r| r.name() == "c.png").unwrap();
        assert_eq!(png.dimensions(), Some(Dimensions::new(3, 2)));
        assert!(png.url().unwrap().ends_with("c.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        use std::os::unix::fs::symlink;

        let temp_dir = tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join("D");
        fs::create_dir_all(root.join("Inner")).unwrap();
        write_png(&root.join("a.png"), 1, 1);
        symlink(".", root.join("self")).unwrap();
        symlink(&root, root.join("Inner").join("back")).unwrap();
        symlink(root.join("a.png"), root.join("alias.png")).unwrap();

        let records = load_dropped_paths(&[&root]).unwrap();
        let paths: BTreeSet<&str> = records.iter().map(|r| r.path()).collect();
        assert_eq!(paths, BTreeSet::from(["D/a.png", "D/alias.png"]));
    }

    #[test]
    fn test_reader_pages_until_empty() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        for i in 0..7 {
            fs::write(temp_dir.path().join(format!("f{}.png", i)), b"x").unwrap();
        }

        let mut reader = NativeDirectoryReader::new(temp_dir.path().to_path_buf(), 3);
        let sizes: Vec<usize> = (0..4).map(|_| reader.read_page().unwrap().len()).collect();
        assert_eq!(sizes, vec![3, 3, 1, 0]);
        assert!(reader.read_page().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_fails_on_first_read() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut reader = NativeDirectoryReader::new(temp_dir.path().join("nope"), 3);
        assert!(matches!(
            reader.read_page(),
            Err(GalleryError::DirectoryRead { .. })
        ));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_dropped_paths(&[temp_dir.path().join("ghost.png")]);
        assert!(matches!(result, Err(GalleryError::Io(_))));
    }

    #[test]
    fn test_decode_on_released_record_names_path() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("p.png");
        write_png(&path, 2, 2);

        let file = NativeFile::open(&path).unwrap();
        let mut record = crate::data::create_image_record(&file, Some("Drop/p.png"));
        let dims = pollster::block_on(DecodeProbe.probe(&record)).unwrap();
        assert_eq!(dims, Dimensions::new(2, 2));

        record.release_data();
        match pollster::block_on(DecodeProbe.probe(&record)) {
            Err(GalleryError::Released { path }) => assert_eq!(path, "Drop/p.png"),
            other => panic!("expected Released, got {:?}", other),
        }
    }
}
