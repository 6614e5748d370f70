//! Browser implementation of the entry seams (WASM only).
//!
//! Wraps the `FileSystemEntry` API delivered by `DataTransferItem
//! .webkitGetAsEntry()`. Callback-style browser APIs are bridged to futures
//! by resolving a `js_sys::Promise` from the callbacks.

use js_sys::{Array, Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    DataTransferItemList, File, FileList, FileSystemDirectoryEntry, FileSystemDirectoryReader,
    FileSystemEntry, FileSystemFileEntry, HtmlImageElement, Url,
};

use crate::data::{DimensionProbe, DirectoryReader, DropEntry, EntryKind, SourceFile};
use crate::error::{GalleryError, Result};
use crate::model::{BlobResource, DataHandle, Dimensions, ImageRecord};

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Collect file-system entries from a drop payload, skipping non-file items.
pub fn entries_from_items(items: &DataTransferItemList) -> Vec<WebEntry> {
    let mut entries = Vec::new();
    for i in 0..items.length() {
        let Some(item) = items.get(i) else {
            continue;
        };
        if item.kind() != "file" {
            continue;
        }
        match item.webkit_get_as_entry() {
            Ok(Some(entry)) => entries.push(WebEntry(entry)),
            Ok(None) => log::debug!("Dropped item {} has no entry", i),
            Err(e) => log::warn!("Failed to get entry for dropped item {}: {}", i, js_message(&e)),
        }
    }
    entries
}

/// Collect files from a file input.
pub fn files_from_list(list: &FileList) -> Vec<WebFile> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(WebFile)
        .collect()
}

/// A dropped `FileSystemEntry`.
#[derive(Debug, Clone)]
pub struct WebEntry(FileSystemEntry);

impl DropEntry for WebEntry {
    type File = WebFile;
    type Reader = WebDirectoryReader;

    fn name(&self) -> String {
        self.0.name()
    }

    fn kind(&self) -> EntryKind {
        if self.0.is_directory() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    async fn file(&self) -> Result<WebFile> {
        let entry: &FileSystemFileEntry = self
            .0
            .dyn_ref()
            .ok_or_else(|| GalleryError::file_read(self.0.name(), "entry is not a file"))?;

        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            entry.file_with_callback_and_callback(&resolve, &reject);
        });
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| GalleryError::file_read(self.0.name(), js_message(&e)))?;
        let file: File = value
            .dyn_into()
            .map_err(|_| GalleryError::file_read(self.0.name(), "callback did not yield a File"))?;
        Ok(WebFile(file))
    }

    fn create_reader(&self) -> Result<WebDirectoryReader> {
        let entry: &FileSystemDirectoryEntry = self.0.dyn_ref().ok_or_else(|| {
            GalleryError::directory_read(self.0.name(), "entry is not a directory")
        })?;
        Ok(WebDirectoryReader {
            name: self.0.name(),
            reader: entry.create_reader(),
        })
    }
}

/// Wrapper over `FileSystemDirectoryReader.readEntries`.
#[derive(Debug)]
pub struct WebDirectoryReader {
    name: String,
    reader: FileSystemDirectoryReader,
}

impl DirectoryReader for WebDirectoryReader {
    type Entry = WebEntry;

    async fn read_entries(&mut self) -> Result<Vec<WebEntry>> {
        let mut scheduled = Ok(());
        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            scheduled = self
                .reader
                .read_entries_with_callback_and_callback(&resolve, &reject);
        });
        scheduled.map_err(|e| GalleryError::directory_read(self.name.clone(), js_message(&e)))?;

        let value = JsFuture::from(promise)
            .await
            .map_err(|e| GalleryError::directory_read(self.name.clone(), js_message(&e)))?;
        let page = Array::from(&value)
            .iter()
            .filter_map(|item| item.dyn_into::<FileSystemEntry>().ok())
            .map(WebEntry)
            .collect();
        Ok(page)
    }
}

/// A browser `File`.
#[derive(Debug, Clone)]
pub struct WebFile(File);

impl SourceFile for WebFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn relative_path(&self) -> Option<String> {
        let path = self.0.webkit_relative_path();
        (!path.is_empty()).then_some(path)
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }

    fn last_modified_ms(&self) -> i64 {
        self.0.last_modified() as i64
    }

    fn open_handle(&self) -> DataHandle {
        let locator = Url::create_object_url_with_blob(&self.0).unwrap_or_else(|e| {
            log::warn!(
                "Failed to create object URL for {}: {}",
                self.0.name(),
                js_message(&e)
            );
            String::new()
        });
        DataHandle::new(ObjectUrl { url: locator })
    }
}

/// Object URL created with `URL.createObjectURL`, revoked on release.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
}

impl BlobResource for ObjectUrl {
    fn locator(&self) -> &str {
        &self.url
    }

    fn release(self: Box<Self>) {
        if self.url.is_empty() {
            return;
        }
        if let Err(e) = Url::revoke_object_url(&self.url) {
            log::warn!("Failed to revoke {}: {}", self.url, js_message(&e));
        }
    }
}

/// Loads the object URL into an `<img>` and reads its natural size.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageElementProbe;

impl DimensionProbe for ImageElementProbe {
    async fn probe(&self, record: &ImageRecord) -> Result<Dimensions> {
        let url = record.live_url()?;
        if url.is_empty() {
            return Err(GalleryError::decode(record.name(), "no object URL"));
        }

        let image = HtmlImageElement::new().map_err(|e| GalleryError::Js(js_message(&e)))?;
        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(url);

        let loaded = JsFuture::from(promise).await;
        image.set_onload(None);
        image.set_onerror(None);
        loaded.map_err(|_| GalleryError::decode(record.name(), "Failed to load image"))?;

        Ok(Dimensions::new(image.natural_width(), image.natural_height()))
    }
}
