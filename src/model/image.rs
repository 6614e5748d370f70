//! Image records and the resource handles they own.

use std::fmt;

use serde::Serialize;

use crate::constants::SUPPORTED_IMAGE_FORMATS;
use crate::error::{GalleryError, Result};

/// Get the lowercase extension of a file name (substring after the last `.`).
///
/// Returns an empty string when the name has no `.`.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Check if a file name has a supported image extension.
pub fn is_image_file(file_name: &str) -> bool {
    let extension = file_extension(file_name);
    SUPPORTED_IMAGE_FORMATS.contains(&extension.as_str())
}

/// Platform resource backing an image's bytes (object URL, file path, ...).
///
/// `release` consumes the resource, so it can only ever run once.
pub trait BlobResource: fmt::Debug {
    /// String the rendering layer loads the image from.
    fn locator(&self) -> &str;

    /// Give the underlying resource back to the platform.
    fn release(self: Box<Self>);
}

/// Single-owner handle to an image's bytes.
///
/// The resource is released on [`DataHandle::release`] or on drop, whichever
/// happens first.
#[derive(Debug)]
pub struct DataHandle {
    resource: Option<Box<dyn BlobResource>>,
}

impl DataHandle {
    /// Wrap a platform resource.
    pub fn new(resource: impl BlobResource + 'static) -> Self {
        Self {
            resource: Some(Box::new(resource)),
        }
    }

    /// Locator of the live resource, `None` once released.
    pub fn locator(&self) -> Option<&str> {
        self.resource.as_deref().map(BlobResource::locator)
    }

    /// Whether the resource has been released.
    pub fn is_released(&self) -> bool {
        self.resource.is_none()
    }

    /// Release the resource. Later calls are no-ops.
    pub fn release(&mut self) {
        if let Some(resource) = self.resource.take() {
            log::trace!("Releasing resource {}", resource.locator());
            resource.release();
        }
    }
}

impl Drop for DataHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One image available for viewing.
///
/// `path` is the identity key within a session. Dimensions start out absent
/// and are the only thing set after construction.
#[derive(Debug)]
pub struct ImageRecord {
    name: String,
    path: String,
    data: DataHandle,
    size_bytes: u64,
    last_modified_ms: i64,
    mime_type: String,
    extension: String,
    dimensions: Option<Dimensions>,
}

impl ImageRecord {
    /// Create a record without dimensions. The extension is derived from `name`.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        data: DataHandle,
        size_bytes: u64,
        last_modified_ms: i64,
        mime_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            extension: file_extension(&name),
            name,
            path: path.into(),
            data,
            size_bytes,
            last_modified_ms,
            mime_type: mime_type.into(),
            dimensions: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &DataHandle {
        &self.data
    }

    /// Locator the renderer should load, `None` once the handle is released.
    pub fn url(&self) -> Option<&str> {
        self.data.locator()
    }

    /// Locator of a live handle, or [`GalleryError::Released`] naming this record.
    pub fn live_url(&self) -> Result<&str> {
        self.url().ok_or_else(|| GalleryError::Released {
            path: self.path.clone(),
        })
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn last_modified_ms(&self) -> i64 {
        self.last_modified_ms
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|d| d.height)
    }

    pub(crate) fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = Some(dimensions);
    }

    pub(crate) fn release_data(&mut self) {
        self.data.release();
    }

    /// Serializable view of the record for the page.
    pub fn summary(&self) -> ImageSummary<'_> {
        ImageSummary {
            name: &self.name,
            path: &self.path,
            url: self.url(),
            size: self.size_bytes,
            last_modified: self.last_modified_ms,
            mime_type: &self.mime_type,
            extension: &self.extension,
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Borrowed, serializable snapshot of an [`ImageRecord`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary<'a> {
    pub name: &'a str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub size: u64,
    pub last_modified: i64,
    #[serde(rename = "type")]
    pub mime_type: &'a str,
    pub extension: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}
