//! Directory grouping of image records.
//!
//! Directories are never stored: [`group_by_directory`] derives them from the
//! current image list each time they are needed.

use serde::Serialize;

use crate::constants::ROOT_DIRECTORY_LABEL;
use crate::model::ImageRecord;

/// Images sharing one parent path.
#[derive(Debug, Clone)]
pub struct DirectoryInfo<'a> {
    /// Last path segment, or the root label
    pub name: String,
    /// Grouping key: the parent path, or the root label
    pub path: String,
    /// Members in input order
    pub images: Vec<&'a ImageRecord>,
    /// Always `images.len()`
    pub total_images: usize,
}

// Members compare by identity.
impl PartialEq for DirectoryInfo<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.total_images == other.total_images
            && self.images.len() == other.images.len()
            && self
                .images
                .iter()
                .zip(&other.images)
                .all(|(a, b)| std::ptr::eq(*a, *b))
    }
}

impl DirectoryInfo<'_> {
    /// Whether this group collects images without a parent segment.
    pub fn is_root(&self) -> bool {
        self.path == ROOT_DIRECTORY_LABEL
    }

    /// Serializable view listing member paths.
    pub fn summary(&self) -> DirectorySummary<'_> {
        DirectorySummary {
            name: &self.name,
            path: &self.path,
            total_images: self.total_images,
            images: self.images.iter().map(|image| image.path()).collect(),
        }
    }
}

/// Serializable snapshot of a [`DirectoryInfo`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySummary<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub total_images: usize,
    pub images: Vec<&'a str>,
}

/// Grouping key of an image path: everything before the last `/`.
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or(ROOT_DIRECTORY_LABEL)
}

/// Group images by parent path.
///
/// Groups appear in the order their key is first seen in `images`.
pub fn group_by_directory(images: &[ImageRecord]) -> Vec<DirectoryInfo<'_>> {
    let mut directories: Vec<DirectoryInfo<'_>> = Vec::new();

    for image in images {
        let key = parent_path(image.path());
        match directories.iter_mut().find(|dir| dir.path == key) {
            Some(dir) => {
                dir.images.push(image);
                dir.total_images += 1;
            }
            None => directories.push(DirectoryInfo {
                name: directory_name(key).to_string(),
                path: key.to_string(),
                images: vec![image],
                total_images: 1,
            }),
        }
    }

    directories
}

fn directory_name(key: &str) -> &str {
    if key == ROOT_DIRECTORY_LABEL {
        return key;
    }
    match key.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => key,
    }
}
