//! Data models for the gallery.

mod directory;
mod image;
mod view_mode;

pub use directory::{DirectoryInfo, DirectorySummary, group_by_directory, parent_path};
pub use image::{
    BlobResource, DataHandle, Dimensions, ImageRecord, ImageSummary, file_extension,
    is_image_file,
};
pub use view_mode::{GridSize, ViewKind, ViewMode};
