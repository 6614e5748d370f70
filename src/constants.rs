//! Global constants for the gallery

/// Image extensions accepted during traversal (lowercase, without dots).
pub const SUPPORTED_IMAGE_FORMATS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "tiff", "tif",
];

/// Group label used for images that have no parent directory segment.
pub const ROOT_DIRECTORY_LABEL: &str = "根目录";

/// Entries returned per `read_entries` call by the native directory reader.
/// Same page size Chromium uses for `readEntries`.
pub const DIRECTORY_PAGE_SIZE: usize = 100;

/// Multiplicative step for zoom in / zoom out.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.2;

/// Smallest allowed viewer scale.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;

/// Largest allowed viewer scale.
pub const DEFAULT_MAX_SCALE: f64 = 5.0;

/// Scale applied by a double click on an unzoomed image.
pub const DEFAULT_DOUBLE_CLICK_SCALE: f64 = 2.0;

/// Minimum fuzzy score per query character for a search hit.
pub const MIN_SCORE_PER_QUERY_CHAR: i64 = 8;
