//! Image record construction.

use crate::data::{DimensionProbe, SourceFile};
use crate::model::ImageRecord;

/// Build a record from a file handle.
///
/// Path resolution: `path` if given, else the file's non-empty relative
/// path, else its bare name. Never fails; dimensions are left unset.
pub fn create_image_record<F: SourceFile>(file: &F, path: Option<&str>) -> ImageRecord {
    let name = file.name();
    let path = path
        .map(str::to_owned)
        .or_else(|| file.relative_path().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| name.clone());

    ImageRecord::new(
        name,
        path,
        file.open_handle(),
        file.size(),
        file.last_modified_ms(),
        file.mime_type(),
    )
}

/// Probe the record's natural size.
///
/// A failed probe is logged and the record comes back without dimensions.
pub async fn with_dimensions<P: DimensionProbe>(
    mut record: ImageRecord,
    probe: &P,
) -> ImageRecord {
    match probe.probe(&record).await {
        Ok(dimensions) => {
            log::trace!(
                "{}: {}x{}",
                record.path(),
                dimensions.width,
                dimensions.height
            );
            record.set_dimensions(dimensions);
        }
        Err(e) => {
            log::warn!("Failed to get dimensions for {}: {}", record.name(), e);
        }
    }
    record
}

/// Build records for a file-input selection.
///
/// Only files whose MIME type starts with `image/` are kept. No dimension
/// probing happens here.
pub fn records_from_selection<F, I>(files: I) -> Vec<ImageRecord>
where
    F: SourceFile,
    I: IntoIterator<Item = F>,
{
    let records: Vec<ImageRecord> = files
        .into_iter()
        .filter(|file| file.mime_type().starts_with("image/"))
        .map(|file| create_image_record(&file, None))
        .collect();

    log::info!("Selected {} image files", records.len());
    records
}
