//! Recursive traversal of a drag-and-drop payload.
//!
//! Every sibling at every level is processed concurrently and joined with
//! [`try_join_all`]: each branch returns its own records, and the first
//! failing branch fails the whole traversal. There is no partial result.
//!
//! ```rust,ignore
//! use drop_gallery::data::process_dropped_entries;
//!
//! let records = process_dropped_entries(entries, &probe).await?;
//! browser.add_from_traversal(records);
//! ```

use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, try_join_all};
use web_time::Instant;

use crate::data::builder::{create_image_record, with_dimensions};
use crate::data::{DimensionProbe, DirectoryReader, DropEntry, EntryKind};
use crate::error::{GalleryError, Result};
use crate::model::{ImageRecord, is_image_file};

/// Walk all dropped entries and collect records for every image found.
///
/// The order of the returned records is unspecified.
pub async fn process_dropped_entries<'a, E, P>(
    entries: Vec<E>,
    probe: &'a P,
) -> Result<Vec<ImageRecord>>
where
    E: DropEntry + 'a,
    P: DimensionProbe,
{
    let started = Instant::now();
    let top_level = entries.len();

    let branches = entries
        .into_iter()
        .map(|entry| process_entry(entry, String::new(), probe));
    let records: Vec<ImageRecord> = try_join_all(branches).await?.into_iter().flatten().collect();

    log::info!(
        "Traversed {} dropped entries: {} images in {:.1} ms",
        top_level,
        records.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(records)
}

/// Join a path prefix and an entry name (no leading slash at the root).
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

fn process_entry<'a, E, P>(
    entry: E,
    prefix: String,
    probe: &'a P,
) -> LocalBoxFuture<'a, Result<Vec<ImageRecord>>>
where
    E: DropEntry + 'a,
    P: DimensionProbe,
{
    async move {
        let name = entry.name();
        let full_path = join_path(&prefix, &name);

        match entry.kind() {
            EntryKind::File => {
                if !is_image_file(&name) {
                    log::trace!("Skipping non-image file {}", full_path);
                    return Ok(Vec::new());
                }
                let file = entry.file().await.map_err(|e| at_path(e, &full_path))?;
                let record = create_image_record(&file, Some(&full_path));
                Ok(vec![with_dimensions(record, probe).await])
            }
            EntryKind::Directory => {
                let children = read_all_entries(&entry, &full_path).await?;
                log::debug!("Directory {}: {} entries", full_path, children.len());

                let branches = children
                    .into_iter()
                    .map(|child| process_entry(child, full_path.clone(), probe));
                let nested = try_join_all(branches).await?;
                Ok(nested.into_iter().flatten().collect())
            }
        }
    }
    .boxed_local()
}

/// Drain a directory reader until it returns an empty page.
async fn read_all_entries<E: DropEntry>(entry: &E, path: &str) -> Result<Vec<E>> {
    let mut reader = entry.create_reader().map_err(|e| at_path(e, path))?;
    let mut entries = Vec::new();
    let mut pages = 0usize;

    loop {
        let page = reader.read_entries().await.map_err(|e| at_path(e, path))?;
        if page.is_empty() {
            break;
        }
        pages += 1;
        entries.extend(page);
    }

    log::trace!("Read {} in {} pages", path, pages);
    Ok(entries)
}

/// Replace the entry-local path of a read error with the accumulated one.
fn at_path(err: GalleryError, full_path: &str) -> GalleryError {
    match err {
        GalleryError::DirectoryRead { message, .. } => {
            GalleryError::directory_read(full_path, message)
        }
        GalleryError::FileRead { message, .. } => GalleryError::file_read(full_path, message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dimensions;
    use crate::test_support::{MemoryEntry, MemoryProbe};
    use std::collections::BTreeSet;

    fn run(entries: Vec<MemoryEntry>, probe: &MemoryProbe) -> Result<Vec<ImageRecord>> {
        pollster::block_on(process_dropped_entries(entries, probe))
    }

    fn path_set(records: &[ImageRecord]) -> BTreeSet<String> {
        records.iter().map(|r| r.path().to_string()).collect()
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "Photos"), "Photos");
        assert_eq!(join_path("Photos", "a.jpg"), "Photos/a.jpg");
        assert_eq!(join_path("Photos/Sub", "c.png"), "Photos/Sub/c.png");
    }

    #[test]
    fn test_dropped_folder_scenario() {
        let photos = MemoryEntry::dir(
            "Photos",
            vec![
                MemoryEntry::file("a.jpg"),
                MemoryEntry::file("b.txt"),
                MemoryEntry::dir("Sub", vec![MemoryEntry::file("c.png")]),
            ],
        );

        let records = run(vec![photos], &MemoryProbe::new()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            path_set(&records),
            BTreeSet::from(["Photos/a.jpg".to_string(), "Photos/Sub/c.png".to_string()])
        );
    }

    #[test]
    fn test_top_level_files_have_bare_paths() {
        let records = run(
            vec![MemoryEntry::file("x.gif"), MemoryEntry::file("y.doc")],
            &MemoryProbe::new(),
        )
        .unwrap();
        assert_eq!(path_set(&records), BTreeSet::from(["x.gif".to_string()]));
    }

    #[test]
    fn test_drains_paginated_directories() {
        let files: Vec<MemoryEntry> = (0..25)
            .map(|i| MemoryEntry::file(&format!("img{:02}.png", i)))
            .collect();
        let folder = MemoryEntry::dir("Big", files).with_page_size(4);

        let records = run(vec![folder], &MemoryProbe::new()).unwrap();
        assert_eq!(records.len(), 25);
        assert!(path_set(&records).contains("Big/img24.png"));
    }

    #[test]
    fn test_deep_nesting_counts_every_image() {
        // Depth 8 chain, two images and one non-image per level.
        let mut node = MemoryEntry::dir("L8", vec![MemoryEntry::file("leaf.jpg")]);
        for level in (0..8).rev() {
            node = MemoryEntry::dir(
                &format!("L{}", level),
                vec![
                    MemoryEntry::file("one.png"),
                    node,
                    MemoryEntry::file("two.JPEG"),
                    MemoryEntry::file("skip.md"),
                ],
            )
            .with_page_size(2);
        }

        let records = run(vec![node], &MemoryProbe::new()).unwrap();
        assert_eq!(records.len(), 8 * 2 + 1);
        assert_eq!(path_set(&records).len(), records.len());
        assert!(path_set(&records).contains("L0/L1/L2/L3/L4/L5/L6/L7/L8/leaf.jpg"));
    }

    #[test]
    fn test_result_independent_of_sibling_order() {
        let build = |reversed: bool| {
            let mut children = vec![
                MemoryEntry::file("a.png"),
                MemoryEntry::dir("X", vec![MemoryEntry::file("b.png"), MemoryEntry::file("c.png")]),
                MemoryEntry::dir(
                    "Y",
                    vec![MemoryEntry::dir("Z", vec![MemoryEntry::file("d.png")])],
                ),
            ];
            if reversed {
                children.reverse();
            }
            MemoryEntry::dir("Root", children).with_page_size(1)
        };

        let forward = run(vec![build(false)], &MemoryProbe::new()).unwrap();
        let backward = run(vec![build(true)], &MemoryProbe::new()).unwrap();
        assert_eq!(path_set(&forward), path_set(&backward));
        assert_eq!(forward.len(), 4);
    }

    #[test]
    fn test_dimension_failure_keeps_record() {
        let probe = MemoryProbe::new().with_size("mem://good.png", 10, 20);
        let records = run(
            vec![MemoryEntry::dir(
                "D",
                vec![MemoryEntry::file("good.png"), MemoryEntry::file("bad.png")],
            )],
            &probe,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        let good = records.iter().find(|r| r.name() == "good.png").unwrap();
        let bad = records.iter().find(|r| r.name() == "bad.png").unwrap();
        assert_eq!(good.dimensions(), Some(Dimensions::new(10, 20)));
        assert_eq!(bad.dimensions(), None);
    }

    #[test]
    fn test_unreadable_directory_fails_whole_traversal() {
        let tree = MemoryEntry::dir(
            "Root",
            vec![
                MemoryEntry::dir("Ok", vec![MemoryEntry::file("fine.png")]),
                MemoryEntry::dir("Locked", vec![MemoryEntry::file("hidden.png")]).failing(),
            ],
        );

        let err = run(vec![tree, MemoryEntry::file("top.png")], &MemoryProbe::new()).unwrap_err();
        match err {
            GalleryError::DirectoryRead { path, .. } => assert_eq!(path, "Root/Locked"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreadable_file_fails_whole_traversal() {
        let tree = MemoryEntry::dir(
            "Root",
            vec![MemoryEntry::file("fine.png"), MemoryEntry::file("gone.png").failing()],
        );
        let err = run(vec![tree], &MemoryProbe::new()).unwrap_err();
        match err {
            GalleryError::FileRead { path, .. } => assert_eq!(path, "Root/gone.png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failing_non_image_is_never_read() {
        let tree = MemoryEntry::dir(
            "Root",
            vec![MemoryEntry::file("fine.png"), MemoryEntry::file("notes.txt").failing()],
        );
        let records = run(vec![tree], &MemoryProbe::new()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_payload() {
        let records = run(Vec::new(), &MemoryProbe::new()).unwrap();
        assert!(records.is_empty());
    }
}
