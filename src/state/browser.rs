//! The gallery's record list, selection and presentation flags.
//!
//! `BrowserState` is the sole owner of every [`ImageRecord`] and therefore of
//! every data handle. Handles are released when a record is removed, when the
//! list is cleared, when a duplicate is rejected, or when the state is dropped.

use std::collections::HashSet;

use crate::keybindings::{Key, KeyBindings, NavigationAction};
use crate::model::{DirectoryInfo, ImageRecord, ViewMode, group_by_directory};

/// Owning container of the loaded images.
#[derive(Debug, Default)]
pub struct BrowserState {
    images: Vec<ImageRecord>,
    /// Path of the selected record
    selected: Option<String>,
    view_mode: ViewMode,
    is_loading: bool,
    is_drag_over: bool,
    /// Bumped on every list mutation
    revision: u64,
    keybindings: KeyBindings,
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keybindings(keybindings: KeyBindings) -> Self {
        Self {
            keybindings,
            ..Self::default()
        }
    }

    /// Append records produced by a drop traversal.
    pub fn add_from_traversal(&mut self, records: Vec<ImageRecord>) -> usize {
        let added = self.append(records);
        log::info!("Added {} image(s) from drop", added);
        added
    }

    /// Append records produced by a file-input selection.
    pub fn add_from_selection(&mut self, records: Vec<ImageRecord>) -> usize {
        let added = self.append(records);
        log::info!("Added {} image(s) from file selection", added);
        added
    }

    fn append(&mut self, records: Vec<ImageRecord>) -> usize {
        let mut live: HashSet<String> = self.images.iter().map(|r| r.path().to_string()).collect();
        let before = self.images.len();

        for mut record in records {
            if live.insert(record.path().to_string()) {
                self.images.push(record);
            } else {
                log::warn!("Skipping duplicate image path: {}", record.path());
                record.release_data();
            }
        }

        let added = self.images.len() - before;
        if added > 0 {
            self.bump_revision();
        }
        added
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn total_images(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Directory grouping of the current list, recomputed on each call.
    pub fn directories(&self) -> Vec<DirectoryInfo<'_>> {
        group_by_directory(&self.images)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Select the record at `path`. Unknown paths are ignored.
    pub fn select_image(&mut self, path: &str) -> bool {
        if self.index_of(path).is_none() {
            log::debug!("Cannot select unknown image {}", path);
            return false;
        }
        self.selected = Some(path.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.as_deref().and_then(|path| self.index_of(path))
    }

    pub fn selected_image(&self) -> Option<&ImageRecord> {
        self.selected_index().map(|i| &self.images[i])
    }

    pub fn has_previous(&self) -> bool {
        self.selected_index().is_some_and(|i| i > 0)
    }

    pub fn has_next(&self) -> bool {
        self.selected_index().is_some_and(|i| i + 1 < self.images.len())
    }

    /// Select the record before the current one. No wraparound.
    pub fn previous_image(&mut self) -> bool {
        match self.selected_index() {
            Some(i) if i > 0 => self.select_index(i - 1),
            _ => false,
        }
    }

    /// Select the record after the current one. No wraparound.
    pub fn next_image(&mut self) -> bool {
        match self.selected_index() {
            Some(i) if i + 1 < self.images.len() => self.select_index(i + 1),
            _ => false,
        }
    }

    fn select_index(&mut self, index: usize) -> bool {
        match self.images.get(index) {
            Some(record) => {
                self.selected = Some(record.path().to_string());
                true
            }
            None => false,
        }
    }

    fn index_of(&self, path: &str) -> Option<usize> {
        self.images.iter().position(|r| r.path() == path)
    }

    /// Release and remove the record at `path`.
    ///
    /// If it was selected, the record now at its index (or the new last one)
    /// becomes selected; selection clears when the list becomes empty.
    pub fn remove_image(&mut self, path: &str) -> bool {
        let Some(index) = self.index_of(path) else {
            log::debug!("Cannot remove unknown image {}", path);
            return false;
        };

        let was_selected = self.selected.as_deref() == Some(path);
        let mut record = self.images.remove(index);
        record.release_data();
        self.bump_revision();
        log::debug!("Removed image {}", record.path());

        if was_selected {
            if self.images.is_empty() {
                self.selected = None;
            } else {
                self.select_index(index.min(self.images.len() - 1));
            }
        }
        true
    }

    /// Release every handle and empty the list.
    pub fn clear_all(&mut self) {
        let count = self.images.len();
        for record in &mut self.images {
            record.release_data();
        }
        self.images.clear();
        self.selected = None;
        self.bump_revision();
        log::info!("Cleared {} image(s)", count);
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn is_drag_over(&self) -> bool {
        self.is_drag_over
    }

    pub fn set_drag_over(&mut self, drag_over: bool) {
        self.is_drag_over = drag_over;
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Dispatch a key press while the viewer is open.
    ///
    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.selected.is_none() {
            return false;
        }
        match self.keybindings.action_for_key(key) {
            Some(NavigationAction::PreviousImage) => self.previous_image(),
            Some(NavigationAction::NextImage) => self.next_image(),
            Some(NavigationAction::ClearSelection) => {
                self.clear_selection();
                true
            }
            None => false,
        }
    }
}
