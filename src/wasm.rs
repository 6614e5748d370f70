//! Browser entry point and the `WebGallery` facade exported to JavaScript.
//!
//! The page owns rendering and forwards DOM events here. Records and
//! selection live in a shared `BrowserState` so drop traversals can finish
//! after the event handler has returned.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{DragEvent, FileList, KeyboardEvent};

use crate::config::{GalleryConfig, LogLevel};
use crate::data::web::{ImageElementProbe, entries_from_items, files_from_list};
use crate::data::{process_dropped_entries, records_from_selection};
use crate::format::{format_file_size, format_timestamp};
use crate::keybindings::Key;
use crate::logging;
use crate::model::{DirectorySummary, ImageSummary, ViewMode};
use crate::search::{SearchIndex, SearchOptionsUpdate};
use crate::state::{BrowserState, ViewerState};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init(LogLevel::default());
    log::info!("Drop Gallery WASM started");
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Human readable size, e.g. `1.5 KB`.
#[wasm_bindgen(js_name = formatFileSize)]
pub fn format_file_size_js(bytes: f64) -> String {
    format_file_size(bytes.max(0.0) as u64)
}

/// Local date and time of a millisecond timestamp.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date_js(millis: f64) -> String {
    format_timestamp(millis as i64)
}

/// Gallery state driven by the page.
#[wasm_bindgen]
pub struct WebGallery {
    browser: Rc<RefCell<BrowserState>>,
    viewer: ViewerState,
    search: SearchIndex,
}

impl Default for WebGallery {
    fn default() -> Self {
        Self::new()
    }
}

impl WebGallery {
    fn with_config(config: &GalleryConfig) -> Self {
        let mut browser = BrowserState::with_keybindings(config.keybindings.clone());
        browser.set_view_mode(config.preferences.view_mode);
        logging::set_level(config.preferences.log_level);

        Self {
            browser: Rc::new(RefCell::new(browser)),
            viewer: ViewerState::new(config.viewer),
            search: SearchIndex::new(config.preferences.search),
        }
    }

    /// Reset zoom and pan when the selected image changed. The fit mode stays.
    fn after_navigation(&mut self, changed: bool) -> bool {
        if changed {
            self.viewer.reset_transform();
        }
        changed
    }
}

#[wasm_bindgen]
impl WebGallery {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGallery {
        Self::with_config(&GalleryConfig::new())
    }

    /// Build a gallery from exported configuration JSON.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WebGallery, JsValue> {
        let config = GalleryConfig::from_json(json).map_err(to_js)?;
        log::info!("Loaded configuration for {}", config.app_name);
        Ok(Self::with_config(&config))
    }

    /// Current settings as configuration JSON.
    #[wasm_bindgen(js_name = exportConfig)]
    pub fn export_config(&self) -> Result<String, JsValue> {
        let browser = self.browser.borrow();
        let mut config = GalleryConfig::new();
        config.preferences.view_mode = browser.view_mode();
        config.preferences.search = self.search.options();
        config.viewer = *self.viewer.settings();
        config.keybindings = browser.keybindings().clone();
        config.to_json().map_err(to_js)
    }

    // ---- Drag and drop ----

    #[wasm_bindgen(js_name = handleDragOver)]
    pub fn handle_drag_over(&self, event: &DragEvent) {
        event.prevent_default();
        self.browser.borrow_mut().set_drag_over(true);
    }

    #[wasm_bindgen(js_name = handleDragLeave)]
    pub fn handle_drag_leave(&self, event: &DragEvent) {
        event.prevent_default();
        self.browser.borrow_mut().set_drag_over(false);
    }

    /// Traverse a drop payload. Resolves to the number of images added.
    ///
    /// Entries are taken from the event synchronously; the browser empties
    /// the payload once the handler returns.
    #[wasm_bindgen(js_name = handleDrop)]
    pub fn handle_drop(&self, event: &DragEvent) -> Promise {
        event.prevent_default();
        let entries = event
            .data_transfer()
            .map(|transfer| entries_from_items(&transfer.items()))
            .unwrap_or_default();
        {
            let mut browser = self.browser.borrow_mut();
            browser.set_drag_over(false);
            browser.set_loading(true);
        }
        log::info!("Processing {} dropped item(s)", entries.len());

        let browser = Rc::clone(&self.browser);
        future_to_promise(async move {
            let probe = ImageElementProbe;
            let result = process_dropped_entries(entries, &probe).await;

            let mut browser = browser.borrow_mut();
            browser.set_loading(false);
            match result {
                Ok(records) => Ok(JsValue::from(browser.add_from_traversal(records) as u32)),
                Err(e) => {
                    log::error!("Failed to process dropped files: {}", e);
                    Err(to_js(e))
                }
            }
        })
    }

    /// Add images picked with a file input. Returns the number added.
    #[wasm_bindgen(js_name = handleFileSelect)]
    pub fn handle_file_select(&self, files: &FileList) -> u32 {
        let records = records_from_selection(files_from_list(files));
        self.browser.borrow_mut().add_from_selection(records) as u32
    }

    // ---- Browser state ----

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.browser.borrow().is_loading()
    }

    #[wasm_bindgen(js_name = isDragOver)]
    pub fn is_drag_over(&self) -> bool {
        self.browser.borrow().is_drag_over()
    }

    #[wasm_bindgen(js_name = totalImages)]
    pub fn total_images(&self) -> u32 {
        self.browser.borrow().total_images() as u32
    }

    /// Search results as a JSON array of image summaries.
    #[wasm_bindgen(js_name = imagesJson)]
    pub fn images_json(&mut self) -> Result<String, JsValue> {
        let browser = self.browser.borrow();
        let hits = self.search.filter(browser.images(), browser.revision());
        let summaries: Vec<ImageSummary<'_>> = hits.iter().map(|image| image.summary()).collect();
        serde_json::to_string(&summaries).map_err(to_js)
    }

    /// Directory groups as a JSON array.
    #[wasm_bindgen(js_name = directoriesJson)]
    pub fn directories_json(&self) -> Result<String, JsValue> {
        let browser = self.browser.borrow();
        let directories = browser.directories();
        let summaries: Vec<DirectorySummary<'_>> =
            directories.iter().map(|dir| dir.summary()).collect();
        serde_json::to_string(&summaries).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectedImageJson)]
    pub fn selected_image_json(&self) -> Result<Option<String>, JsValue> {
        let browser = self.browser.borrow();
        browser
            .selected_image()
            .map(|image| serde_json::to_string(&image.summary()))
            .transpose()
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectImage)]
    pub fn select_image(&mut self, path: &str) -> bool {
        let changed = self.browser.borrow_mut().select_image(path);
        self.after_navigation(changed)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.browser.borrow_mut().clear_selection();
        self.viewer.end_drag();
    }

    #[wasm_bindgen(js_name = hasPrevious)]
    pub fn has_previous(&self) -> bool {
        self.browser.borrow().has_previous()
    }

    #[wasm_bindgen(js_name = hasNext)]
    pub fn has_next(&self) -> bool {
        self.browser.borrow().has_next()
    }

    #[wasm_bindgen(js_name = previousImage)]
    pub fn previous_image(&mut self) -> bool {
        let changed = self.browser.borrow_mut().previous_image();
        self.after_navigation(changed)
    }

    #[wasm_bindgen(js_name = nextImage)]
    pub fn next_image(&mut self) -> bool {
        let changed = self.browser.borrow_mut().next_image();
        self.after_navigation(changed)
    }

    #[wasm_bindgen(js_name = removeImage)]
    pub fn remove_image(&mut self, path: &str) -> bool {
        let (removed, selection_changed) = {
            let mut browser = self.browser.borrow_mut();
            let before = browser.selected_path().map(str::to_owned);
            let removed = browser.remove_image(path);
            (removed, browser.selected_path() != before.as_deref())
        };
        self.after_navigation(selection_changed);
        removed
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) {
        self.browser.borrow_mut().clear_all();
        self.viewer.reset_view();
    }

    #[wasm_bindgen(js_name = viewModeJson)]
    pub fn view_mode_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.browser.borrow().view_mode()).map_err(to_js)
    }

    /// Set the view mode from JSON like `{"type":"grid","gridSize":"large"}`.
    #[wasm_bindgen(js_name = setViewMode)]
    pub fn set_view_mode(&self, json: &str) -> Result<(), JsValue> {
        let mode: ViewMode = serde_json::from_str(json).map_err(to_js)?;
        self.browser.borrow_mut().set_view_mode(mode);
        Ok(())
    }

    /// Route a key press through the navigation keybindings.
    ///
    /// Returns whether the key was consumed.
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&mut self, event: &KeyboardEvent) -> bool {
        let Some(key) = Key::from_dom_key(&event.key()) else {
            return false;
        };
        let consumed = self.browser.borrow_mut().handle_key(key);
        if consumed {
            event.prevent_default();
            self.viewer.reset_transform();
        }
        consumed
    }

    // ---- Search ----

    #[wasm_bindgen(js_name = setSearchQuery)]
    pub fn set_search_query(&mut self, query: &str) {
        self.search.set_query(query);
    }

    #[wasm_bindgen(js_name = clearSearch)]
    pub fn clear_search(&mut self) {
        self.search.clear_query();
    }

    /// Merge a partial options object such as `{"includeExtension":false}`.
    #[wasm_bindgen(js_name = updateSearchOptions)]
    pub fn update_search_options(&mut self, json: &str) -> Result<(), JsValue> {
        let update: SearchOptionsUpdate = serde_json::from_str(json).map_err(to_js)?;
        self.search.update_options(update);
        Ok(())
    }

    #[wasm_bindgen(js_name = searchStatsJson)]
    pub fn search_stats_json(&mut self) -> Result<String, JsValue> {
        let browser = self.browser.borrow();
        let stats = self.search.stats(browser.images(), browser.revision());
        serde_json::to_string(&stats).map_err(to_js)
    }

    // ---- Viewer ----

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.viewer.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.viewer.zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.viewer.reset_view();
    }

    #[wasm_bindgen(js_name = fitToWindow)]
    pub fn fit_to_window(&mut self) {
        self.viewer.fit_to_window();
    }

    #[wasm_bindgen(js_name = fitToWidth)]
    pub fn fit_to_width(&mut self) {
        self.viewer.fit_to_width();
    }

    #[wasm_bindgen(js_name = fitToHeight)]
    pub fn fit_to_height(&mut self) {
        self.viewer.fit_to_height();
    }

    #[wasm_bindgen(js_name = originalSize)]
    pub fn original_size(&mut self) {
        self.viewer.original_size();
    }

    #[wasm_bindgen(js_name = toggleFitMode)]
    pub fn toggle_fit_mode(&mut self) {
        self.viewer.toggle_fit_mode();
    }

    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&mut self, delta_y: f64) {
        self.viewer.handle_wheel(delta_y);
    }

    /// Returns whether a drag started; only then should move/up listeners be added.
    #[wasm_bindgen(js_name = startDrag)]
    pub fn start_drag(&mut self, x: f64, y: f64) -> bool {
        self.viewer.start_drag(x, y)
    }

    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&mut self, x: f64, y: f64) {
        self.viewer.drag_to(x, y);
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&mut self) {
        self.viewer.end_drag();
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.viewer.is_dragging()
    }

    #[wasm_bindgen(js_name = handleDoubleClick)]
    pub fn handle_double_click(&mut self) {
        self.viewer.handle_double_click();
    }

    /// CSS `transform` value for the image element.
    #[wasm_bindgen(js_name = imageTransform)]
    pub fn image_transform(&self) -> String {
        self.viewer.image_transform()
    }

    #[wasm_bindgen(js_name = fitMode)]
    pub fn fit_mode(&self) -> String {
        self.viewer.fit_mode().as_str().to_string()
    }

    pub fn scale(&self) -> f64 {
        self.viewer.scale()
    }
}
