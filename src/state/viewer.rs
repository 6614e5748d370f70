//! Pan/zoom state of the image viewer.
//!
//! Every mutation funnels through [`ViewerState::commit`], which enforces the
//! one invariant of this state: at scale ≤ 1 the image is never translated.

use serde::{Deserialize, Serialize};

use crate::config::ViewerSettings;
use crate::zoom_math::Transform;

/// Advisory fit tag for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Contain,
    Width,
    Height,
    Original,
}

impl FitMode {
    /// Cycle order used by [`ViewerState::toggle_fit_mode`].
    pub const CYCLE: [FitMode; 4] = [
        FitMode::Contain,
        FitMode::Width,
        FitMode::Height,
        FitMode::Original,
    ];

    /// The mode after this one in the cycle.
    pub fn next(self) -> FitMode {
        let index = Self::CYCLE.iter().position(|m| *m == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Contain => "contain",
            FitMode::Width => "width",
            FitMode::Height => "height",
            FitMode::Original => "original",
        }
    }
}

/// Pointer position and translation captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start_x: f64,
    start_y: f64,
    start_translate_x: f64,
    start_translate_y: f64,
}

/// Zoom, pan and fit state for the image being viewed.
#[derive(Debug, Clone)]
pub struct ViewerState {
    transform: Transform,
    fit_mode: FitMode,
    drag: Option<DragSession>,
    settings: ViewerSettings,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl ViewerState {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            transform: Transform::identity(),
            fit_mode: FitMode::default(),
            drag: None,
            settings,
        }
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        (self.transform.translate_x, self.transform.translate_y)
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Replace the zoom settings, re-clamping the current scale.
    pub fn set_settings(&mut self, settings: ViewerSettings) {
        self.settings = settings;
        let scale = self
            .transform
            .scale
            .clamp(self.settings.min_scale, self.settings.max_scale);
        self.commit(self.transform.with_scale(scale));
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// CSS transform for the image element.
    pub fn image_transform(&self) -> String {
        self.transform.to_css()
    }

    pub fn zoom_in(&mut self) {
        let next = self
            .transform
            .zoom_in(self.settings.zoom_factor, self.settings.max_scale);
        self.commit(next);
    }

    pub fn zoom_out(&mut self) {
        let next = self
            .transform
            .zoom_out(self.settings.zoom_factor, self.settings.min_scale);
        self.commit(next);
    }

    /// Back to scale 1, no translation, `contain` fit.
    pub fn reset_view(&mut self) {
        self.reset_with(FitMode::Contain);
    }

    /// Back to scale 1 without translation, keeping the fit mode.
    pub fn reset_transform(&mut self) {
        self.drag = None;
        self.commit(Transform::identity());
    }

    pub fn fit_to_window(&mut self) {
        self.reset_with(FitMode::Contain);
    }

    pub fn fit_to_width(&mut self) {
        self.reset_with(FitMode::Width);
    }

    pub fn fit_to_height(&mut self) {
        self.reset_with(FitMode::Height);
    }

    pub fn original_size(&mut self) {
        self.reset_with(FitMode::Original);
    }

    /// Advance to the next fit mode and reset the transform.
    pub fn toggle_fit_mode(&mut self) {
        self.reset_with(self.fit_mode.next());
    }

    /// Mouse wheel: scrolling up zooms in, anything else zooms out.
    pub fn handle_wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_in();
        } else {
            self.zoom_out();
        }
    }

    /// Begin a drag at the pointer position. Only possible while zoomed in.
    ///
    /// Returns whether a drag started; the caller registers its move/release
    /// listeners only in that case.
    pub fn start_drag(&mut self, x: f64, y: f64) -> bool {
        if self.transform.scale <= 1.0 {
            return false;
        }
        self.drag = Some(DragSession {
            start_x: x,
            start_y: y,
            start_translate_x: self.transform.translate_x,
            start_translate_y: self.transform.translate_y,
        });
        true
    }

    /// Move the active drag to the pointer position. No-op without a drag.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag else {
            return;
        };
        let next = self.transform.with_translate(
            drag.start_translate_x + (x - drag.start_x),
            drag.start_translate_y + (y - drag.start_y),
        );
        self.commit(next);
    }

    /// Finish the active drag.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Scale 1 zooms to the double-click scale; any other scale resets.
    pub fn handle_double_click(&mut self) {
        if self.transform.scale == 1.0 {
            let scale = self
                .settings
                .double_click_scale
                .clamp(self.settings.min_scale, self.settings.max_scale);
            self.commit(self.transform.with_scale(scale));
        } else {
            self.reset_view();
        }
    }

    fn reset_with(&mut self, fit_mode: FitMode) {
        self.fit_mode = fit_mode;
        self.commit(Transform::identity());
    }

    /// Single write path for the transform.
    fn commit(&mut self, transform: Transform) {
        self.transform = if transform.scale <= 1.0 && transform.is_translated() {
            log::trace!("Scale {} ≤ 1, dropping translation", transform.scale);
            transform.with_translate(0.0, 0.0)
        } else {
            transform
        };
    }
}
