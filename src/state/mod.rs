//! Application state management modules.

mod browser;
mod viewer;

pub use browser::BrowserState;
pub use viewer::{FitMode, ViewerState};
