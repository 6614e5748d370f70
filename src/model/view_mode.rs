//! Grid/list presentation preference.

use serde::{Deserialize, Serialize};

/// Layout of the gallery listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Grid,
    List,
}

/// Thumbnail size used by the grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// View mode configuration. Pure UI preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewMode {
    #[serde(rename = "type")]
    pub kind: ViewKind,
    #[serde(rename = "gridSize")]
    pub grid_size: GridSize,
}

impl ViewMode {
    pub fn new(kind: ViewKind, grid_size: GridSize) -> Self {
        Self { kind, grid_size }
    }
}
