//! Error types for gallery operations.

use thiserror::Error;

/// Errors that can occur while loading, probing or configuring the gallery.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// A directory page could not be read during traversal
    #[error("Failed to read directory '{path}': {message}")]
    DirectoryRead {
        /// Accumulated path of the directory
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A dropped file entry could not be turned into a readable file
    #[error("Failed to read file '{path}': {message}")]
    FileRead {
        /// Accumulated path of the file
        path: String,
        /// Description of the failure
        message: String,
    },

    /// The image bytes could not be decoded for dimension probing
    #[error("Failed to decode image '{name}': {message}")]
    Decode {
        /// Display name of the image
        name: String,
        /// Description of the decode failure
        message: String,
    },

    /// The resource handle was already released
    #[error("Resource handle for '{path}' was already released")]
    Released {
        /// Path of the record owning the handle
        path: String,
    },

    /// Configuration content is structurally valid but semantically wrong
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during native file system access
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A browser API call was rejected
    #[error("Browser API error: {0}")]
    Js(String),
}

impl GalleryError {
    /// Create a directory read error.
    pub fn directory_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file read error.
    pub fn file_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GalleryError>;
