//! Error types for the layout engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the surface-layout library.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// DPI must be a positive, finite number.
    #[error("Invalid DPI {0}: must be a positive finite number")]
    InvalidDpi(f64),

    /// Page size name is not in the standard table.
    #[error("Unknown page size '{0}'. Supported: A0-A6, B0-B6, Letter, Legal, Tabloid")]
    UnknownPageSize(String),

    /// Custom page dimensions must be positive.
    #[error("Invalid page size {width_mm}mm x {height_mm}mm: dimensions must be positive")]
    InvalidPageSize { width_mm: f64, height_mm: f64 },

    /// The resolved pixel surface has no area.
    #[error("Surface resolves to an empty pixel extent {width}x{height}")]
    EmptySurface { width: u32, height: u32 },

    /// Element id is not registered with the engine.
    #[error("Unknown element '{0}'")]
    UnknownElement(String),

    /// Element id is already registered with the engine.
    #[error("Element id '{0}' is already in use")]
    DuplicateId(String),

    /// Parent element id is not registered with the engine.
    #[error("Unknown parent element '{0}'")]
    UnknownParent(String),

    /// Layout document does not exist.
    #[error("Layout document not found: {0}")]
    FileNotFound(PathBuf),

    /// Layout document could not be parsed.
    #[error("Failed to parse layout document '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// Any other I/O failure while reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Layout document could not be encoded.
    #[error("Failed to serialize layout document: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Broad classification of a [`LayoutError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller-supplied configuration (DPI, page size, grid).
    Configuration,
    /// Reference to an element id that does or does not exist.
    Reference,
    /// Reading or writing a layout document failed.
    Io,
}

impl LayoutError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::InvalidDpi(_)
            | LayoutError::UnknownPageSize(_)
            | LayoutError::InvalidPageSize { .. }
            | LayoutError::EmptySurface { .. }
            | LayoutError::InvalidConfig(_) => ErrorKind::Configuration,
            LayoutError::UnknownElement(_)
            | LayoutError::DuplicateId(_)
            | LayoutError::UnknownParent(_) => ErrorKind::Reference,
            LayoutError::FileNotFound(_)
            | LayoutError::ParseError { .. }
            | LayoutError::Io(_)
            | LayoutError::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Whether a host should offer the user to try the action again.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Io
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, LayoutError>;
