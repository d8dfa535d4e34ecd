use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlipbookError {
    #[error("No pages found under '{0}'")]
    NotFound(String),
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid base location: {0}")]
    InvalidBase(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, FlipbookError>;

/// Opaque locator of one page resource (a URL or a file path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PageId(String);

impl PageId {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(locator: &str) -> Self {
        Self::new(locator)
    }
}

impl From<String> for PageId {
    fn from(locator: String) -> Self {
        Self(locator)
    }
}

/// Materialization state of a single page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSlot {
    /// Placeholder; the page holds no resource reference
    #[default]
    Unloaded,
    Loaded(PageId),
}

impl PageSlot {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PageSlot::Loaded(_))
    }

    pub fn page(&self) -> Option<&PageId> {
        match self {
            PageSlot::Loaded(page) => Some(page),
            PageSlot::Unloaded => None,
        }
    }
}

/// Memory class of the device running the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceClass {
    /// Phones and other memory-constrained devices
    Constrained,
    #[default]
    Standard,
}

/// Keyboard navigation input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
}
