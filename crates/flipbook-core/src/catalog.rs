//! Page discovery by sequential existence checks.
//!
//! Pages follow the naming convention `<base>/<prefix><index><extension>`,
//! with the index zero-padded to a fixed width (`assets/page_00.jpg`,
//! `assets/page_01.jpg`, ...). Discovery walks the indices from zero and stops at
//! the first one that does not exist, so the catalog never has gaps.

use crate::resolver::{AssetResolver, HeadCheck};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hard ceiling on existence checks
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// How strictly an existence check is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExistenceCheck {
    /// Success status and an `image/*` content type
    #[default]
    ContentType,
    /// Success status only. Deprecated: catch-all servers answer 200 with an
    /// HTML page for any path, which makes the catalog run to `max_pages`.
    StatusOnly,
}

impl ExistenceCheck {
    pub fn confirms(self, check: &HeadCheck) -> bool {
        match self {
            ExistenceCheck::ContentType => check.ok && check.is_image(),
            ExistenceCheck::StatusOnly => check.ok,
        }
    }
}

/// Where pages live and how they are named
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogConfig {
    /// Directory or URL prefix holding the page files
    pub base_path: String,
    pub file_prefix: String,
    pub file_extension: String,
    /// Minimum number of digits of the page index
    pub number_padding: usize,
    pub max_pages: usize,
    pub existence_check: ExistenceCheck,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: "assets".to_string(),
            file_prefix: "page_".to_string(),
            file_extension: ".jpg".to_string(),
            number_padding: 2,
            max_pages: DEFAULT_MAX_PAGES,
            existence_check: ExistenceCheck::ContentType,
        }
    }
}

impl CatalogConfig {
    pub fn with_base(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Default::default()
        }
    }

    /// Locator of the page at `index` (0-based)
    pub fn page_id(&self, index: usize) -> PageId {
        let file_name = format!(
            "{}{:0width$}{}",
            self.file_prefix,
            index,
            self.file_extension,
            width = self.number_padding
        );
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() {
            PageId::new(file_name)
        } else {
            PageId::new(format!("{base}/{file_name}"))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_extension.is_empty() {
            return Err(FlipbookError::Config(
                "Page file extension must not be empty".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(FlipbookError::Config(
                "Page limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check for pages until the first missing index.
///
/// Returns an empty list when page 0 is missing; callers decide whether that
/// is fatal. A failed check counts as a missing page, so a flaky network can
/// truncate the result.
pub async fn discover<R: AssetResolver>(config: &CatalogConfig, resolver: &R) -> Vec<PageId> {
    let mut pages = Vec::new();

    for index in 0..config.max_pages {
        let page = config.page_id(index);
        let check = resolver.head_check(&page).await;

        if !config.existence_check.confirms(&check) {
            log::debug!(
                "Stopping at page {} ({}): ok={} content_type={:?}",
                index,
                page,
                check.ok,
                check.content_type
            );
            break;
        }

        log::trace!("Found page {}: {}", index, page);
        pages.push(page);
    }

    if pages.len() == config.max_pages {
        log::warn!(
            "Page discovery hit the limit of {} pages under '{}'",
            config.max_pages,
            config.base_path
        );
    }

    log::info!("Discovered {} pages under '{}'", pages.len(), config.base_path);
    pages
}

/// Ordered, gap-free list of pages for one viewing session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageCatalog {
    pages: Vec<PageId>,
}

impl PageCatalog {
    pub fn from_pages(pages: Vec<PageId>) -> Self {
        Self { pages }
    }

    /// Discover pages, failing with [`FlipbookError::NotFound`] when none exist
    pub async fn discover<R: AssetResolver>(config: &CatalogConfig, resolver: &R) -> Result<Self> {
        let pages = discover(config, resolver).await;
        if pages.is_empty() {
            return Err(FlipbookError::NotFound(config.base_path.clone()));
        }
        Ok(Self { pages })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page at a 0-based index
    pub fn get(&self, index: usize) -> Option<&PageId> {
        self.pages.get(index)
    }

    /// Page by 1-based page number
    pub fn page(&self, number: usize) -> Option<&PageId> {
        number.checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageId> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[PageId] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<PageId> {
        self.pages
    }
}

impl<'a> IntoIterator for &'a PageCatalog {
    type Item = &'a PageId;
    type IntoIter = std::slice::Iter<'a, PageId>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
