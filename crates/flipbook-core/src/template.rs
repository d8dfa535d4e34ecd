//! Per-page markup generated from a template with `{{imageUrl}}` and
//! `{{pageNumber}}` placeholders.

use crate::catalog::PageCatalog;
use crate::types::*;

pub const IMAGE_URL_PLACEHOLDER: &str = "{{imageUrl}}";
pub const PAGE_NUMBER_PLACEHOLDER: &str = "{{pageNumber}}";

const DEFAULT_TEMPLATE: &str =
    r#"<div class="page"><img src="{{imageUrl}}" alt="{{pageNumber}}" loading="lazy"></div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await?;
        if !source.contains(IMAGE_URL_PLACEHOLDER) {
            return Err(FlipbookError::Config(format!(
                "Template has no {IMAGE_URL_PLACEHOLDER} placeholder"
            )));
        }
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Markup for the page at 0-based `index`; the label reads "Page N"
    pub fn render(&self, page: &PageId, index: usize) -> String {
        self.source
            .replace(IMAGE_URL_PLACEHOLDER, page.as_str())
            .replace(PAGE_NUMBER_PLACEHOLDER, &format!("Page {}", index + 1))
    }

    /// Markup for every page, one per line
    pub fn render_catalog(&self, catalog: &PageCatalog) -> String {
        catalog
            .iter()
            .enumerate()
            .map(|(index, page)| self.render(page, index))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
