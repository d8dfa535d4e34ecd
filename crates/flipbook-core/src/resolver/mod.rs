//! Existence checks and byte fetches for page resources.
//!
//! The catalog only needs [`AssetResolver::head_check`]; viewers use
//! [`AssetResolver::fetch`] to pull the bytes of pages that became resident.

mod fs;
#[cfg(feature = "http")]
mod http;

pub use fs::{FsResolver, content_type_for_path};
#[cfg(feature = "http")]
pub use http::HttpResolver;

use crate::types::*;
use std::future::Future;

/// Result of a metadata-only existence check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadCheck {
    /// Resource answered with a success status
    pub ok: bool,
    pub content_type: Option<String>,
}

impl HeadCheck {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn found(content_type: impl Into<String>) -> Self {
        Self {
            ok: true,
            content_type: Some(content_type.into()),
        }
    }

    /// True when the reported content type is an image type
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(is_image_content_type)
            .unwrap_or(false)
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .unwrap_or(false)
}

/// Source of page resources
pub trait AssetResolver {
    /// Check whether a page exists without transferring its body.
    /// Transport failures are reported as a missing page.
    fn head_check(&self, page: &PageId) -> impl Future<Output = HeadCheck> + Send;

    /// Fetch the full bytes of a page
    fn fetch(&self, page: &PageId) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Resolver picked from the shape of a catalog base location
#[derive(Debug, Clone)]
pub enum AnyResolver {
    #[cfg(feature = "http")]
    Http(HttpResolver),
    Fs(FsResolver),
}

impl AnyResolver {
    /// `http://` and `https://` bases go over the network, anything else is
    /// treated as a local directory.
    pub fn for_base(base: &str) -> Result<Self> {
        let lowered = base.trim().to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            #[cfg(feature = "http")]
            {
                HttpResolver::check_base(base)?;
                return Ok(AnyResolver::Http(HttpResolver::new()));
            }
            #[cfg(not(feature = "http"))]
            {
                return Err(FlipbookError::InvalidBase(format!(
                    "{base} (built without the http feature)"
                )));
            }
        }
        Ok(AnyResolver::Fs(FsResolver))
    }
}

impl AssetResolver for AnyResolver {
    fn head_check(&self, page: &PageId) -> impl Future<Output = HeadCheck> + Send {
        async move {
            match self {
                #[cfg(feature = "http")]
                AnyResolver::Http(resolver) => resolver.head_check(page).await,
                AnyResolver::Fs(resolver) => resolver.head_check(page).await,
            }
        }
    }

    fn fetch(&self, page: &PageId) -> impl Future<Output = Result<Vec<u8>>> + Send {
        async move {
            match self {
                #[cfg(feature = "http")]
                AnyResolver::Http(resolver) => resolver.fetch(page).await,
                AnyResolver::Fs(resolver) => resolver.fetch(page).await,
            }
        }
    }
}
