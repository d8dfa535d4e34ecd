use super::{AssetResolver, HeadCheck};
use crate::types::*;
use std::path::Path;

/// Resolves pages stored in a local directory
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl AssetResolver for FsResolver {
    async fn head_check(&self, page: &PageId) -> HeadCheck {
        match tokio::fs::metadata(page.as_str()).await {
            Ok(metadata) if metadata.is_file() => HeadCheck {
                ok: true,
                content_type: content_type_for_path(Path::new(page.as_str()))
                    .map(str::to_string),
            },
            Ok(_) => HeadCheck::missing(),
            Err(e) => {
                log::trace!("No page at {}: {}", page, e);
                HeadCheck::missing()
            }
        }
    }

    async fn fetch(&self, page: &PageId) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(page.as_str()).await?)
    }
}

/// Guess a MIME type from the file extension, the way a static file server would
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => return None,
    };
    Some(content_type)
}
