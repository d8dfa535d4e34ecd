use crate::viewer::ViewerState;
use flipbook_async_runtime::{PageId, SessionId, ViewerUpdate};
use flipbook_core::AssetResolver;
use tokio::sync::mpsc;

pub async fn handle_fetch_page(
    session: SessionId,
    index: usize,
    page: PageId,
    state: &mut ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    let bytes = if let Some(cached) = state.get_from_cache(&page) {
        log::debug!("Page {} served from cache", page);
        cached.clone()
    } else if let Some(resolver) = state.get_resolver(&session) {
        match resolver.fetch(&page).await {
            Ok(bytes) => {
                state.add_to_cache(page.clone(), bytes.clone());
                bytes
            }
            Err(e) => {
                let _ = update_tx.send(ViewerUpdate::PageFailed {
                    session,
                    index,
                    message: format!("Failed to fetch {}: {}", page, e),
                });
                return;
            }
        }
    } else {
        // Session closed while the fetch was queued
        log::debug!("Dropping fetch of page {} for closed session {:?}", index, session);
        return;
    };

    // Decoding is CPU-bound, spawn blocking
    match tokio::task::spawn_blocking(move || {
        let image = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok::<_, image::ImageError>((image.into_raw(), width as usize, height as usize))
    })
    .await
    {
        Ok(Ok((rgba_data, width, height))) => {
            let _ = update_tx.send(ViewerUpdate::PageFetched {
                session,
                index,
                width,
                height,
                rgba_data,
            });
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(ViewerUpdate::PageFailed {
                session,
                index,
                message: format!("Failed to decode {}: {}", page, e),
            });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: format!("Task join error: {}", e),
            });
        }
    }
}
