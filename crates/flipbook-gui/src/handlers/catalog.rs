use crate::viewer::ViewerState;
use flipbook_async_runtime::{CatalogConfig, ViewerUpdate};
use flipbook_core::{AnyResolver, PageCatalog};
use tokio::sync::mpsc;

pub async fn handle_open_catalog(
    config: CatalogConfig,
    state: &mut ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    if let Err(e) = config.validate() {
        let _ = update_tx.send(ViewerUpdate::Error {
            message: e.to_string(),
        });
        return;
    }

    let resolver = match AnyResolver::for_base(&config.base_path) {
        Ok(resolver) => resolver,
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: e.to_string(),
            });
            return;
        }
    };

    match PageCatalog::discover(&config, &resolver).await {
        Ok(catalog) => {
            let session = state.next_id();
            state.add_session(session, resolver);
            log::info!(
                "Opened session {:?} with {} pages from '{}'",
                session,
                catalog.len(),
                config.base_path
            );
            let _ = update_tx.send(ViewerUpdate::CatalogLoaded {
                session,
                base_path: config.base_path,
                pages: catalog.into_pages(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::Error {
                message: e.to_string(),
            });
        }
    }
}

pub async fn handle_close(
    session: flipbook_async_runtime::SessionId,
    state: &mut ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    state.remove_session(session);
    let _ = update_tx.send(ViewerUpdate::SessionClosed { session });
}
