use thiserror::Error;
use tokio::sync::mpsc;

// Re-export types from the core crate
pub use flipbook_core::{CatalogConfig, PageId};

/// Commands sent from UI to worker
#[derive(Debug, Clone)]
pub enum ViewerCommand {
    /// Discover the pages described by `config`; the worker assigns the session
    OpenCatalog { config: CatalogConfig },
    /// Fetch and decode one resident page
    FetchPage {
        session: SessionId,
        index: usize,
        page: PageId,
    },
    /// Indices resident after the latest navigation; queued fetches for
    /// other indices are dropped
    Retain {
        session: SessionId,
        resident: Vec<usize>,
    },
    CloseSession {
        session: SessionId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum ViewerUpdate {
    CatalogLoaded {
        session: SessionId,
        base_path: String,
        pages: Vec<PageId>,
    },
    PageFetched {
        session: SessionId,
        index: usize,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    PageFailed {
        session: SessionId,
        index: usize,
        message: String,
    },
    SessionClosed {
        session: SessionId,
    },
    Error {
        message: String,
    },
}

/// Handle to one opened catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Viewer worker has shut down")]
    WorkerGone,
}

/// UI-side handle for sending commands to the worker
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<ViewerCommand>,
}

impl CommandSender {
    pub fn send(&self, command: ViewerCommand) -> Result<(), RuntimeError> {
        self.tx.send(command).map_err(|_| RuntimeError::WorkerGone)
    }
}

/// Create the command and update channels connecting UI and worker
pub fn channels() -> (
    CommandSender,
    mpsc::UnboundedReceiver<ViewerCommand>,
    mpsc::UnboundedSender<ViewerUpdate>,
    mpsc::UnboundedReceiver<ViewerUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    (
        CommandSender { tx: command_tx },
        command_rx,
        update_tx,
        update_rx,
    )
}
