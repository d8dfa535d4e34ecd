use eframe::egui;
use flipbook_async_runtime::{CommandSender, PageId, RuntimeError, SessionId, ViewerCommand};
use flipbook_core::{
    DeviceClass, FlipEventAdapter, HistorySink, NavigationTrigger, PageCatalog, PageWindow,
    SlotChange, ViewerOptions, WindowPolicy,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::views::PageView;

/// Delay between settling on a page and loading its neighbours
const PRELOAD_DELAY: Duration = Duration::from_millis(250);

/// The location bar: base path plus the `#page=N` fragment
#[derive(Debug, Clone, Default)]
pub struct LocationBar {
    pub base: String,
    pub hash: String,
}

impl LocationBar {
    pub fn location(&self) -> String {
        format!("{}{}", self.base, self.hash)
    }
}

impl HistorySink for LocationBar {
    fn replace_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }
}

/// One opened catalog on the UI side: the page window, its textures and
/// the widget state showing it.
pub struct ViewerSession {
    id: SessionId,
    adapter: FlipEventAdapter<PageWindow, LocationBar>,
    textures: HashMap<usize, egui::TextureHandle>,
    failed: HashMap<usize, String>,
    preload_due: Option<Instant>,
    pub view: PageView,
}

impl ViewerSession {
    pub fn new(
        id: SessionId,
        base_path: String,
        pages: Vec<PageId>,
        options: &ViewerOptions,
    ) -> Self {
        let window = PageWindow::new(PageCatalog::from_pages(pages));
        let location = LocationBar {
            base: base_path,
            hash: String::new(),
        };
        let adapter = FlipEventAdapter::from_options(window, location, options);
        let view = PageView::new(*adapter.policy(), adapter.total_pages());

        Self {
            id,
            adapter,
            textures: HashMap::new(),
            failed: HashMap::new(),
            preload_due: None,
            view,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_page(&self) -> usize {
        self.adapter.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.adapter.total_pages()
    }

    pub fn policy(&self) -> &WindowPolicy {
        self.adapter.policy()
    }

    pub fn location(&self) -> String {
        self.adapter.history().location()
    }

    pub fn loaded_count(&self) -> usize {
        self.adapter.store().loaded_count()
    }

    /// Indices currently on screen
    pub fn visible_indices(&self) -> Vec<usize> {
        self.policy()
            .visible_pages(self.current_page(), self.total_pages())
            .to_vec()
    }

    pub fn texture(&self, index: usize) -> Option<&egui::TextureHandle> {
        self.textures.get(&index)
    }

    pub fn failure(&self, index: usize) -> Option<&str> {
        self.failed.get(&index).map(String::as_str)
    }

    /// Loaded slots still waiting for pixels
    pub fn awaiting_pages(&self) -> bool {
        self.adapter
            .store()
            .loaded_indices()
            .any(|index| !self.textures.contains_key(&index) && !self.failed.contains_key(&index))
    }

    /// Feed one trigger through the adapter and forward slot changes to the worker
    pub fn navigate(
        &mut self,
        trigger: NavigationTrigger,
        commands: &CommandSender,
    ) -> Result<(), RuntimeError> {
        let Some(reconciliation) = self.adapter.handle(trigger) else {
            return Ok(());
        };

        self.view.set_current_page(reconciliation.page);
        self.preload_due = Some(Instant::now() + PRELOAD_DELAY);
        self.sync_window(commands)
    }

    /// Run the deferred preload once its delay has passed. Returns the time
    /// left until it is due.
    pub fn tick(&mut self, commands: &CommandSender) -> Result<Option<Duration>, RuntimeError> {
        let Some(due) = self.preload_due else {
            return Ok(None);
        };

        let now = Instant::now();
        if now < due {
            return Ok(Some(due - now));
        }

        self.preload_due = None;
        if self.adapter.apply_deferred_preload() > 0 {
            self.sync_window(commands)?;
        }
        Ok(None)
    }

    /// Switch device class and re-reconcile around the current page
    pub fn set_device_class(
        &mut self,
        device: DeviceClass,
        commands: &CommandSender,
    ) -> Result<(), RuntimeError> {
        self.adapter.set_device_class(device);
        let page = self.current_page();
        self.navigate(NavigationTrigger::FlipEnd { page }, commands)
    }

    pub fn keeps_all_pages(&self) -> bool {
        !self.adapter.eviction_enabled()
    }

    /// Load every page and stop evicting, or resume eviction around the
    /// current page
    pub fn set_keep_all_pages(
        &mut self,
        keep: bool,
        commands: &CommandSender,
    ) -> Result<(), RuntimeError> {
        if keep {
            self.adapter.load_everything();
            self.sync_window(commands)
        } else {
            self.adapter.set_eviction(true);
            let page = self.current_page();
            self.navigate(NavigationTrigger::FlipEnd { page }, commands)
        }
    }

    pub fn page_fetched(
        &mut self,
        ctx: &egui::Context,
        index: usize,
        width: usize,
        height: usize,
        rgba_data: &[u8],
    ) {
        // The slot may have been evicted while the fetch was in flight
        if !self.adapter.store().is_loaded(index) {
            log::debug!("Discarding pixels for evicted page {}", index + 1);
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied([width, height], rgba_data);
        let texture = ctx.load_texture(
            format!("page_{}", index),
            image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(index, texture);
        self.failed.remove(&index);
    }

    pub fn page_failed(&mut self, index: usize, message: String) {
        log::warn!("Page {}: {}", index + 1, message);
        if self.adapter.store().is_loaded(index) {
            self.failed.insert(index, message);
        }
    }

    pub fn close(&self, commands: &CommandSender) -> Result<(), RuntimeError> {
        commands.send(ViewerCommand::CloseSession { session: self.id })
    }

    fn sync_window(&mut self, commands: &CommandSender) -> Result<(), RuntimeError> {
        for change in self.adapter.store_mut().take_changes() {
            match change {
                SlotChange::Loaded { index, page } => {
                    self.failed.remove(&index);
                    if !self.textures.contains_key(&index) {
                        commands.send(ViewerCommand::FetchPage {
                            session: self.id,
                            index,
                            page,
                        })?;
                    }
                }
                SlotChange::Unloaded { index } => {
                    self.textures.remove(&index);
                    self.failed.remove(&index);
                }
            }
        }

        commands.send(ViewerCommand::Retain {
            session: self.id,
            resident: self.adapter.store().loaded_indices().collect(),
        })
    }
}

/// Install `next` as the open session, closing the one it replaces
pub fn replace_session(
    slot: &mut Option<ViewerSession>,
    next: ViewerSession,
    commands: &CommandSender,
) -> Result<(), RuntimeError> {
    let previous = slot.replace(next);
    match previous {
        Some(previous) => previous.close(commands),
        None => Ok(()),
    }
}
