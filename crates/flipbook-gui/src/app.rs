use eframe::egui;
use flipbook_async_runtime::{CommandSender, ViewerCommand, ViewerUpdate};
use flipbook_core::{CatalogConfig, DeviceClass, NavigationTrigger, ViewerOptions, split_location};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::session::{ViewerSession, replace_session};
use crate::views::{handle_keys, show_diagnostics, show_viewer};

/// Poll interval while pages are still on their way from the worker
const FETCH_POLL: Duration = Duration::from_millis(50);

pub struct FlipbookApp {
    options: ViewerOptions,
    location_input: String,
    status: String,
    low_memory: bool,
    show_diagnostics: bool,
    logger: AppLogger,

    // Async infrastructure
    commands: CommandSender,
    update_rx: mpsc::UnboundedReceiver<ViewerUpdate>,

    session: Option<ViewerSession>,
    /// Hash the pending catalog was opened with
    pending_deep_link: Option<String>,

    _tokio_handle: tokio::runtime::Handle,
}

impl FlipbookApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        options: ViewerOptions,
        logger: AppLogger,
    ) -> Self {
        let (commands, command_rx, update_tx, update_rx) = flipbook_async_runtime::channels();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            location_input: options.catalog.base_path.clone(),
            low_memory: options.device_class == DeviceClass::Constrained,
            options,
            status: String::new(),
            show_diagnostics: false,
            logger,
            commands,
            update_rx,
            session: None,
            pending_deep_link: None,
            _tokio_handle: tokio_handle,
        }
    }

    fn open_location(&mut self) {
        let location = self.location_input.trim().to_string();
        let (base, hash) = split_location(&location);

        if let Some(session) = self.session.take() {
            self.report(session.close(&self.commands));
        }

        let mut config = self.options.catalog.clone();
        config.base_path = base.to_string();
        self.pending_deep_link = hash.map(str::to_string);
        self.status = format!("Looking for pages in '{}'...", base);
        let result = self.commands.send(ViewerCommand::OpenCatalog { config });
        self.report(result);
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: ViewerUpdate) {
        match update {
            ViewerUpdate::CatalogLoaded {
                session,
                base_path,
                pages,
            } => {
                let mut options = self.options.clone();
                options.device_class = self.device_class();
                let mut viewer = ViewerSession::new(session, base_path, pages, &options);
                self.status = format!("Found {} pages", viewer.total_pages());

                let deep_link = self.pending_deep_link.take();
                let mounted = viewer.navigate(NavigationTrigger::Mount { deep_link }, &self.commands);
                // A slower, earlier open may have installed a session meanwhile
                let replaced = replace_session(&mut self.session, viewer, &self.commands);
                self.report(mounted.and(replaced));
            }
            ViewerUpdate::PageFetched {
                session,
                index,
                width,
                height,
                rgba_data,
            } => {
                if let Some(viewer) = self.session.as_mut().filter(|v| v.id() == session) {
                    viewer.page_fetched(ctx, index, width, height, &rgba_data);
                }
            }
            ViewerUpdate::PageFailed {
                session,
                index,
                message,
            } => {
                if let Some(viewer) = self.session.as_mut().filter(|v| v.id() == session) {
                    viewer.page_failed(index, message);
                }
            }
            ViewerUpdate::SessionClosed { session } => {
                log::debug!("Session {:?} closed", session);
            }
            ViewerUpdate::Error { message } => {
                log::error!("{}", message);
                self.status = format!("Error: {message}");
            }
        }
    }

    fn device_class(&self) -> DeviceClass {
        if self.low_memory {
            DeviceClass::Constrained
        } else {
            DeviceClass::Standard
        }
    }

    fn report(&mut self, result: Result<(), flipbook_async_runtime::RuntimeError>) {
        if let Err(e) = result {
            log::error!("{}", e);
            self.status = format!("Error: {e}");
        }
    }

    fn show_location_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Pages:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.location_input)
                    .hint_text("assets or https://example.com/book#page=3")
                    .desired_width(360.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Browse...").clicked() {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.location_input = path.display().to_string();
                    self.open_location();
                }
            }
            if submitted || ui.button("Open").clicked() {
                self.open_location();
            }

            ui.separator();

            if ui
                .checkbox(&mut self.low_memory, "Low memory mode")
                .changed()
            {
                let device = self.device_class();
                if let Some(viewer) = self.session.as_mut() {
                    let result = viewer.set_device_class(device, &self.commands);
                    self.report(result);
                }
            }

            if let Some(viewer) = self.session.as_mut() {
                let mut keep_all = viewer.keeps_all_pages();
                if ui
                    .checkbox(&mut keep_all, "Keep all pages loaded")
                    .on_hover_text("Load every page and stop evicting pages outside the window")
                    .changed()
                {
                    let result = viewer.set_keep_all_pages(keep_all, &self.commands);
                    self.report(result);
                }
            }

            ui.toggle_value(&mut self.show_diagnostics, "Log");
        });
    }
}

impl eframe::App for FlipbookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        egui::TopBottomPanel::top("location").show(ctx, |ui| {
            self.show_location_bar(ui);
        });

        if self.show_diagnostics {
            egui::TopBottomPanel::bottom("diagnostics")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| show_diagnostics(ui, &self.logger));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(viewer) = self.session.as_mut() {
                handle_keys(ctx, &mut viewer.view);
                show_viewer(ui, viewer);
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.heading("Flipbook Viewer");
                    ui.add_space(20.0);
                    ui.label(format!(
                        "Enter a folder or URL holding {} ...",
                        example_file_names(&self.options.catalog)
                    ));
                });
            }

            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });

        // Run queued navigation and the deferred preload
        let mut results = Vec::new();
        let mut repaint_after = None;
        if let Some(viewer) = self.session.as_mut() {
            for trigger in viewer.view.take_pending() {
                results.push(viewer.navigate(trigger, &self.commands));
            }
            match viewer.tick(&self.commands) {
                Ok(wait) => repaint_after = wait,
                Err(e) => results.push(Err(e)),
            }
            if viewer.awaiting_pages() {
                repaint_after = Some(repaint_after.map_or(FETCH_POLL, |wait| wait.min(FETCH_POLL)));
            }
        }
        for result in results {
            self.report(result);
        }
        if let Some(wait) = repaint_after {
            ctx.request_repaint_after(wait);
        }
    }
}

/// First page file names discovery checks, e.g. "page_00.jpg, page_01.jpg,"
fn example_file_names(config: &CatalogConfig) -> String {
    let config = CatalogConfig {
        base_path: String::new(),
        ..config.clone()
    };
    format!("{}, {},", config.page_id(0), config.page_id(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_names_start_at_index_zero() {
        assert_eq!(
            example_file_names(&CatalogConfig::default()),
            "page_00.jpg, page_01.jpg,"
        );

        let config = CatalogConfig {
            file_prefix: "scan-".to_string(),
            file_extension: ".png".to_string(),
            number_padding: 3,
            ..Default::default()
        };
        assert_eq!(example_file_names(&config), "scan-000.png, scan-001.png,");
    }
}
