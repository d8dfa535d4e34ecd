use eframe::egui;
use flipbook_core::{
    ArrowKey, FlipWidget, NavigationTrigger, WidgetCapabilities, WindowPolicy, Zoom, aspect_ratio,
    fit_page, fit_spread,
};
use std::collections::VecDeque;

use crate::session::ViewerSession;

/// Aspect ratio assumed for pages whose pixels have not arrived yet
const PLACEHOLDER_ASPECT: f32 = 0.7;

/// Widget state for the page display. Flips and key presses are queued as
/// navigation triggers and drained by the app after drawing.
pub struct PageView {
    policy: WindowPolicy,
    current_page: usize,
    total_pages: usize,
    zoom: Zoom,
    pending: VecDeque<NavigationTrigger>,
    pub hash_input: String,
}

impl PageView {
    pub fn new(policy: WindowPolicy, total_pages: usize) -> Self {
        Self {
            policy,
            current_page: 1,
            total_pages,
            zoom: Zoom::default(),
            pending: VecDeque::new(),
            hash_input: String::new(),
        }
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom.factor()
    }

    pub fn push(&mut self, trigger: NavigationTrigger) {
        self.pending.push_back(trigger);
    }

    pub fn take_pending(&mut self) -> Vec<NavigationTrigger> {
        self.pending.drain(..).collect()
    }

    fn flip_to(&mut self, page: usize) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.current_page {
            return;
        }
        self.push(NavigationTrigger::FlipStart { page });
        self.push(NavigationTrigger::FlipEnd { page });
    }
}

impl FlipWidget for PageView {
    fn flip_left(&mut self) {
        let page = self.policy.previous_page(self.current_page);
        self.flip_to(page);
    }

    fn flip_right(&mut self) {
        let page = self.policy.next_page(self.current_page);
        self.flip_to(page);
    }

    fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    fn capabilities(&self) -> WidgetCapabilities {
        let last_visible = self
            .policy
            .visible_pages(self.current_page, self.total_pages)
            .last()
            .unwrap_or(0);
        WidgetCapabilities {
            can_flip_left: self.current_page > 1,
            can_flip_right: last_visible + 1 < self.total_pages,
            can_zoom_in: self.zoom.can_zoom_in(),
            can_zoom_out: self.zoom.can_zoom_out(),
        }
    }
}

/// Queue arrow-key navigation unless a text field has focus
pub fn handle_keys(ctx: &egui::Context, view: &mut PageView) {
    if ctx.memory(|mem| mem.focused().is_some()) {
        return;
    }
    let (left, right) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::ArrowRight),
        )
    });
    if left {
        view.push(NavigationTrigger::Key(ArrowKey::Left));
    }
    if right {
        view.push(NavigationTrigger::Key(ArrowKey::Right));
    }
}

pub fn show_viewer(ui: &mut egui::Ui, session: &mut ViewerSession) {
    let caps = session.view.capabilities();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(caps.can_flip_left, egui::Button::new("◀ Previous"))
            .clicked()
        {
            session.view.flip_left();
        }

        ui.label(format!(
            "Page {} of {}",
            session.current_page(),
            session.total_pages()
        ));

        if ui
            .add_enabled(caps.can_flip_right, egui::Button::new("Next ▶"))
            .clicked()
        {
            session.view.flip_right();
        }

        ui.separator();

        if ui
            .add_enabled(caps.can_zoom_out, egui::Button::new("−"))
            .clicked()
        {
            session.view.zoom_out();
        }
        ui.label(format!("{:.0}%", session.view.zoom_factor() * 100.0));
        if ui
            .add_enabled(caps.can_zoom_in, egui::Button::new("+"))
            .clicked()
        {
            session.view.zoom_in();
        }

        ui.separator();

        ui.label("Go to:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut session.view.hash_input)
                .hint_text("#page=1")
                .desired_width(80.0),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            let hash = std::mem::take(&mut session.view.hash_input);
            session.view.push(NavigationTrigger::HashChange { hash });
        }
    });

    ui.horizontal(|ui| {
        ui.monospace(session.location());
        ui.separator();
        ui.label(format!(
            "{} of {} pages resident",
            session.loaded_count(),
            session.total_pages()
        ));
    });

    ui.separator();

    let visible = session.visible_indices();
    let zoom = session.view.zoom_factor();
    let available = ui.available_size();

    egui::ScrollArea::both().show(ui, |ui| {
        ui.horizontal_centered(|ui| {
            for &index in &visible {
                let aspect = session
                    .texture(index)
                    .and_then(|texture| {
                        let [width, height] = texture.size();
                        aspect_ratio(width as u32, height as u32)
                    })
                    .unwrap_or(PLACEHOLDER_ASPECT);

                let fitted = if visible.len() > 1 {
                    fit_spread(aspect, available.x, available.y)
                } else {
                    fit_page(aspect, available.x, available.y)
                };
                let Some(fitted) = fitted else {
                    continue;
                };
                let size = egui::vec2(fitted.width * zoom, fitted.height * zoom);

                if let Some(texture) = session.texture(index) {
                    ui.image((texture.id(), size));
                } else if let Some(message) = session.failure(index) {
                    ui.allocate_ui(size, |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.colored_label(ui.visuals().error_fg_color, message);
                        });
                    });
                } else {
                    ui.allocate_ui(size, |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.spinner();
                        });
                    });
                }
            }
        });
    });
}
