use eframe::egui;
use log::Level;

use crate::logger::AppLogger;

pub fn show_diagnostics(ui: &mut egui::Ui, logger: &AppLogger) {
    ui.horizontal(|ui| {
        ui.heading("Log");
        if ui.button("Clear").clicked() {
            logger.clear();
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in logger.get_entries() {
                let color = match entry.level {
                    Level::Error => ui.visuals().error_fg_color,
                    Level::Warn => ui.visuals().warn_fg_color,
                    _ => ui.visuals().text_color(),
                };
                ui.colored_label(
                    color,
                    format!(
                        "{} {:<5} {}: {}",
                        entry.timestamp.format("%H:%M:%S%.3f"),
                        entry.level,
                        entry.target,
                        entry.message
                    ),
                );
            }
        });
}
