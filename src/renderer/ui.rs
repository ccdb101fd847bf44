use std::path::PathBuf;

use crate::app::{ModelViewerApp, UiAction};

const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(70, 140, 70);
const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 60, 60);

/// Panel widgets that are not part of the application state
#[derive(Debug, Default)]
pub struct PanelState {
    path_field: String,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Catalog list, upload form and status line. Returns the actions clicked this frame.
pub fn side_panel(
    ctx: &egui::Context,
    app: &mut ModelViewerApp,
    panel: &mut PanelState,
    width: f32,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::SidePanel::right("catalog_panel")
        .resizable(false)
        .exact_width(width)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Models");
                if ui.button("Refresh").clicked() {
                    actions.push(UiAction::Refresh);
                }
            });

            egui::ScrollArea::vertical()
                .id_salt("model_list")
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| {
                    if app.models().is_empty() {
                        ui.label(egui::RichText::new("No models").italics().color(egui::Color32::GRAY));
                    }
                    for id in app.models().entries() {
                        let selected = app.models().selected() == Some(id);
                        if ui.selectable_label(selected, id.as_str()).clicked() {
                            actions.push(UiAction::Select(id.clone()));
                        }
                    }
                });

            ui.separator();
            ui.heading("Upload");

            let staged = app
                .upload_state()
                .staged_file_name()
                .map(|name| format!("Staged: {}", name))
                .unwrap_or_else(|| "No file staged".to_string());
            ui.label(staged);

            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut panel.path_field).hint_text("path/to/model.gltf"));
                if ui.button("Open").clicked() {
                    let path = panel.path_field.trim();
                    if !path.is_empty() {
                        actions.push(UiAction::OpenFile(PathBuf::from(path)));
                    }
                }
            });

            ui.add(egui::TextEdit::singleline(app.upload_mut().id_field_mut()).hint_text("model id"));
            if ui.button("Submit").clicked() {
                actions.push(UiAction::Upload);
            }

            ui.separator();
            if let Some(status) = app.status() {
                let color = if status.is_error { STATUS_ERROR } else { STATUS_OK };
                ui.colored_label(color, &status.message);
            }
        });

    actions
}
