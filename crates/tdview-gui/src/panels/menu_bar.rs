use tdview_core::io::image_io::save_display_image;

use crate::app::TdviewApp;
use crate::messages::DialogResult;

pub fn show(ctx: &egui::Context, app: &mut TdviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Experiment...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_file(app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui.add_enabled(app.current.is_some(), egui::Button::new("Save Image As...").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    save_image(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset Zoom").clicked() {
                    ui.close();
                    app.viewport.reset_view();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_file(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            save_image(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_file(app: &mut TdviewApp) {
    let tx = app.dialog_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = crate::pick_experiment() {
            let _ = tx.send(DialogResult::OpenExperiment { path });
        }
    });
}

/// Save the frame on screen at the current zoom level.
fn save_image(app: &mut TdviewApp) {
    let Some(frame) = app.current.as_ref() else {
        return;
    };
    let image = frame.image.clone();
    let zoom = app.viewport.zoom;
    let file_name = format!("{}_t{}_z{}.png", app.session.params.name, frame.time, frame.z);
    let tx = app.dialog_tx.clone();

    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("TIFF", &["tiff", "tif"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return;
        };
        let result = match save_display_image(&image, zoom, &path) {
            Ok(()) => DialogResult::ImageSaved { path },
            Err(e) => DialogResult::Error {
                message: format!("{}: {e}", path.display()),
            },
        };
        let _ = tx.send(result);
    });
}
