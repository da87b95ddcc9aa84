use crate::app::TdviewApp;

/// Time and depth sliders plus the labels of the frame on screen.
pub fn show(ctx: &egui::Context, app: &mut TdviewApp) {
    let locator = app.session.locator;
    let mut time = app.ui_state.time;
    let mut z = app.ui_state.z;

    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.add_space(4.0);
        let mut changed = false;

        egui::Grid::new("sliders").num_columns(2).show(ui, |ui| {
            ui.label("Time");
            changed |= ui
                .add_enabled(
                    locator.time_steps > 1,
                    egui::Slider::new(&mut time, 0..=locator.time_steps.saturating_sub(1)),
                )
                .changed();
            ui.end_row();

            ui.label("Z");
            changed |= ui
                .add_enabled(
                    locator.z_stride > 1,
                    egui::Slider::new(&mut z, 0..=locator.z_stride.saturating_sub(1)),
                )
                .changed();
            ui.end_row();
        });

        ui.horizontal(|ui| {
            ui.label(&app.ui_state.frame_label);
            ui.separator();
            ui.label(&app.ui_state.timestamp_label);
            ui.separator();
            ui.label(&app.ui_state.piezo_label);
        });
        ui.add_space(4.0);

        if changed {
            app.ui_state.time = time;
            app.ui_state.z = z;
            app.show_frame(ctx, time, z);
        }
    });
}
