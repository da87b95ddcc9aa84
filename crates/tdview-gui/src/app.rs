use std::path::Path;
use std::sync::mpsc;

use tdview_core::config::ViewerConfig;
use tdview_core::pipeline::{RenderedFrame, Session};

use crate::convert::display_to_color_image;
use crate::messages::DialogResult;
use crate::panels;
use crate::states::{UIState, ViewportState};

pub struct TdviewApp {
    pub session: Session,
    pub config: ViewerConfig,
    pub dialog_tx: mpsc::Sender<DialogResult>,
    pub dialog_rx: mpsc::Receiver<DialogResult>,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    /// Last frame rendered successfully.
    pub current: Option<RenderedFrame>,
    pub show_about: bool,
}

impl TdviewApp {
    pub fn new(ctx: &egui::Context, session: Session, config: ViewerConfig) -> Self {
        let (dialog_tx, dialog_rx) = mpsc::channel();
        let mut app = Self {
            session,
            config,
            dialog_tx,
            dialog_rx,
            ui_state: UIState::default(),
            viewport: ViewportState::default(),
            current: None,
            show_about: false,
        };
        app.log_session();
        app.show_frame(ctx, 0, 0);
        app
    }

    /// Render the frame at (time, z) and put it on screen. On failure the
    /// previous image and labels stay.
    pub fn show_frame(&mut self, ctx: &egui::Context, time: usize, z: usize) {
        match self.session.render(time, z) {
            Ok(frame) => {
                self.update_viewport_texture(ctx, &frame);
                self.ui_state.set_frame_labels(&frame);
                self.current = Some(frame);
            }
            Err(e) => {
                tracing::error!(time, z, error = %e, "Render failed");
                self.ui_state.add_log(format!("ERROR: t={time} z={z}: {e}"));
            }
        }
    }

    fn update_viewport_texture(&mut self, ctx: &egui::Context, frame: &RenderedFrame) {
        let image = display_to_color_image(&frame.image);
        let size = image.size;
        let texture = ctx.load_texture("viewport", image, egui::TextureOptions::NEAREST);
        self.viewport.texture = Some(texture);
        self.viewport.image_size = Some(size);
        self.viewport.viewing_label = format!("t={} z={}", frame.time, frame.z);
    }

    fn log_session(&mut self) {
        let s = &self.session;
        self.ui_state.add_log(format!(
            "Opened: {} ({}x{}, {} frames, range {}..{})",
            s.params.name,
            s.params.pixels_x,
            s.params.pixels_y,
            s.dataset.frame_count(),
            s.range.min,
            s.range.max
        ));
        if s.range.is_degenerate() {
            self.ui_state
                .add_log("All frames share one value; images render black".into());
        }
    }

    /// Replace the open session. A failed open keeps the current one.
    fn open_experiment(&mut self, ctx: &egui::Context, path: &Path) {
        match Session::open(path, &self.config) {
            Ok(session) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                    "tdview - {}",
                    session.params.name
                )));
                self.session = session;
                self.current = None;
                self.ui_state.time = 0;
                self.ui_state.z = 0;
                self.viewport.reset_view();
                self.log_session();
                self.show_frame(ctx, 0, 0);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Open failed");
                self.ui_state
                    .add_log(format!("ERROR: {}: {e}", path.display()));
            }
        }
    }

    /// Drain results of file dialogs.
    fn poll_dialogs(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.dialog_rx.try_recv() {
            match result {
                DialogResult::OpenExperiment { path } => self.open_experiment(ctx, &path),
                DialogResult::ImageSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                DialogResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
            }
        }
    }
}

impl eframe::App for TdviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_dialogs(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        if self.show_about {
            egui::Window::new("About tdview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("tdview");
                        ui.label("Two-channel TDMS image stack viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
