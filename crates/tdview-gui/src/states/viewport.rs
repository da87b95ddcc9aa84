use tdview_core::consts::MIN_ZOOM;

/// Viewport display state.
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Native image size `[width, height]`.
    pub image_size: Option<[usize; 2]>,
    pub zoom: f32,
    pub pan_offset: egui::Vec2,
    pub viewing_label: String,
}

impl ViewportState {
    /// Back to native size, centered.
    pub fn reset_view(&mut self) {
        self.zoom = MIN_ZOOM;
        self.pan_offset = egui::Vec2::ZERO;
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: None,
            zoom: MIN_ZOOM,
            pan_offset: egui::Vec2::ZERO,
            viewing_label: String::new(),
        }
    }
}
