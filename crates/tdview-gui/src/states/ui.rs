use tdview_core::pipeline::RenderedFrame;

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    /// Slider positions.
    pub time: usize,
    pub z: usize,

    /// Labels of the frame on screen.
    pub frame_label: String,
    pub timestamp_label: String,
    pub piezo_label: String,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn set_frame_labels(&mut self, frame: &RenderedFrame) {
        self.frame_label = format!("Frame: {}", frame.index);
        self.timestamp_label = match frame.timestamp_s {
            Some(t) => format!("Timestamp: {t:.2} s"),
            None => "Timestamp: n/a".into(),
        };
        self.piezo_label = match frame.piezo_um {
            Some(p) => format!("Piezo Position: {p}"),
            None => "Piezo Position: n/a".into(),
        };
    }
}
