use std::path::PathBuf;

/// Results sent back to the UI thread from file dialog threads.
pub enum DialogResult {
    /// User picked another experiment XML to open.
    OpenExperiment { path: PathBuf },

    /// Current image written to disk.
    ImageSaved { path: PathBuf },

    Error { message: String },
}
