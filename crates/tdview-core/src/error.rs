use thiserror::Error;

#[derive(Error, Debug)]
pub enum TdviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TDMS file: {0}")]
    InvalidTdms(String),

    #[error("Unsupported TDMS data type: 0x{0:x}")]
    UnsupportedDataType(u32),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Metadata field '{field}' could not be read: {reason}")]
    MetadataParse { field: String, reason: String },

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Channel '{channel}' not found in group '{group}'")]
    ChannelNotFound { group: String, channel: String },

    #[error("Frame position (time {time}, z {z}) out of range ({time_steps} time steps x {z_stride} slices)")]
    IndexOutOfRange {
        time: usize,
        z: usize,
        time_steps: usize,
        z_stride: usize,
    },

    #[error("Insufficient samples: expected at least {expected}, got {actual}")]
    InsufficientSamples { expected: usize, actual: usize },

    #[error("Plane shape mismatch: {a:?} vs {b:?}")]
    ShapeMismatch { a: (usize, usize), b: (usize, usize) },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TdviewError>;
