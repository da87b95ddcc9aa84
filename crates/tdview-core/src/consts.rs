/// Depth slices per time step in the acquisition protocol.
pub const DEFAULT_Z_STRIDE: usize = 50;

/// Multiplicative zoom step applied per wheel notch.
pub const DEFAULT_ZOOM_STEP: f32 = 1.1;

/// Lower zoom bound (native image size).
pub const MIN_ZOOM: f32 = 1.0;

/// Group holding the frame, timestamp and piezo channels.
pub const DATA_GROUP: &str = "Data";

/// Prefix shared by all frame channels (`frame 0`, `frame 1`, ...).
pub const FRAME_CHANNEL_PREFIX: &str = "frame";

pub const TIMESTAMP_CHANNEL: &str = "timestamps (ns)";

pub const PIEZO_CHANNEL: &str = "PI pos (um)";

/// Extension of the measurement container next to the XML metadata.
pub const TDMS_EXTENSION: &str = "tdms";

/// Namespace of LabVIEW flattened-data XML.
pub const LVDATA_NAMESPACE: &str = "http://www.ni.com/LVData";

/// Nanoseconds per second, for timestamp conversion.
pub const NANOS_PER_SECOND: f64 = 1e9;

/// Number of planes in a composed display image (R, G, B).
pub const DISPLAY_CHANNEL_COUNT: usize = 3;

/// Minimum frame count to scan frames in parallel with Rayon.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Build the channel name of a frame.
pub fn frame_channel_name(prefix: &str, index: usize) -> String {
    format!("{prefix} {index}")
}
