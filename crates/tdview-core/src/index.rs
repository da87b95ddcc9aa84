use std::fmt;

use crate::error::{Result, TdviewError};

/// Linear frame number: `time * z_stride + z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub usize);

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps (time, z) slider positions onto frame numbers of a z-stack series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLocator {
    pub z_stride: usize,
    pub time_steps: usize,
}

impl FrameLocator {
    pub fn new(z_stride: usize, time_steps: usize) -> Self {
        Self { z_stride, time_steps }
    }

    /// Locator covering `frame_count` frames; a partial last time step still
    /// gets a slider position.
    pub fn for_frame_count(z_stride: usize, frame_count: usize) -> Self {
        let time_steps = if z_stride == 0 {
            0
        } else {
            frame_count.div_ceil(z_stride)
        };
        Self { z_stride, time_steps }
    }

    pub fn locate(&self, time: usize, z: usize) -> Result<FrameIndex> {
        let out_of_range = || TdviewError::IndexOutOfRange {
            time,
            z,
            time_steps: self.time_steps,
            z_stride: self.z_stride,
        };
        if time >= self.time_steps || z >= self.z_stride {
            return Err(out_of_range());
        }
        time.checked_mul(self.z_stride)
            .and_then(|base| base.checked_add(z))
            .map(FrameIndex)
            .ok_or_else(out_of_range)
    }

    /// Inverse of [`locate`](Self::locate).
    pub fn unlocate(&self, index: FrameIndex) -> Option<(usize, usize)> {
        if self.z_stride == 0 {
            return None;
        }
        let (time, z) = (index.0 / self.z_stride, index.0 % self.z_stride);
        (time < self.time_steps).then_some((time, z))
    }

    pub fn frame_count(&self) -> usize {
        self.time_steps * self.z_stride
    }
}
