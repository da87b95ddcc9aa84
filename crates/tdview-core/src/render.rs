use ndarray::{s, Array2, Array3};

use crate::consts::DISPLAY_CHANNEL_COUNT;
use crate::error::{Result, TdviewError};
use crate::index::FrameIndex;
use crate::planes::split_planes;
use crate::range::GlobalRange;

/// RGB8 image, shape = (height, width, 3).
pub type DisplayImage = Array3<u8>;

/// Map samples linearly from `[range.min, range.max]` onto `[0, 255]`.
///
/// A degenerate range yields an all-zero plane.
pub fn normalize(plane: &Array2<u16>, range: GlobalRange) -> Array2<u8> {
    if range.is_degenerate() {
        tracing::debug!(min = range.min, max = range.max, "Degenerate range; plane renders black");
        return Array2::zeros(plane.raw_dim());
    }
    let span = f64::from(range.span());
    plane.mapv(|v| {
        let offset = f64::from(v.clamp(range.min, range.max) - range.min);
        (offset / span * 255.0).round() as u8
    })
}

/// Stack two normalized planes into RGB: plane B in red, plane A in green,
/// blue left at zero.
pub fn compose(plane_a8: &Array2<u8>, plane_b8: &Array2<u8>) -> Result<DisplayImage> {
    if plane_a8.dim() != plane_b8.dim() {
        return Err(TdviewError::ShapeMismatch {
            a: plane_a8.dim(),
            b: plane_b8.dim(),
        });
    }
    let (h, w) = plane_a8.dim();
    let mut rgb = Array3::<u8>::zeros((h, w, DISPLAY_CHANNEL_COUNT));
    rgb.slice_mut(s![.., .., 0]).assign(plane_b8);
    rgb.slice_mut(s![.., .., 1]).assign(plane_a8);
    Ok(rgb)
}

/// Everything needed to draw one frame. Built fresh on every index change.
#[derive(Clone, Debug)]
pub struct RenderState {
    pub frame: FrameIndex,
    pub plane_a: Array2<u16>,
    pub plane_b: Array2<u16>,
    pub range: GlobalRange,
}

impl RenderState {
    /// Split a raw frame buffer into its planes.
    pub fn from_samples(
        frame: FrameIndex,
        samples: &[u16],
        width: usize,
        height: usize,
        range: GlobalRange,
    ) -> Result<Self> {
        let (plane_a, plane_b) = split_planes(samples, width, height)?;
        Ok(Self { frame, plane_a, plane_b, range })
    }

    /// `(width, height)` of each plane.
    pub fn size(&self) -> (usize, usize) {
        (self.plane_a.ncols(), self.plane_a.nrows())
    }

    pub fn compose(&self) -> Result<DisplayImage> {
        let a8 = normalize(&self.plane_a, self.range);
        let b8 = normalize(&self.plane_b, self.range);
        compose(&a8, &b8)
    }
}
