use ndarray::Array2;

use crate::error::{Result, TdviewError};

/// Split a packed two-channel buffer into plane A and plane B.
///
/// The first `width * height` samples form plane A and the next
/// `width * height` form plane B, each reshaped row-major to
/// `(height, width)`. Samples past `2 * width * height` are ignored.
pub fn split_planes(
    buffer: &[u16],
    width: usize,
    height: usize,
) -> Result<(Array2<u16>, Array2<u16>)> {
    if width == 0 || height == 0 {
        return Err(TdviewError::InvalidDimensions { width, height });
    }
    let plane_len = width
        .checked_mul(height)
        .ok_or(TdviewError::InvalidDimensions { width, height })?;
    let expected = plane_len
        .checked_mul(2)
        .ok_or(TdviewError::InvalidDimensions { width, height })?;
    if buffer.len() < expected {
        return Err(TdviewError::InsufficientSamples {
            expected,
            actual: buffer.len(),
        });
    }

    let (a, b) = buffer[..expected].split_at(plane_len);
    let shape = (height, width);
    let plane_a = Array2::from_shape_vec(shape, a.to_vec())
        .map_err(|_| TdviewError::InvalidDimensions { width, height })?;
    let plane_b = Array2::from_shape_vec(shape, b.to_vec())
        .map_err(|_| TdviewError::InvalidDimensions { width, height })?;
    Ok((plane_a, plane_b))
}
