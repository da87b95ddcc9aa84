use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{Result, TdviewError};

/// Session-wide sample range used to normalize every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalRange {
    pub min: u16,
    pub max: u16,
}

impl GlobalRange {
    /// Range spanning both values, in either order.
    pub fn new(a: u16, b: u16) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Range of a single buffer, `None` when it is empty.
    pub fn of(samples: &[u16]) -> Option<Self> {
        let first = *samples.first()?;
        Some(samples.iter().fold(Self::new(first, first), |r, &v| Self {
            min: r.min.min(v),
            max: r.max.max(v),
        }))
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> u16 {
        self.max - self.min
    }

    /// `min == max`: normalization has nothing to stretch.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

fn merge_opt(a: Option<GlobalRange>, b: Option<GlobalRange>) -> Option<GlobalRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Min and max over every sample of every frame buffer.
pub fn compute_range<I, S>(frames: I) -> Result<GlobalRange>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u16]>,
{
    frames
        .into_iter()
        .map(|f| GlobalRange::of(f.as_ref()))
        .fold(None, merge_opt)
        .ok_or(TdviewError::EmptySequence)
}

/// Like [`compute_range`], loading `count` frames through `load`.
///
/// Frames are scanned in parallel once there are enough of them; the result
/// does not depend on scan order.
pub fn compute_range_with<F>(count: usize, load: F) -> Result<GlobalRange>
where
    F: Fn(usize) -> Result<Vec<u16>> + Sync,
{
    let scan = |i: usize| load(i).map(|samples| GlobalRange::of(&samples));

    let range = if count >= PARALLEL_FRAME_THRESHOLD {
        (0..count)
            .into_par_iter()
            .map(scan)
            .try_reduce(|| None, |a, b| Ok(merge_opt(a, b)))?
    } else {
        (0..count).map(scan).try_fold(None, |acc, r| r.map(|r| merge_opt(acc, r)))?
    };
    range.ok_or(TdviewError::EmptySequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_bounds() {
        assert_eq!(GlobalRange::new(9, 3), GlobalRange { min: 3, max: 9 });
    }

    #[test]
    fn empty_buffers_are_skipped() {
        let frames: Vec<Vec<u16>> = vec![vec![], vec![5, 2], vec![]];
        assert_eq!(compute_range(&frames).unwrap(), GlobalRange::new(2, 5));
    }

    #[test]
    fn all_empty_is_an_error() {
        let frames: Vec<Vec<u16>> = vec![vec![], vec![]];
        assert!(matches!(compute_range(&frames), Err(TdviewError::EmptySequence)));
    }
}
