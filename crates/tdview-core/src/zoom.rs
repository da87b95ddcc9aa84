use crate::consts::{DEFAULT_ZOOM_STEP, MIN_ZOOM};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Direction of a scroll delta, `None` for no movement.
    pub fn from_scroll(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::In)
        } else if delta < 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}

/// Largest level at which the whole image still fits the viewport.
///
/// `viewport` and `image` are `[width, height]`.
pub fn max_zoom_level(viewport: [f32; 2], image: [usize; 2]) -> f32 {
    let fit_x = viewport[0] / image[0] as f32;
    let fit_y = viewport[1] / image[1] as f32;
    fit_x.min(fit_y).max(MIN_ZOOM)
}

/// Zoom by the default step.
pub fn zoom(level: f32, direction: ZoomDirection, viewport: [f32; 2], image: [usize; 2]) -> f32 {
    zoom_by(level, DEFAULT_ZOOM_STEP, direction, viewport, image)
}

/// One zoom step. The result stays within `[1.0, max_zoom_level]`.
pub fn zoom_by(
    level: f32,
    step: f32,
    direction: ZoomDirection,
    viewport: [f32; 2],
    image: [usize; 2],
) -> f32 {
    if image[0] == 0 || image[1] == 0 {
        return level;
    }
    match direction {
        ZoomDirection::In => (level * step).min(max_zoom_level(viewport, image)).max(MIN_ZOOM),
        ZoomDirection::Out => (level / step).max(MIN_ZOOM),
    }
}
