//! Geometry of one displayed frame.
//!
//! The sprite sheet is drawn at `scale` inside a clipping window the size of
//! one scaled tile, shifted so the wanted tile sits under the window's
//! top-left corner. This module only computes numbers; `render` applies them.

use std::sync::Arc;

use kurbo::{Point, Rect, Size};
use serde::Serialize;

use crate::config::{CorrectionMode, FitMode, PreviewOptions};
use crate::manifest::FrameDescriptor;
use crate::processing::aspect::{AspectCorrection, correct_aspect};
use crate::processing::layout::{aspect_ratio, center_offset, contain_scale, cover_scale};

/// Ratio gap between container and tile above which the blur backdrop shows.
pub const BLUR_GAP_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPolicy {
    pub animation: FitMode,
    pub correction: CorrectionMode,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            animation: FitMode::Contain,
            correction: CorrectionMode::AspectCorrected,
        }
    }
}

impl From<&PreviewOptions> for RenderPolicy {
    fn from(opts: &PreviewOptions) -> Self {
        Self {
            animation: opts.fit_mode.animation,
            correction: opts.correction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub sprite_url: Arc<str>,
    pub scale: f64,
    /// Clipping window, in container coordinates.
    pub window: Rect,
    /// Whole scaled sprite sheet, relative to the window.
    pub sprite: Rect,
    pub blur_visible: bool,
}

/// Computes where the window and the sprite sheet go for `frame`.
///
/// `cover` is the natural size of the cover image when it is loaded,
/// `sprite_natural` the natural size of the loaded sprite sheet.
pub fn compute_render_state(
    frame: &FrameDescriptor,
    cover: Option<Size>,
    container: Size,
    sprite_natural: Size,
    policy: RenderPolicy,
) -> RenderState {
    let correction = match policy.correction {
        CorrectionMode::AspectCorrected => correct_aspect(frame.size(), cover),
        CorrectionMode::None => AspectCorrection::identity(frame.size()),
    };
    let thumb = correction.thumb;

    let (scale, blur_visible) = match policy.animation {
        FitMode::Cover => (cover_scale(container, thumb), false),
        FitMode::Contain => {
            let gap = (aspect_ratio(container) - aspect_ratio(thumb)).abs();
            // An empty container has no ratio to compare against.
            let has_area = container.width > 0.0 && container.height > 0.0;
            let blur = policy.correction == CorrectionMode::AspectCorrected
                && has_area
                && gap > BLUR_GAP_TOLERANCE;
            (contain_scale(container, thumb), blur)
        }
    };

    let window_size = thumb * scale;
    let window = Rect::from_origin_size(center_offset(window_size, container), window_size);

    let origin = Point::new(
        -(f64::from(frame.x) + correction.offset.x) * scale,
        -(f64::from(frame.y) + correction.offset.y) * scale,
    );
    let sprite = Rect::from_origin_size(origin, sprite_natural * scale);

    RenderState {
        sprite_url: frame.sprite_url.clone(),
        scale,
        window,
        sprite,
        blur_visible,
    }
}
