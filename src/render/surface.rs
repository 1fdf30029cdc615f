//! Boundary between the engine and whatever draws the preview.
//!
//! A surface owns three stacked layers inside a clipping container: the
//! static cover on top, a blurred copy of the cover at the bottom, and between
//! them a window that clips an oversized sprite sheet down to one tile.

use std::collections::HashMap;

use kurbo::{Rect, Size};
use media_model::MediaCustomization;
use tracing::trace;

use crate::config::{FitMode, FitPolicy};
use crate::processing::compose::RenderState;

/// Initial composition of the layer stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSetup {
    pub cover_url: String,
    pub cover_fit: FitMode,
    pub blur_visible: bool,
}

pub trait PreviewSurface {
    /// Container bounds in the coordinate space of pointer events.
    fn container_rect(&self) -> Rect;
    /// Natural size of the cover image, `None` until it has loaded.
    fn cover_natural_size(&self) -> Option<Size>;
    /// Natural size of the current sprite sheet, `None` until it has loaded.
    fn sprite_natural_size(&self) -> Option<Size>;
    fn sprite_source(&self) -> Option<&str>;
    fn blur_source(&self) -> Option<&str>;

    /// Replaces the container content with the layer stack.
    fn mount(&mut self, setup: &LayerSetup);
    fn set_cover_visible(&mut self, visible: bool);
    fn set_blur_visible(&mut self, visible: bool);
    fn set_blur_source(&mut self, url: &str);
    /// Starts loading a new sprite sheet.
    fn set_sprite_source(&mut self, url: &str);
    /// Shows the clipping window at `window` with the sheet placed at
    /// `sprite` (relative to the window).
    fn show_window(&mut self, window: Rect, sprite: Rect);
    fn hide_window(&mut self);
}

/// Resolves element identifiers to surfaces.
pub trait Document {
    type Surface: PreviewSurface;

    fn element_by_id(&mut self, id: &str) -> Option<Self::Surface>;
}

impl<S: PreviewSurface> Document for HashMap<String, S> {
    type Surface = S;

    fn element_by_id(&mut self, id: &str) -> Option<S> {
        self.remove(id)
    }
}

pub fn resolve_target<D: Document>(document: &mut D, id: &str) -> Option<D::Surface> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    document.element_by_id(id)
}

/// Composes the static cover stack. The blur backdrop starts visible only
/// when the cover itself is letterboxed (`contain`).
pub fn mount_layers<S: PreviewSurface + ?Sized>(
    surface: &mut S,
    customization: &MediaCustomization,
    fit: FitPolicy,
) {
    let setup = LayerSetup {
        cover_url: customization.cover_url().to_string(),
        cover_fit: fit.cover,
        blur_visible: fit.cover == FitMode::Contain,
    };
    surface.mount(&setup);
}

/// Puts a computed frame on screen and hides the cover.
pub fn apply_render_state<S: PreviewSurface + ?Sized>(surface: &mut S, state: &RenderState) {
    trace!(
        url = &*state.sprite_url,
        scale = state.scale,
        blur = state.blur_visible,
        "applying frame"
    );
    surface.set_blur_visible(state.blur_visible);
    surface.show_window(state.window, state.sprite);
    surface.set_cover_visible(false);
}

/// Back to the static cover.
pub fn restore_cover<S: PreviewSurface + ?Sized>(surface: &mut S, cover_url: &str, fit: FitPolicy) {
    surface.hide_window();
    surface.set_cover_visible(true);
    if fit.cover == FitMode::Contain {
        if surface.blur_source() != Some(cover_url) {
            surface.set_blur_source(cover_url);
        }
        surface.set_blur_visible(true);
    } else {
        surface.set_blur_visible(false);
    }
}
