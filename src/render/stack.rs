use kurbo::{Rect, Size};
use serde::Serialize;

use crate::config::FitMode;
use crate::render::surface::{LayerSetup, PreviewSurface};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverLayer {
    pub source: String,
    pub fit: Option<FitMode>,
    pub visible: bool,
    pub natural: Option<Size>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlurLayer {
    pub source: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpriteLayer {
    pub source: Option<String>,
    pub natural: Option<Size>,
    /// Clipping window in container coordinates.
    pub window: Option<Rect>,
    /// Sheet placement relative to the window.
    pub placement: Option<Rect>,
    pub visible: bool,
}

/// In-memory layer stack.
///
/// Records exactly what a DOM-like host would show. Image loads are driven by
/// the owner through [`LayerStack::finish_cover_load`] and
/// [`LayerStack::finish_sprite_load`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStack {
    container: Rect,
    mounted: bool,
    pub cover: CoverLayer,
    pub blur: BlurLayer,
    pub sprite: SpriteLayer,
    /// How many times a sprite source was assigned.
    pub sprite_assignments: usize,
}

impl LayerStack {
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            ..Default::default()
        }
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(Rect::new(0.0, 0.0, width, height))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn finish_cover_load(&mut self, natural: Size) {
        self.cover.natural = Some(natural);
    }

    /// Marks the current sprite source as loaded. Returns `false` when no
    /// source is assigned.
    pub fn finish_sprite_load(&mut self, natural: Size) -> bool {
        if self.sprite.source.is_none() {
            return false;
        }
        self.sprite.natural = Some(natural);
        true
    }

    /// True when nothing but the static cover (and possibly its blur) shows.
    pub fn shows_static_cover(&self) -> bool {
        self.cover.visible && !self.sprite.visible
    }
}

impl PreviewSurface for LayerStack {
    fn container_rect(&self) -> Rect {
        self.container
    }

    fn cover_natural_size(&self) -> Option<Size> {
        self.cover.natural
    }

    fn sprite_natural_size(&self) -> Option<Size> {
        self.sprite.natural
    }

    fn sprite_source(&self) -> Option<&str> {
        self.sprite.source.as_deref()
    }

    fn blur_source(&self) -> Option<&str> {
        Some(self.blur.source.as_str()).filter(|s| !s.is_empty())
    }

    fn mount(&mut self, setup: &LayerSetup) {
        if self.cover.source != setup.cover_url {
            self.cover.natural = None;
        }
        self.cover.source = setup.cover_url.clone();
        self.cover.fit = Some(setup.cover_fit);
        self.cover.visible = true;
        self.blur = BlurLayer {
            source: setup.cover_url.clone(),
            visible: setup.blur_visible,
        };
        self.sprite = SpriteLayer::default();
        self.mounted = true;
    }

    fn set_cover_visible(&mut self, visible: bool) {
        self.cover.visible = visible;
    }

    fn set_blur_visible(&mut self, visible: bool) {
        self.blur.visible = visible;
    }

    fn set_blur_source(&mut self, url: &str) {
        self.blur.source = url.to_string();
    }

    fn set_sprite_source(&mut self, url: &str) {
        self.sprite.source = Some(url.to_string());
        self.sprite.natural = None;
        self.sprite_assignments += 1;
    }

    fn show_window(&mut self, window: Rect, sprite: Rect) {
        self.sprite.window = Some(window);
        self.sprite.placement = Some(sprite);
        self.sprite.visible = true;
    }

    fn hide_window(&mut self) {
        self.sprite.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(fit: FitMode) -> LayerSetup {
        LayerSetup {
            cover_url: "https://cdn.test/cover.jpg".into(),
            cover_fit: fit,
            blur_visible: fit == FitMode::Contain,
        }
    }

    #[test]
    fn mount_shows_cover_only() {
        let mut stack = LayerStack::with_size(640.0, 360.0);
        stack.mount(&setup(FitMode::Cover));
        assert!(stack.is_mounted());
        assert!(stack.shows_static_cover());
        assert!(!stack.blur.visible);
        assert_eq!(stack.blur_source(), Some("https://cdn.test/cover.jpg"));
    }

    #[test]
    fn new_sprite_source_resets_natural_size() {
        let mut stack = LayerStack::with_size(640.0, 360.0);
        assert!(!stack.finish_sprite_load(Size::new(10.0, 10.0)));
        stack.set_sprite_source("https://cdn.test/a.jpg");
        assert!(stack.finish_sprite_load(Size::new(1600.0, 900.0)));
        assert_eq!(stack.sprite_natural_size(), Some(Size::new(1600.0, 900.0)));
        stack.set_sprite_source("https://cdn.test/b.jpg");
        assert_eq!(stack.sprite_natural_size(), None);
        assert_eq!(stack.sprite_assignments, 2);
    }
}
