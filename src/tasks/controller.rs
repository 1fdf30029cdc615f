pub mod state;

use std::sync::Arc;

use kurbo::Size;
use tracing::{debug, trace};

use crate::config::{FitPolicy, PreviewOptions};
use crate::events::{PreviewEvent, TimerCommand};
use crate::manifest::FrameDescriptor;
use crate::processing::compose::{RenderPolicy, RenderState, compute_render_state};
use crate::render::surface::{PreviewSurface, apply_render_state, restore_cover};
use state::{ControllerState, Effect, FrameContext, PreviewSM};

/// State of one preview invocation.
///
/// Owns the surface exclusively. Event handlers feed [`PreviewSession::handle`];
/// the session never spawns anything itself, timer requests are handed back to
/// the caller as [`TimerCommand`]s.
pub struct PreviewSession<S> {
    surface: S,
    sm: PreviewSM,
    frames: Vec<FrameDescriptor>,
    cover_url: String,
    fit: FitPolicy,
    policy: RenderPolicy,
    last_used_sprite_url: Option<Arc<str>>,
    // Last frame asked for; a sprite load applies this, never a stale one.
    pending_frame: Option<usize>,
    last_render: Option<RenderState>,
    debug: bool,
}

impl<S: PreviewSurface> PreviewSession<S> {
    pub fn new(surface: S, options: &PreviewOptions, cover_url: impl Into<String>) -> Self {
        Self {
            surface,
            sm: PreviewSM::new(options.mode, options.frame_interval()),
            frames: Vec::new(),
            cover_url: cover_url.into(),
            fit: options.fit_mode,
            policy: RenderPolicy::from(options),
            last_used_sprite_url: None,
            pending_frame: None,
            last_render: None,
            debug: options.debug,
        }
    }

    /// Installs the sampled frame list.
    pub fn set_frames(&mut self, frames: Vec<FrameDescriptor>) {
        self.frames = frames;
    }

    pub fn handle(&mut self, event: PreviewEvent) -> Option<TimerCommand> {
        match event {
            PreviewEvent::SpriteLoaded => {
                self.apply_pending();
                return None;
            }
            PreviewEvent::CoverLoaded => {
                // The aspect correction needs the cover; redo the frame on screen.
                if let ControllerState::Active { frame } = self.sm.current() {
                    if self.pending_frame.is_none() && self.last_render.is_some() {
                        self.show_frame(frame);
                    }
                }
                return None;
            }
            _ => {}
        }

        let rect = self.surface.container_rect();
        let ctx = FrameContext {
            frame_count: self.frames.len(),
            container_left: rect.x0,
            container_width: rect.width(),
        };
        let mut timer = None;
        for effect in self.sm.on_event(&event, &ctx) {
            match effect {
                Effect::ShowFrame(index) => self.show_frame(index),
                Effect::StartTimer(period) => timer = Some(TimerCommand::Start(period)),
                Effect::CancelTimer => timer = Some(TimerCommand::Cancel),
                Effect::Reset => self.reset(),
            }
        }
        timer
    }

    /// Assigns the frame's sprite if needed and positions it, now or once
    /// the sprite has loaded.
    pub(crate) fn show_frame(&mut self, index: usize) {
        let Some(frame) = self.frames.get(index) else {
            return;
        };
        if self.last_used_sprite_url.as_deref() != Some(&*frame.sprite_url) {
            if self.debug {
                debug!(url = &*frame.sprite_url, "changing sprite source");
            }
            self.surface.set_sprite_source(&frame.sprite_url);
            self.last_used_sprite_url = Some(frame.sprite_url.clone());
        }
        self.pending_frame = Some(index);
        if self.surface.sprite_natural_size().is_some() {
            self.apply_pending();
        }
    }

    fn apply_pending(&mut self) {
        let Some(index) = self.pending_frame else {
            return;
        };
        let Some(frame) = self.frames.get(index) else {
            self.pending_frame = None;
            return;
        };
        // A load event for a sheet we already moved away from.
        if self.surface.sprite_source() != Some(&*frame.sprite_url) {
            return;
        }
        let Some(sprite_natural) = self.surface.sprite_natural_size() else {
            return;
        };
        self.pending_frame = None;

        let container: Size = self.surface.container_rect().size();
        let cover = self.surface.cover_natural_size();
        let state = compute_render_state(frame, cover, container, sprite_natural, self.policy);
        if self.debug {
            debug!(
                index,
                x = frame.x,
                y = frame.y,
                scale = state.scale,
                blur = state.blur_visible,
                fit = %self.policy.animation,
                "show frame"
            );
        } else {
            trace!(index, scale = state.scale, "show frame");
        }
        apply_render_state(&mut self.surface, &state);
        self.last_render = Some(state);
    }

    /// Back to the static cover; the next frame reassigns its sprite.
    pub(crate) fn reset(&mut self) {
        if self.debug {
            debug!("resetting preview");
        }
        self.pending_frame = None;
        self.last_used_sprite_url = None;
        self.last_render = None;
        restore_cover(&mut self.surface, &self.cover_url, self.fit);
    }

    pub fn state(&self) -> ControllerState {
        self.sm.current()
    }

    pub fn current_frame(&self) -> usize {
        self.sm.current_frame()
    }

    pub fn timer_running(&self) -> bool {
        self.sm.timer_running()
    }

    pub fn last_used_sprite_url(&self) -> Option<&str> {
        self.last_used_sprite_url.as_deref()
    }

    pub fn active_frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }

    /// Geometry applied by the last frame shown, if any is on screen.
    pub fn last_render(&self) -> Option<&RenderState> {
        self.last_render.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tears the session down, handing the surface back to the host.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
