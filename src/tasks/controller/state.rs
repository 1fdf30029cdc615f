use std::time::Duration;

use crate::config::PreviewMode;
use crate::events::PreviewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Static cover, no frame active.
    Idle,
    Active { frame: usize },
}

/// Side effects requested by a transition, executed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ShowFrame(usize),
    StartTimer(Duration),
    CancelTimer,
    /// Restore the cover and forget the loaded sprite.
    Reset,
}

/// Live numbers a transition depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub frame_count: usize,
    pub container_left: f64,
    pub container_width: f64,
}

/// Maps a horizontal pointer position to a frame index.
pub fn scrub_index(client_x: f64, ctx: &FrameContext) -> Option<usize> {
    if ctx.frame_count == 0 || ctx.container_width.is_nan() || ctx.container_width <= 0.0 {
        return None;
    }
    if !client_x.is_finite() {
        return None;
    }
    let fraction = (client_x - ctx.container_left) / ctx.container_width;
    let raw = (fraction * ctx.frame_count as f64).floor();
    let last = (ctx.frame_count - 1) as f64;
    Some(raw.clamp(0.0, last) as usize)
}

pub struct PreviewSM {
    mode: PreviewMode,
    state: ControllerState,
    current_frame: usize,
    timer_running: bool,
    interval: Duration,
}

impl PreviewSM {
    pub fn new(mode: PreviewMode, interval: Duration) -> Self {
        Self {
            mode,
            state: ControllerState::Idle,
            current_frame: 0,
            timer_running: false,
            interval,
        }
    }

    pub fn current(&self) -> ControllerState {
        self.state
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn on_event(&mut self, event: &PreviewEvent, ctx: &FrameContext) -> Vec<Effect> {
        if self.mode == PreviewMode::Fixed {
            return Vec::new();
        }
        if event.is_leave() {
            return self.leave();
        }
        match self.mode {
            PreviewMode::Scrubbing => self.on_scrub_event(event, ctx),
            PreviewMode::Animation => self.on_animation_event(event, ctx),
            PreviewMode::Fixed => Vec::new(),
        }
    }

    fn on_scrub_event(&mut self, event: &PreviewEvent, ctx: &FrameContext) -> Vec<Effect> {
        let Some(index) = event.scrub_position().and_then(|x| scrub_index(x, ctx)) else {
            return Vec::new();
        };
        self.current_frame = index;
        self.state = ControllerState::Active { frame: index };
        vec![Effect::ShowFrame(index)]
    }

    fn on_animation_event(&mut self, event: &PreviewEvent, ctx: &FrameContext) -> Vec<Effect> {
        if ctx.frame_count == 0 {
            return Vec::new();
        }
        if event.is_enter() {
            self.state = ControllerState::Active {
                frame: self.current_frame,
            };
            // One interval per session; a second enter keeps the running one.
            if self.timer_running {
                return Vec::new();
            }
            self.timer_running = true;
            return vec![Effect::StartTimer(self.interval)];
        }
        if *event == PreviewEvent::Tick && self.timer_running {
            self.current_frame = (self.current_frame + 1) % ctx.frame_count;
            self.state = ControllerState::Active {
                frame: self.current_frame,
            };
            return vec![Effect::ShowFrame(self.current_frame)];
        }
        Vec::new()
    }

    fn leave(&mut self) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if self.timer_running {
            self.timer_running = false;
            effects.push(Effect::CancelTimer);
        }
        self.current_frame = 0;
        self.state = ControllerState::Idle;
        effects.push(Effect::Reset);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(166);

    fn ctx(frame_count: usize) -> FrameContext {
        FrameContext {
            frame_count,
            container_left: 100.0,
            container_width: 400.0,
        }
    }

    #[test]
    fn scrub_maps_pointer_to_frame() {
        let mut sm = PreviewSM::new(PreviewMode::Scrubbing, INTERVAL);
        assert_eq!(sm.current(), ControllerState::Idle);
        let fx = sm.on_event(&PreviewEvent::PointerMove { client_x: 300.0 }, &ctx(10));
        assert_eq!(fx, vec![Effect::ShowFrame(5)]);
        assert_eq!(sm.current(), ControllerState::Active { frame: 5 });
    }

    #[test]
    fn scrub_clamps_outside_container() {
        let c = ctx(10);
        assert_eq!(scrub_index(50.0, &c), Some(0));
        assert_eq!(scrub_index(500.0, &c), Some(9));
        assert_eq!(scrub_index(499.9, &c), Some(9));
        assert_eq!(scrub_index(f64::NAN, &c), None);
        assert_eq!(scrub_index(200.0, &ctx(0)), None);
    }

    #[test]
    fn leave_resets_to_idle() {
        let mut sm = PreviewSM::new(PreviewMode::Scrubbing, INTERVAL);
        sm.on_event(&PreviewEvent::TouchMove { client_x: 450.0 }, &ctx(10));
        assert_eq!(sm.current_frame(), 8);
        let fx = sm.on_event(&PreviewEvent::TouchEnd, &ctx(10));
        assert_eq!(fx, vec![Effect::Reset]);
        assert_eq!(sm.current(), ControllerState::Idle);
        assert_eq!(sm.current_frame(), 0);
    }

    #[test]
    fn scrubbing_ignores_enter_and_ticks() {
        let mut sm = PreviewSM::new(PreviewMode::Scrubbing, INTERVAL);
        assert!(sm.on_event(&PreviewEvent::PointerEnter, &ctx(10)).is_empty());
        assert!(sm.on_event(&PreviewEvent::Tick, &ctx(10)).is_empty());
        assert_eq!(sm.current(), ControllerState::Idle);
    }

    #[test]
    fn animation_starts_single_timer_and_wraps() {
        let mut sm = PreviewSM::new(PreviewMode::Animation, INTERVAL);
        let c = ctx(3);
        assert_eq!(
            sm.on_event(&PreviewEvent::PointerEnter, &c),
            vec![Effect::StartTimer(INTERVAL)]
        );
        assert!(sm.on_event(&PreviewEvent::TouchStart, &c).is_empty());
        assert!(sm.timer_running());

        let shown: Vec<_> = (0..4)
            .flat_map(|_| sm.on_event(&PreviewEvent::Tick, &c))
            .collect();
        assert_eq!(
            shown,
            vec![
                Effect::ShowFrame(1),
                Effect::ShowFrame(2),
                Effect::ShowFrame(0),
                Effect::ShowFrame(1)
            ]
        );

        let fx = sm.on_event(&PreviewEvent::PointerLeave, &c);
        assert_eq!(fx, vec![Effect::CancelTimer, Effect::Reset]);
        assert!(!sm.timer_running());
        assert!(sm.on_event(&PreviewEvent::Tick, &c).is_empty());
    }

    #[test]
    fn animation_without_frames_does_nothing() {
        let mut sm = PreviewSM::new(PreviewMode::Animation, INTERVAL);
        assert!(sm.on_event(&PreviewEvent::PointerEnter, &ctx(0)).is_empty());
        assert_eq!(sm.current(), ControllerState::Idle);
    }

    #[test]
    fn fixed_mode_never_activates() {
        let mut sm = PreviewSM::new(PreviewMode::Fixed, INTERVAL);
        for ev in [
            PreviewEvent::PointerEnter,
            PreviewEvent::PointerMove { client_x: 200.0 },
            PreviewEvent::Tick,
            PreviewEvent::PointerLeave,
        ] {
            assert!(sm.on_event(&ev, &ctx(10)).is_empty());
        }
        assert_eq!(sm.current(), ControllerState::Idle);
    }
}
