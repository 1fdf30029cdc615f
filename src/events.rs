/// Input delivered to a preview session by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewEvent {
    PointerEnter,
    /// Pointer moved; `client_x` is in the same coordinate space as the
    /// container rectangle reported by the surface.
    PointerMove { client_x: f64 },
    PointerLeave,
    TouchStart,
    /// First touch point moved.
    TouchMove { client_x: f64 },
    TouchEnd,
    /// Animation timer fired.
    Tick,
    /// The sprite sheet assigned last has finished loading.
    SpriteLoaded,
    /// The cover image has finished loading.
    CoverLoaded,
}

impl PreviewEvent {
    pub fn scrub_position(&self) -> Option<f64> {
        match *self {
            Self::PointerMove { client_x } | Self::TouchMove { client_x } => Some(client_x),
            _ => None,
        }
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, Self::PointerEnter | Self::TouchStart)
    }

    pub fn is_leave(&self) -> bool {
        matches!(self, Self::PointerLeave | Self::TouchEnd)
    }
}

/// What the host timer should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start(std::time::Duration),
    Cancel,
}
