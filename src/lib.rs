pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod manifest;
pub mod preview;
pub mod sampler;
pub mod processing {
    pub mod aspect;
    pub mod compose;
    pub mod layout;
}
pub mod render {
    pub mod stack;
    pub mod surface;
}
pub mod tasks {
    pub mod controller;
    pub mod driver;
}

pub use config::{CorrectionMode, FitMode, FitPolicy, PreviewMode, PreviewOptions};
pub use error::{Error, FetchError};
pub use events::{PreviewEvent, TimerCommand};
pub use manifest::{FrameDescriptor, FrameSequence, parse_sprite_index};
pub use media_model::{MediaCustomization, MosaicSize};
pub use preview::{InitializedPreview, PreviewData, PreviewEngine, PreviewResponse};
pub use render::stack::LayerStack;
pub use render::surface::PreviewSurface;
pub use tasks::controller::PreviewSession;
