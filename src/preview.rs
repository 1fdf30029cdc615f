//! Entry point: builds a preview session on a target surface.
//!
//! Every outcome is reported as a [`PreviewResponse`]. Only malformed
//! arguments yield `res: false`; a media without a usable sprite index still
//! gets a working static cover and `res: true`.

use media_model::MediaCustomization;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PreviewMode, PreviewOptions};
use crate::error::{Error, FetchError};
use crate::fetch::ManifestSource;
use crate::manifest::parse_sprite_index;
use crate::render::surface::{Document, PreviewSurface, mount_layers, resolve_target};
use crate::sampler::sample_frames;
use crate::tasks::controller::PreviewSession;

pub const BOARD_NOT_FOUND: &str = "board not found";
pub const INDEX_NOT_FOUND: &str = "Media VTT not found.";
pub const NO_FRAMES: &str = "No frames found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewData {
    /// Frames parsed from the sprite index, before sampling.
    #[serde(rename = "framesCount")]
    pub frames_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewResponse {
    pub res: bool,
    pub data: Option<PreviewData>,
    pub errors: Option<String>,
}

impl PreviewResponse {
    pub fn ready(frames_count: usize) -> Self {
        Self {
            res: true,
            data: Some(PreviewData { frames_count }),
            errors: None,
        }
    }

    /// Static cover only, with no message.
    pub fn cover_only() -> Self {
        Self {
            res: true,
            data: None,
            errors: None,
        }
    }

    /// Static cover only, with the reason the sprite is unavailable.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            res: true,
            data: None,
            errors: Some(message.into()),
        }
    }

    pub fn failed(err: &Error) -> Self {
        Self {
            res: false,
            data: None,
            errors: Some(err.to_string()),
        }
    }
}

pub struct InitializedPreview<S> {
    pub response: PreviewResponse,
    /// Present whenever the layers were mounted, even without frames; a leave
    /// still has to restore the cover.
    pub session: Option<PreviewSession<S>>,
}

impl<S> InitializedPreview<S> {
    fn failed(err: Error) -> Self {
        Self {
            response: PreviewResponse::failed(&err),
            session: None,
        }
    }
}

pub struct PreviewEngine<F> {
    source: F,
}

impl<F: ManifestSource> PreviewEngine<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    /// Resolves `target_id` through `document`, then initializes on it.
    pub async fn initialize_by_id<D: Document>(
        &self,
        document: &mut D,
        target_id: &str,
        customization: Option<&MediaCustomization>,
        options: &PreviewOptions,
    ) -> InitializedPreview<D::Surface> {
        let target = resolve_target(document, target_id);
        if target.is_none() {
            debug!(id = target_id, "preview target not found");
        }
        self.initialize(target, customization, options).await
    }

    pub async fn initialize<S: PreviewSurface>(
        &self,
        target: Option<S>,
        customization: Option<&MediaCustomization>,
        options: &PreviewOptions,
    ) -> InitializedPreview<S> {
        let Some(mut surface) = target else {
            return InitializedPreview::failed(Error::InvalidTarget);
        };
        let Some(customization) = customization else {
            return InitializedPreview::failed(Error::MissingCustomization);
        };
        if let Err(e) = customization.validate() {
            return InitializedPreview::failed(Error::InvalidCustomization(format!("{e:#}")));
        }
        let options = match options.clone().validated() {
            Ok(options) => options,
            Err(e) => return InitializedPreview::failed(Error::InvalidOptions(format!("{e:#}"))),
        };

        mount_layers(&mut surface, customization, options.fit_mode);
        let mut session = PreviewSession::new(surface, &options, customization.cover_url());

        let response = if options.mode == PreviewMode::Fixed {
            PreviewResponse::cover_only()
        } else {
            self.load_frames(&mut session, customization, &options).await
        };

        if options.debug {
            info!(
                res = response.res,
                frames = response.data.map(|d| d.frames_count),
                errors = response.errors.as_deref(),
                mode = ?options.mode,
                "preview initialized"
            );
        }
        InitializedPreview {
            response,
            session: Some(session),
        }
    }

    async fn load_frames<S: PreviewSurface>(
        &self,
        session: &mut PreviewSession<S>,
        customization: &MediaCustomization,
        options: &PreviewOptions,
    ) -> PreviewResponse {
        let Some(url) = customization.board_url(options.mosaic_size) else {
            debug!(size = %options.mosaic_size, "media has no sprite board");
            return PreviewResponse::degraded(BOARD_NOT_FOUND);
        };

        let text = match self.source.fetch_index(url).await {
            Ok(text) => text,
            Err(FetchError::Status(status)) => {
                if options.debug {
                    warn!(url, status, "{INDEX_NOT_FOUND}");
                }
                return PreviewResponse::degraded(INDEX_NOT_FOUND);
            }
            Err(err @ FetchError::Transport(_)) => {
                if options.debug {
                    warn!(url, error = %err, "sprite index fetch failed");
                }
                return PreviewResponse::degraded(err.to_string());
            }
        };

        let frames = parse_sprite_index(&text);
        if frames.is_empty() {
            if options.debug {
                warn!(url, "{NO_FRAMES}");
            }
            return PreviewResponse::degraded(NO_FRAMES);
        }

        let frames_count = frames.len();
        let active = sample_frames(&frames, options.duration, options.fps);
        debug!(frames = frames_count, active = active.len(), "sprite index ready");
        session.set_frames(active);
        PreviewResponse::ready(frames_count)
    }
}
