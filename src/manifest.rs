//! Sprite index ("board" manifest) parsing.
//!
//! A manifest is a WebVTT-like text file where every interesting line looks like
//! `<sprite-url>#xywh=<x>,<y>,<w>,<h>`. Older manifests omit `<w>,<h>`. Anything
//! else (the `WEBVTT` header, cue timings, blank lines) is skipped.

use std::sync::{Arc, LazyLock};

use kurbo::Size;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

/// Tile size assumed when a manifest line carries no explicit size.
pub const DEFAULT_FRAME_WIDTH: u32 = 210;
pub const DEFAULT_FRAME_HEIGHT: u32 = 168;

static INDEX_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)#xywh=(\d+),(\d+)(?:,(\d+),(\d+))?$").expect("sprite index pattern")
});

/// One tile of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameDescriptor {
    pub sprite_url: Arc<str>,
    pub x: u32,
    pub y: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FrameDescriptor {
    /// Nominal tile size; absent or zero dimensions fall back to 210×168.
    pub fn size(&self) -> Size {
        let width = self.width.filter(|w| *w > 0).unwrap_or(DEFAULT_FRAME_WIDTH);
        let height = self.height.filter(|h| *h > 0).unwrap_or(DEFAULT_FRAME_HEIGHT);
        Size::new(f64::from(width), f64::from(height))
    }
}

/// Frames in chronological order.
pub type FrameSequence = Vec<FrameDescriptor>;

/// Rewrites protocol-relative URLs (`//host/x`) to `https://host/x`.
pub fn normalize_sprite_url(raw: &str) -> String {
    if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    }
}

fn parse_line(line: &str) -> Option<(String, u32, u32, Option<(u32, u32)>)> {
    let caps = INDEX_LINE.captures(line)?;
    let x = caps[2].parse().ok()?;
    let y = caps[3].parse().ok()?;
    let size = match (caps.get(4), caps.get(5)) {
        (Some(w), Some(h)) => Some((w.as_str().parse().ok()?, h.as_str().parse().ok()?)),
        _ => None,
    };
    Some((normalize_sprite_url(&caps[1]), x, y, size))
}

/// Parses manifest text into frames, preserving line order.
///
/// Returns an empty sequence when nothing matches; a media may legitimately
/// have no usable sprite.
pub fn parse_sprite_index(text: &str) -> FrameSequence {
    let mut frames = FrameSequence::new();
    let mut skipped = 0usize;
    // Consecutive tiles usually live on the same sheet; share the allocation.
    let mut last_url: Option<Arc<str>> = None;

    for line in text.trim().split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some((url, x, y, size)) = parse_line(line) else {
            if !line.trim().is_empty() {
                skipped += 1;
                trace!(line, "skipping non-index manifest line");
            }
            continue;
        };
        let sprite_url = match &last_url {
            Some(prev) if **prev == *url => prev.clone(),
            _ => {
                let fresh: Arc<str> = Arc::from(url);
                last_url = Some(fresh.clone());
                fresh
            }
        };
        frames.push(FrameDescriptor {
            sprite_url,
            x,
            y,
            width: size.map(|(w, _)| w),
            height: size.map(|(_, h)| h),
        });
    }

    debug!(frames = frames.len(), skipped, "parsed sprite index");
    frames
}

/// Smallest sheet that holds every tile referencing `sprite_url`.
///
/// Hosts without real image decoding use this as the sheet's natural size.
pub fn sheet_extent(frames: &[FrameDescriptor], sprite_url: &str) -> Size {
    frames
        .iter()
        .filter(|f| &*f.sprite_url == sprite_url)
        .fold(Size::ZERO, |acc, f| {
            let size = f.size();
            Size::new(
                acc.width.max(f64::from(f.x) + size.width),
                acc.height.max(f64::from(f.y) + size.height),
            )
        })
}
