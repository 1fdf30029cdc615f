use std::time::Duration;

use tracing::debug;

use crate::manifest::FrameDescriptor;

/// `max(2, floor(duration × fps))`.
pub fn desired_frame_count(duration: Duration, fps: f64) -> usize {
    let raw = (duration.as_secs_f64() * fps).floor();
    if raw.is_finite() && raw > 2.0 {
        raw as usize
    } else {
        2
    }
}

/// Evenly spaced source indices for `desired` picks out of `len` frames.
///
/// The first and last source frames are always picked. Neighbouring picks may
/// repeat an index when `desired` is close to `len`.
pub fn sample_indices(len: usize, desired: usize) -> Vec<usize> {
    if desired >= len {
        return (0..len).collect();
    }
    let last = (len - 1) as f64;
    let span = (desired - 1) as f64;
    (0..desired)
        .map(|i| ((i as f64 / span) * last).round() as usize)
        .collect()
}

/// Narrows `frames` to the density implied by `duration` and `fps`.
///
/// Never upsamples: when the manifest already has few enough frames it is
/// returned unchanged.
pub fn sample_frames(frames: &[FrameDescriptor], duration: Duration, fps: f64) -> Vec<FrameDescriptor> {
    if frames.is_empty() {
        return Vec::new();
    }
    let desired = desired_frame_count(duration, fps);
    if desired >= frames.len() {
        return frames.to_vec();
    }
    let sampled: Vec<FrameDescriptor> = sample_indices(frames.len(), desired)
        .into_iter()
        .map(|idx| frames[idx].clone())
        .collect();
    debug!(source = frames.len(), sampled = sampled.len(), "sampled frames");
    sampled
}
