use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use media_model::MosaicSize;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Shortest animation timer period accepted (1000 fps).
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);
/// Longest animation timer period accepted.
pub const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(3600);

/// How the preview reacts to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewMode {
    /// Pointer position selects the frame.
    #[default]
    Scrubbing,
    /// Hovering plays the frames on a timer.
    Animation,
    /// Static cover only.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    Cover,
    Contain,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Contain => "contain",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent fit policies for the static cover and the animated frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FitPolicy {
    pub cover: FitMode,
    pub animation: FitMode,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            cover: FitMode::Cover,
            animation: FitMode::Contain,
        }
    }
}

/// Quality preset for frame rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionMode {
    /// Plain sprite positioning: no aspect correction, no blur backdrop.
    None,
    /// Letterbox/pillarbox correction against the cover plus blur fill.
    #[default]
    AspectCorrected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PreviewOptions {
    pub mode: PreviewMode,
    /// Length of the preview the frames are sampled for. Accepts plain
    /// seconds (`8`, `2.5`) or a humantime string (`"8s"`, `"1500ms"`).
    #[serde(
        deserialize_with = "duration_secs_or_humantime",
        serialize_with = "humantime_serde::serialize"
    )]
    pub duration: Duration,
    /// Target frames per second; also paces the animation timer.
    pub fps: f64,
    pub mosaic_size: MosaicSize,
    pub fit_mode: FitPolicy,
    pub correction: CorrectionMode,
    /// Raise per-frame logging from `trace` to `debug`.
    pub debug: bool,
}

impl PreviewOptions {
    const fn default_duration() -> Duration {
        Duration::from_secs(8)
    }

    const fn default_fps() -> f64 {
        6.0
    }

    /// `1 / fps` seconds, or `None` when that falls outside
    /// [`MIN_FRAME_INTERVAL`, `MAX_FRAME_INTERVAL`].
    pub fn checked_frame_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.fps)
            .ok()
            .filter(|period| (MIN_FRAME_INTERVAL..=MAX_FRAME_INTERVAL).contains(period))
    }

    /// Period of the animation timer, `1000 / fps` milliseconds, clamped to
    /// [`MIN_FRAME_INTERVAL`, `MAX_FRAME_INTERVAL`].
    pub fn frame_interval(&self) -> Duration {
        if let Some(period) = self.checked_frame_interval() {
            return period;
        }
        if self.fps > 1.0 {
            MIN_FRAME_INTERVAL
        } else {
            MAX_FRAME_INTERVAL
        }
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.fps.is_finite() && self.fps > 0.0,
            "fps must be a positive number"
        );
        ensure!(
            self.checked_frame_interval().is_some(),
            "fps must give a frame interval between {:?} and {:?}",
            MIN_FRAME_INTERVAL,
            MAX_FRAME_INTERVAL
        );
        ensure!(
            !self.duration.is_zero(),
            "duration must be greater than zero"
        );
        Ok(self)
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            mode: PreviewMode::default(),
            duration: Self::default_duration(),
            fps: Self::default_fps(),
            mosaic_size: MosaicSize::default(),
            fit_mode: FitPolicy::default(),
            correction: CorrectionMode::default(),
            debug: false,
        }
    }
}

fn duration_secs_or_humantime<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|_| de::Error::custom(format!("invalid duration {secs}"))),
        Raw::Text(text) => humantime::parse_duration(text.trim()).map_err(de::Error::custom),
    }
}

/// Pixel size of the simulated container the CLI renders into.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContainerConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Webservice host; protocol is optional.
    pub host: Option<String>,
    /// Media to fetch the customization block for.
    pub media_id: Option<String>,
    /// Local JSON file holding a customization block (skips the webservice).
    pub customization_path: Option<PathBuf>,
    pub container: ContainerConfig,
    pub preview: PreviewOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(Error::Io)?;
        let cfg = serde_yaml::from_str(&s).map_err(Error::Config)?;
        Ok(cfg)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(mut self) -> Result<Self> {
        ensure!(
            self.container.width > 0.0 && self.container.height > 0.0,
            "container width and height must be positive"
        );
        ensure!(
            self.media_id.is_some() || self.customization_path.is_some(),
            "either media-id or customization-path must be set"
        );
        if let Some(host) = &self.host {
            ensure!(!host.trim().is_empty(), "host must not be blank when provided");
        }
        self.preview = self
            .preview
            .validated()
            .context("invalid preview options")?;
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: None,
            media_id: None,
            customization_path: None,
            container: ContainerConfig::default(),
            preview: PreviewOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = PreviewOptions::default();
        assert_eq!(opts.mode, PreviewMode::Scrubbing);
        assert_eq!(opts.duration, Duration::from_secs(8));
        assert!((opts.fps - 6.0).abs() < f64::EPSILON);
        assert_eq!(opts.mosaic_size, MosaicSize::Large);
        assert_eq!(opts.fit_mode.cover, FitMode::Cover);
        assert_eq!(opts.fit_mode.animation, FitMode::Contain);
        assert_eq!(opts.correction, CorrectionMode::AspectCorrected);
    }

    #[test]
    fn frame_interval_is_inverse_fps() {
        let opts = PreviewOptions {
            fps: 4.0,
            ..Default::default()
        };
        assert_eq!(opts.frame_interval(), Duration::from_millis(250));
    }

    #[test]
    fn validated_rejects_zero_fps() {
        let opts = PreviewOptions {
            fps: 0.0,
            ..Default::default()
        };
        assert!(opts.validated().is_err());
    }

    #[test]
    fn validated_rejects_fps_outside_timer_range() {
        for fps in [1e-20, 1e-4, 1e12, 2000.0] {
            let opts = PreviewOptions {
                fps,
                ..Default::default()
            };
            assert!(opts.validated().is_err(), "fps {fps} accepted");
        }
        let edge = PreviewOptions {
            fps: 1000.0,
            ..Default::default()
        };
        assert!(edge.validated().is_ok());
    }

    #[test]
    fn frame_interval_clamps_extreme_fps() {
        let slow = PreviewOptions {
            fps: 1e-20,
            ..Default::default()
        };
        assert_eq!(slow.frame_interval(), MAX_FRAME_INTERVAL);
        let fast = PreviewOptions {
            fps: 1e12,
            ..Default::default()
        };
        assert_eq!(fast.frame_interval(), MIN_FRAME_INTERVAL);
        let broken = PreviewOptions {
            fps: f64::NAN,
            ..Default::default()
        };
        assert_eq!(broken.frame_interval(), MAX_FRAME_INTERVAL);
    }

    #[test]
    fn duration_accepts_seconds_and_humantime() {
        let numeric: PreviewOptions = serde_yaml::from_str("duration: 2.5").unwrap();
        assert_eq!(numeric.duration, Duration::from_millis(2500));
        let text: PreviewOptions = serde_yaml::from_str("duration: 1500ms").unwrap();
        assert_eq!(text.duration, Duration::from_millis(1500));
    }
}
