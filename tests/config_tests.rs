use std::io::Write;
use std::time::Duration;

use mosaic_preview::config::{Configuration, CorrectionMode, FitMode, PreviewMode, PreviewOptions};
use mosaic_preview::MosaicSize;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
media-id: "abc123"
host: "cdn.test"
container:
  width: 320
  height: 180
preview:
  mode: animation
  duration: 4s
  fps: 12
  mosaic-size: small
  fit-mode:
    cover: contain
    animation: cover
  correction: none
  debug: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.media_id.as_deref(), Some("abc123"));
    assert_eq!(cfg.host.as_deref(), Some("cdn.test"));
    assert!((cfg.container.width - 320.0).abs() < f64::EPSILON);
    assert_eq!(cfg.preview.mode, PreviewMode::Animation);
    assert_eq!(cfg.preview.duration, Duration::from_secs(4));
    assert!((cfg.preview.fps - 12.0).abs() < f64::EPSILON);
    assert_eq!(cfg.preview.mosaic_size, MosaicSize::Small);
    assert_eq!(cfg.preview.fit_mode.cover, FitMode::Contain);
    assert_eq!(cfg.preview.fit_mode.animation, FitMode::Cover);
    assert_eq!(cfg.preview.correction, CorrectionMode::None);
    assert!(cfg.preview.debug);
}

#[test]
fn partial_fit_mode_keeps_other_default() {
    let yaml = r#"
fit-mode:
  cover: contain
"#;
    let opts: PreviewOptions = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(opts.fit_mode.cover, FitMode::Contain);
    assert_eq!(opts.fit_mode.animation, FitMode::Contain);
    assert_eq!(opts.duration, Duration::from_secs(8));
}

#[test]
fn unknown_mode_is_rejected() {
    let err = serde_yaml::from_str::<PreviewOptions>("mode: slideshow").unwrap_err();
    assert!(err.to_string().contains("slideshow"));
}

#[test]
fn validated_requires_a_media_source() {
    let cfg: Configuration = serde_yaml::from_str("host: cdn.test").unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn validated_rejects_negative_fps() {
    let yaml = r#"
media-id: "m"
preview:
  fps: -1
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(format!("{err:#}").contains("fps"));
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "customization-path: /tmp/customization.json\npreview:\n  duration: 2.5\n  fps: 6"
    )
    .unwrap();

    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.preview.duration, Duration::from_millis(2500));
    assert_eq!(cfg.preview.frame_interval(), Duration::from_secs_f64(1.0 / 6.0));
    assert!(cfg.customization_path.is_some());
}
