use std::fmt;

use anyhow::{Result, ensure};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

pub use customization::{BoardUrls, CoverUrls, MediaCustomization, MosaicSize};
pub use webservice::{GlobalMetadata, Media, MediaContainer, MediaMetadata, WebserviceResponse};

mod customization {
    use super::*;

    /// Which of the two sprite manifests published for a media to use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum MosaicSize {
        Small,
        #[default]
        Large,
    }

    impl MosaicSize {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Large => "large",
            }
        }
    }

    impl fmt::Display for MosaicSize {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CoverUrls {
        pub url: String,
        pub thumbnail_url: String,
        pub thumbnaillarge_url: String,
        pub thumbnailextralarge_url: String,
    }

    impl CoverUrls {
        /// The cover variant used for the static layer and the blur backdrop.
        ///
        /// Prefers the extra-large thumbnail and walks down the size ladder
        /// when the webservice left a variant blank.
        pub fn preferred(&self) -> &str {
            [
                &self.thumbnailextralarge_url,
                &self.thumbnaillarge_url,
                &self.thumbnail_url,
                &self.url,
            ]
            .into_iter()
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BoardUrls {
        pub small_url: String,
        pub large_url: String,
    }

    impl BoardUrls {
        pub fn url_for(&self, size: MosaicSize) -> Option<&str> {
            let raw = match size {
                MosaicSize::Small => &self.small_url,
                MosaicSize::Large => &self.large_url,
            };
            Some(raw.trim()).filter(|value| !value.is_empty())
        }
    }

    /// Customization block of a media: cover variants and the optional
    /// sprite-manifest ("board") URLs.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MediaCustomization {
        #[serde(default)]
        pub cover: CoverUrls,
        #[serde(default)]
        pub mosaic: String,
        #[serde(
            default,
            deserialize_with = "lenient_board",
            skip_serializing_if = "Option::is_none"
        )]
        pub board: Option<BoardUrls>,
    }

    impl MediaCustomization {
        pub fn cover_url(&self) -> &str {
            self.cover.preferred()
        }

        /// Manifest URL for `size`, or `None` when the media has no board.
        pub fn board_url(&self, size: MosaicSize) -> Option<&str> {
            self.board.as_ref().and_then(|board| board.url_for(size))
        }

        /// A blank board is not an error here; it degrades to the static cover.
        pub fn validate(&self) -> Result<()> {
            ensure!(
                !self.cover_url().is_empty(),
                "customization.cover must carry at least one non-blank URL"
            );
            Ok(())
        }
    }

    // The webservice emits `[]`, `""` or `null` for media without a board.
    fn lenient_board<'de, D>(deserializer: D) -> std::result::Result<Option<BoardUrls>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBoard {
            Urls(BoardUrls),
            Other(IgnoredAny),
        }

        Ok(match Option::<RawBoard>::deserialize(deserializer)? {
            Some(RawBoard::Urls(urls))
                if urls.url_for(MosaicSize::Small).is_some()
                    || urls.url_for(MosaicSize::Large).is_some() =>
            {
                Some(urls)
            }
            Some(RawBoard::Urls(_) | RawBoard::Other(_)) | None => None,
        })
    }
}

mod webservice {
    use super::*;

    /// Envelope returned by most `/ws/*` endpoints.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct WebserviceResponse<T> {
        pub status: i64,
        #[serde(default)]
        pub info: String,
        pub data: Option<T>,
    }

    impl<T> WebserviceResponse<T> {
        /// Status `0` is used by some endpoints for success alongside `200`.
        pub fn is_success(&self) -> bool {
            self.status == 200 || self.status == 0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MediaContainer {
        pub media: Media,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Media {
        pub metadata: MediaMetadata,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MediaMetadata {
        #[serde(default)]
        pub global: GlobalMetadata,
        pub customization: MediaCustomization,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GlobalMetadata {
        pub media_id: String,
        pub name: String,
        pub permalink: String,
        pub duration: f64,
        pub ratio: f64,
        pub fps: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_url_follows_mosaic_size() {
        let custom: MediaCustomization = serde_json::from_str(
            r#"{
                "cover": {"thumbnailextralarge_url": "https://cdn.test/xl.jpg"},
                "board": {"small_url": "//cdn.test/s.vtt", "large_url": "//cdn.test/l.vtt"}
            }"#,
        )
        .expect("valid json");

        assert_eq!(custom.board_url(MosaicSize::Small), Some("//cdn.test/s.vtt"));
        assert_eq!(custom.board_url(MosaicSize::Large), Some("//cdn.test/l.vtt"));
        custom.validate().expect("valid customization");
    }

    #[test]
    fn empty_board_shapes_mean_no_board() {
        for raw in ["[]", "\"\"", "null"] {
            let json = format!(r#"{{"cover": {{"url": "https://cdn.test/c.jpg"}}, "board": {raw}}}"#);
            let custom: MediaCustomization = serde_json::from_str(&json).expect("valid json");
            assert!(custom.board.is_none(), "board {raw} should be absent");
            assert_eq!(custom.board_url(MosaicSize::Large), None);
        }
    }

    #[test]
    fn blank_board_urls_are_treated_as_missing() {
        let custom = MediaCustomization {
            board: Some(BoardUrls {
                small_url: "https://cdn.test/s.vtt".into(),
                large_url: "   ".into(),
            }),
            ..Default::default()
        };
        assert_eq!(custom.board_url(MosaicSize::Large), None);
        assert!(custom.board_url(MosaicSize::Small).is_some());
    }

    #[test]
    fn cover_falls_back_down_the_size_ladder() {
        let cover = CoverUrls {
            url: "https://cdn.test/full.jpg".into(),
            thumbnail_url: String::new(),
            thumbnaillarge_url: "https://cdn.test/large.jpg".into(),
            thumbnailextralarge_url: String::new(),
        };
        assert_eq!(cover.preferred(), "https://cdn.test/large.jpg");
        assert_eq!(CoverUrls::default().preferred(), "");
    }

    #[test]
    fn validate_rejects_missing_cover() {
        let err = MediaCustomization::default().validate().unwrap_err();
        assert!(err.to_string().contains("cover"));
    }

    #[test]
    fn webservice_envelope_success_codes() {
        let ok: WebserviceResponse<MediaContainer> = serde_json::from_str(
            r#"{"status": 200, "info": "OK", "data": {"media": {"metadata": {
                "global": {"media_id": "abc", "name": "Demo", "duration": 12.5},
                "customization": {"cover": {"url": "https://cdn.test/c.jpg"}}
            }}}}"#,
        )
        .expect("valid json");
        assert!(ok.is_success());
        let media = ok.data.expect("data");
        assert_eq!(media.media.metadata.global.name, "Demo");

        let failed: WebserviceResponse<MediaContainer> =
            serde_json::from_str(r#"{"status": 404, "info": "Not found", "data": null}"#)
                .expect("valid json");
        assert!(!failed.is_success());
    }
}
