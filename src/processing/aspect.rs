//! Compensates for sprite tiles authored against the wrong canvas ratio.
//!
//! The cover image is generated straight from the source media, so its ratio is
//! the ground truth. When a tile is noticeably wider (pillarbox) or taller
//! (letterbox) than that, the black bands are baked into the tile and the crop
//! window has to be narrowed and shifted past them.

use kurbo::{Size, Vec2};

/// Ratio difference below which a tile is considered to match the cover.
pub const ASPECT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banding {
    None,
    /// Bands left and right: the tile is wider than the content.
    Pillarbox,
    /// Bands top and bottom: the tile is taller than the content.
    Letterbox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectCorrection {
    /// Tile size after removing the bands.
    pub thumb: Size,
    /// Shift added to the tile origin to skip the leading band.
    pub offset: Vec2,
    pub banding: Banding,
}

impl AspectCorrection {
    pub fn identity(thumb: Size) -> Self {
        Self {
            thumb,
            offset: Vec2::ZERO,
            banding: Banding::None,
        }
    }
}

/// Computes the corrected crop for a tile of nominal size `thumb`.
///
/// `cover` is the natural size of the cover image, `None` while it has not
/// loaded; no correction is applied in that case.
pub fn correct_aspect(thumb: Size, cover: Option<Size>) -> AspectCorrection {
    let Some(cover) = cover.filter(|c| c.width > 0.0 && c.height > 0.0) else {
        return AspectCorrection::identity(thumb);
    };
    if thumb.width <= 0.0 || thumb.height <= 0.0 {
        return AspectCorrection::identity(thumb);
    }

    let cover_ratio = cover.width / cover.height;
    let thumb_ratio = thumb.width / thumb.height;
    if (thumb_ratio - cover_ratio).abs() <= ASPECT_TOLERANCE {
        return AspectCorrection::identity(thumb);
    }

    if thumb_ratio > cover_ratio {
        let width = thumb.height * cover_ratio;
        AspectCorrection {
            thumb: Size::new(width, thumb.height),
            offset: Vec2::new((thumb.width - width) / 2.0, 0.0),
            banding: Banding::Pillarbox,
        }
    } else {
        let height = thumb.width / cover_ratio;
        AspectCorrection {
            thumb: Size::new(thumb.width, height),
            offset: Vec2::new(0.0, (thumb.height - height) / 2.0),
            banding: Banding::Letterbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: Size = Size::new(1920.0, 1080.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn matching_ratio_is_untouched() {
        let c = correct_aspect(Size::new(320.0, 180.0), Some(HD));
        assert_eq!(c.offset, Vec2::ZERO);
        assert_eq!(c.thumb, Size::new(320.0, 180.0));
        assert_eq!(c.banding, Banding::None);
    }

    #[test]
    fn within_tolerance_is_untouched() {
        // 300/168 = 1.786 vs 1.778
        let c = correct_aspect(Size::new(300.0, 168.0), Some(HD));
        assert_eq!(c.banding, Banding::None);
        assert_eq!(c.offset, Vec2::ZERO);
    }

    #[test]
    fn wide_tile_is_pillarboxed() {
        let c = correct_aspect(Size::new(400.0, 168.0), Some(HD));
        assert_eq!(c.banding, Banding::Pillarbox);
        assert!(close(c.thumb.width, 298.67));
        assert!(close(c.offset.x, 50.67));
        assert_eq!(c.offset.y, 0.0);
        assert_eq!(c.thumb.height, 168.0);
    }

    #[test]
    fn vertical_video_in_landscape_tile_is_letterboxed() {
        // 9:16 content: tile 210x168 is wider, so it's pillarboxed.
        let portrait = Size::new(1080.0, 1920.0);
        let c = correct_aspect(Size::new(210.0, 168.0), Some(portrait));
        assert_eq!(c.banding, Banding::Pillarbox);
        assert!(close(c.thumb.width, 94.5));

        // Square-ish tile against a 21:9 cover: the tile is too tall.
        let scope = Size::new(2520.0, 1080.0);
        let c = correct_aspect(Size::new(210.0, 168.0), Some(scope));
        assert_eq!(c.banding, Banding::Letterbox);
        assert!(close(c.thumb.height, 90.0));
        assert!(close(c.offset.y, 39.0));
        assert_eq!(c.offset.x, 0.0);
    }

    #[test]
    fn unknown_cover_skips_correction() {
        let thumb = Size::new(400.0, 168.0);
        assert_eq!(correct_aspect(thumb, None), AspectCorrection::identity(thumb));
        assert_eq!(
            correct_aspect(thumb, Some(Size::new(0.0, 0.0))),
            AspectCorrection::identity(thumb)
        );
    }
}
