use kurbo::{Point, Size};

/// Scale that makes `content` fill `container`, cropping the overflow.
pub fn cover_scale(container: Size, content: Size) -> f64 {
    let (sx, sy) = axis_scales(container, content);
    finite_or_zero(sx.max(sy))
}

/// Scale that fits all of `content` inside `container`.
pub fn contain_scale(container: Size, content: Size) -> f64 {
    let (sx, sy) = axis_scales(container, content);
    finite_or_zero(sx.min(sy))
}

/// Top-left of `inner` when centered in `outer`; negative when `inner` overflows.
pub fn center_offset(inner: Size, outer: Size) -> Point {
    Point::new(
        (outer.width - inner.width) / 2.0,
        (outer.height - inner.height) / 2.0,
    )
}

/// `width / height`, or 0 for a degenerate size.
pub fn aspect_ratio(size: Size) -> f64 {
    if size.height > 0.0 {
        finite_or_zero(size.width / size.height)
    } else {
        0.0
    }
}

fn axis_scales(container: Size, content: Size) -> (f64, f64) {
    if content.width <= 0.0 || content.height <= 0.0 {
        return (0.0, 0.0);
    }
    (
        container.width.max(0.0) / content.width,
        container.height.max(0.0) / content.height,
    )
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_uses_larger_axis() {
        let s = cover_scale(Size::new(640.0, 360.0), Size::new(160.0, 120.0));
        assert!((s - 4.0).abs() < 1e-9);
    }

    #[test]
    fn contain_uses_smaller_axis() {
        let s = contain_scale(Size::new(640.0, 360.0), Size::new(160.0, 120.0));
        assert!((s - 3.0).abs() < 1e-9);
    }

    #[test]
    fn centered_content_can_overflow() {
        let p = center_offset(Size::new(700.0, 300.0), Size::new(640.0, 360.0));
        assert_eq!(p, Point::new(-30.0, 30.0));
    }

    #[test]
    fn degenerate_sizes_scale_to_zero() {
        assert_eq!(cover_scale(Size::new(640.0, 360.0), Size::ZERO), 0.0);
        assert_eq!(contain_scale(Size::ZERO, Size::new(10.0, 10.0)), 0.0);
        assert_eq!(aspect_ratio(Size::new(10.0, 0.0)), 0.0);
    }
}
