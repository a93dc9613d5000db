//! Bounds & alignment policy.
//!
//! Pure translation clamps invoked by the engine after every gesture-driven
//! change and during the settle pass at gesture end. Both axes use the same
//! law, so each function works on one axis worth of lengths.
//!
//! Three nested boxes are involved: the displayed (unscaled) image, the
//! zoomed element wrapping it, and the viewport containing the element.

use crate::geometry::Size;

/// Lengths of the three nested boxes, per axis via `Size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    /// Displayed image size, unscaled.
    pub image: Size,
    /// Zoomed element size, unscaled.
    pub element: Size,
    /// Viewport (container) size.
    pub viewport: Size,
}

/// Clamp a single-axis translation so scaled content cannot reveal empty
/// space beyond its edges.
///
/// When the scaled content is smaller than the viewport on this axis the
/// translation centers it in the slack; otherwise the translation is bounded
/// by the symmetric overflow margin `(image − element) × scale / 2` on the
/// near side and by the far content edge on the other.
#[must_use]
pub fn limit_pan(
    move_offset: f64,
    image_len: f64,
    element_len: f64,
    viewport_len: f64,
    scale: f64,
) -> f64 {
    let scaled_image_len = image_len * scale;

    if scaled_image_len < viewport_len {
        return (viewport_len - element_len * scale) / 2.0;
    }

    let overflow = (image_len - element_len) * scale / 2.0;
    if move_offset > overflow {
        overflow
    } else if scaled_image_len + overflow.abs() - viewport_len + move_offset < 0.0 {
        -(scaled_image_len + overflow.abs() - viewport_len)
    } else {
        move_offset
    }
}

/// The combined centering pass.
///
/// Forces a translation that drags content back toward the origin to stay
/// non-positive, applies both axis clamps when layout data is available, and
/// special-cases scales below 100% so content cannot overshoot past the
/// right/bottom edge. Returns the corrected translation; callers compare it
/// against the input to decide whether an animated settle is needed.
#[must_use]
pub fn settle(move_x: f64, move_y: f64, scale: f64, layout: Option<&Extents>) -> (f64, f64) {
    let mut x = move_x.min(0.0);
    let mut y = move_y.min(0.0);

    if let Some(extents) = layout {
        y = limit_pan(
            y,
            extents.image.height,
            extents.element.height,
            extents.viewport.height,
            scale,
        );
        x = limit_pan(
            x,
            extents.image.width,
            extents.element.width,
            extents.viewport.width,
            scale,
        );

        if scale < 1.0 {
            let right_edge_floor = extents.element.width * (1.0 - scale);
            if x < right_edge_floor {
                x = right_edge_floor;
            }
        }
    }

    (x, y)
}
