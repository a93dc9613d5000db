//! Host integration seams.
//!
//! The engine never touches the page itself. Everything it needs to read
//! (layout geometry) or write (the applied transform and a small set of
//! layout styles) goes through the [`ViewerHost`] trait, implemented by the
//! enclosing component against the real element tree.

use crate::geometry::{Rect, Size};

/// The transform pushed to the host after every gesture-driven change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedTransform {
    pub scale: f64,
    pub move_x: f64,
    pub move_y: f64,
    /// Transition duration in milliseconds; 0 for live gesture tracking,
    /// the configured duration for animated settles.
    pub transition_ms: u32,
}

impl AppliedTransform {
    /// The equivalent 2D affine matrix `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn matrix(&self) -> [f64; 6] {
        [self.scale, 0.0, 0.0, self.scale, self.move_x, self.move_y]
    }
}

/// Scale-change notification payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomEvent {
    pub scale: f64,
    pub move_x: f64,
    pub move_y: f64,
}

/// Layout reads and style writes the engine delegates to its host.
///
/// Layout getters return `None` whenever the backing element is not mounted
/// or not laid out yet; the engine skips the dependent computation in that
/// case rather than failing.
pub trait ViewerHost {
    /// Bounding rect of the viewer's container, in client coordinates.
    ///
    /// Captured by the engine at gesture start for pointer math; re-read for
    /// size-dependent clamping so layout changes between gestures are seen.
    fn viewport_rect(&self) -> Option<Rect>;

    /// Displayed size of the zoomed element, unscaled.
    fn element_size(&self) -> Option<Size>;

    /// Displayed size of the inner image, unscaled, if the content is one.
    fn image_size(&self) -> Option<Size>;

    /// Natural (source resolution) size of the inner image once loaded.
    fn natural_image_size(&self) -> Option<Size>;

    /// Whether the zoomed content is an image element.
    fn content_is_image(&self) -> bool {
        true
    }

    /// Apply the transform matrix and transition duration to the content.
    fn apply_transform(&mut self, transform: AppliedTransform);

    /// Apply the base layout styles: flex centering on the container, a
    /// top-left transform origin, and 100% max-width/height on the image.
    fn apply_base_styles(&mut self);

    /// Revert everything `apply_base_styles` set.
    fn remove_base_styles(&mut self);

    /// Set the image element's `draggable` attribute.
    fn set_image_draggable(&mut self, draggable: bool);

    /// Constrain the image's max-height in pixels; `None` removes the
    /// constraint. Used by auto-height.
    fn set_image_max_height(&mut self, max_height_px: Option<f64>);
}
