//! Gesture session state.
//!
//! One session exists per mounted viewer. The live `scale`/`move_x`/`move_y`
//! track the transform as a gesture progresses; `committed` is the baseline
//! captured when the previous gesture completed. Handlers derive the live
//! transform from the committed record, and the committed record is replaced
//! wholesale by [`GestureSession::commit`] — never mutated mid-gesture.

use crate::geometry::Point;

/// Classification of the gesture currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Single-contact drag moving the content.
    Pan,
    /// Two-contact scale gesture.
    Pinch,
    /// Contacts are lifting; waiting for the contact count to reach zero.
    TouchEnd,
    /// Fast horizontal flick reported by the dispatcher.
    HorizontalSwipe,
    /// Fast vertical flick reported by the dispatcher.
    VerticalSwipe,
}

/// The transform committed at the start of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Committed {
    pub scale: f64,
    pub move_x: f64,
    pub move_y: f64,
}

impl Default for Committed {
    fn default() -> Self {
        Self { scale: 1.0, move_x: 0.0, move_y: 0.0 }
    }
}

/// Anchor data captured at the moment a two-contact gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchAnchor {
    /// Inter-contact distance at gesture start.
    pub initial_distance: f64,
    /// Pinch center's offset from the committed translation, container-local.
    pub center_offset: Point,
    /// Absolute container-local pinch center at gesture start, used to track
    /// the center's drift in draggable-on-pinch mode.
    pub initial_center: Point,
}

/// Per-viewer gesture state.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    /// Baseline replaced wholesale when a gesture completes.
    pub committed: Committed,
    /// Live scale, updated on every gesture event.
    pub scale: f64,
    /// Live translation X.
    pub move_x: f64,
    /// Live translation Y.
    pub move_y: f64,
    /// Active gesture classification.
    pub kind: GestureKind,
    /// Container-local pointer position captured at touchstart.
    pub start: Point,
    /// Pinch anchor; present only while a pinch is being tracked.
    pub pinch: Option<PinchAnchor>,
}

impl Default for GestureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            committed: Committed::default(),
            scale: 1.0,
            move_x: 0.0,
            move_y: 0.0,
            kind: GestureKind::Idle,
            start: Point::default(),
            pinch: None,
        }
    }

    /// Replace the committed baseline with the live transform.
    ///
    /// Called when a gesture completes or a programmatic zoom settles.
    pub fn commit(&mut self) {
        self.committed = Committed {
            scale: self.scale,
            move_x: self.move_x,
            move_y: self.move_y,
        };
    }

    /// Return to the identity transform and idle classification.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_identity_and_idle() {
        let session = GestureSession::new();
        assert_eq!(session.scale, 1.0);
        assert_eq!(session.move_x, 0.0);
        assert_eq!(session.move_y, 0.0);
        assert_eq!(session.kind, GestureKind::Idle);
        assert_eq!(session.committed, Committed::default());
        assert!(session.pinch.is_none());
    }

    #[test]
    fn commit_replaces_baseline_wholesale() {
        let mut session = GestureSession::new();
        session.scale = 2.5;
        session.move_x = -40.0;
        session.move_y = 13.0;
        session.commit();
        assert_eq!(
            session.committed,
            Committed { scale: 2.5, move_x: -40.0, move_y: 13.0 }
        );
        // Live values are untouched by a commit
        assert_eq!(session.scale, 2.5);
        assert_eq!(session.move_x, -40.0);
    }

    #[test]
    fn reset_restores_identity() {
        let mut session = GestureSession::new();
        session.scale = 3.0;
        session.move_x = 10.0;
        session.kind = GestureKind::Pinch;
        session.commit();
        session.reset();
        assert_eq!(session, GestureSession::new());
    }
}
