//! Gesture event vocabulary.
//!
//! The low-level dispatcher (owned by the host) normalizes raw browser or
//! platform input into these named events and feeds them to
//! [`PinchZoom::handle_event`](crate::PinchZoom::handle_event). Positions are
//! client coordinates in CSS pixels; the engine converts them into
//! container-local space using the bounding rect captured at gesture start.

use crate::geometry::Point;

/// Where a normalized event originated.
///
/// A few behaviors differ between the two: mouse release commits the gesture
/// immediately, and mouse-move panning runs the centering pass while touch
/// panning defers it to gesture end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
}

/// Axis of a swipe reported by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAxis {
    Horizontal,
    Vertical,
}

/// A normalized gesture event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// First contact of an interaction (touch down or mouse down).
    TouchStart {
        position: Point,
        source: InputSource,
    },
    /// A contact lifted (touch up or mouse up). `touches_remaining` is the
    /// number of contacts still down after this event (always 0 for mouse).
    TouchEnd {
        source: InputSource,
        touches_remaining: usize,
    },
    /// Single-contact movement (touch drag or mouse drag).
    Pan {
        position: Point,
        source: InputSource,
    },
    /// Two-contact movement; both current contact positions.
    Pinch { touches: [Point; 2] },
    /// Two taps in quick succession at `position`.
    DoubleTap { position: Point },
    /// Wheel tick at `position`; `delta_y` is positive when scrolling down.
    Wheel { position: Point, delta_y: f64 },
    /// A fast single-contact flick classified by the dispatcher.
    Swipe { axis: SwipeAxis },
    /// The viewer's container was resized.
    Resize,
}

impl GestureEvent {
    /// The event's kind, for interest checks.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GestureEvent::TouchStart { .. } => EventKind::TouchStart,
            GestureEvent::TouchEnd { .. } => EventKind::TouchEnd,
            GestureEvent::Pan { .. } => EventKind::Pan,
            GestureEvent::Pinch { .. } => EventKind::Pinch,
            GestureEvent::DoubleTap { .. } => EventKind::DoubleTap,
            GestureEvent::Wheel { .. } => EventKind::Wheel,
            GestureEvent::Swipe { .. } => EventKind::Swipe,
            GestureEvent::Resize => EventKind::Resize,
        }
    }
}

/// Named event kinds, used by the host to wire only the listeners the engine
/// will act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TouchStart,
    TouchEnd,
    Pan,
    Pinch,
    DoubleTap,
    Wheel,
    Swipe,
    Resize,
}
