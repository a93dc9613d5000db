//! Gesture state machine and transform engine.
//!
//! [`PinchZoom`] consumes normalized [`GestureEvent`]s from the host's
//! dispatcher, classifies the active gesture, and derives the
//! `{scale, move_x, move_y}` transform that keeps content anchored under the
//! user's fingers or cursor. Every change is pushed through the
//! [`ViewerHost`] seam and announced via the zoom-change callback; the engine
//! itself never renders.
//!
//! All handlers follow the same error policy: a missing precondition
//! (no cached viewport rect, panning disabled, unloaded image) exits the
//! handler early, and boundary violations are clamped rather than rejected.

use std::time::Duration;

use log::debug;
use web_time::Instant;

use crate::bounds::{self, Extents};
use crate::config::{ConfigError, LimitZoom, ZoomConfig};
use crate::constants::NATURAL_SIZE_POLL_INTERVAL_MS;
use crate::events::{EventKind, GestureEvent, InputSource, SwipeAxis};
use crate::geometry::{self, Point, Rect, Size};
use crate::host::{AppliedTransform, ViewerHost, ZoomEvent};
use crate::session::{GestureKind, GestureSession, PinchAnchor};

/// One-shot state for resolving the "original image size" zoom limit.
///
/// Checks are driven by incoming events (and [`PinchZoom::refresh_max_scale`])
/// instead of a timer, rate limited to a 10 ms cadence. The state is dropped
/// on first success and on teardown, so a never-loading image stalls at the
/// default limit without leaking anything.
#[derive(Debug)]
struct NaturalSizeResolver {
    last_check: Option<Instant>,
}

/// The pinch-zoom gesture engine.
pub struct PinchZoom {
    config: ZoomConfig,
    host: Box<dyn ViewerHost>,
    session: GestureSession,
    /// Container bounding rect cached at gesture start; staleness is
    /// tolerated only within one gesture's lifetime.
    viewport: Option<Rect>,
    max_scale: f64,
    resolver: Option<NaturalSizeResolver>,
    on_zoom_change: Option<Box<dyn FnMut(ZoomEvent)>>,
    destroyed: bool,
}

impl PinchZoom {
    /// Create an engine bound to `host` with a validated configuration.
    ///
    /// Applies the base layout styles and the draggable attribute to the
    /// content immediately; [`PinchZoom::destroy`] reverts them.
    pub fn new(config: ZoomConfig, host: Box<dyn ViewerHost>) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_scale = config.initial_max_scale();
        let mut engine = Self {
            config,
            host,
            session: GestureSession::new(),
            viewport: None,
            max_scale,
            resolver: None,
            on_zoom_change: None,
            destroyed: false,
        };

        engine.host.apply_base_styles();
        engine.host.set_image_draggable(engine.config.draggable_image);
        engine.apply_auto_height();

        if engine.config.limit_zoom == LimitZoom::OriginalImageSize
            && engine.host.content_is_image()
        {
            engine.resolver = Some(NaturalSizeResolver { last_check: None });
            engine.resolve_max_scale(true);
        }

        Ok(engine)
    }

    /// Register the scale-change callback, builder style.
    #[must_use]
    pub fn on_zoom_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ZoomEvent) + 'static,
    {
        self.on_zoom_change = Some(Box::new(callback));
        self
    }

    // --- Dispatcher contract ---

    /// Whether the engine will act on events of `kind` under its
    /// configuration. Hosts use this to wire only the needed listeners.
    #[must_use]
    pub fn accepts(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::TouchStart
            | EventKind::TouchEnd
            | EventKind::Pan
            | EventKind::Pinch
            | EventKind::Swipe => true,
            EventKind::DoubleTap => self.config.double_tap,
            EventKind::Wheel => self.config.wheel,
            EventKind::Resize => self.config.auto_height,
        }
    }

    /// Feed one normalized gesture event into the state machine.
    pub fn handle_event(&mut self, event: &GestureEvent) {
        if self.destroyed || !self.accepts(event.kind()) {
            return;
        }

        match *event {
            GestureEvent::TouchStart { position, .. } => self.handle_touchstart(position),
            GestureEvent::TouchEnd { source, touches_remaining } => {
                self.handle_touchend(source, touches_remaining);
            }
            GestureEvent::Pan { position, source } => self.handle_pan(position, source),
            GestureEvent::Pinch { touches } => self.handle_pinch(touches),
            GestureEvent::DoubleTap { position } => self.handle_double_tap(position),
            GestureEvent::Wheel { position, delta_y } => self.handle_wheel(position, delta_y),
            GestureEvent::Swipe { axis } => self.handle_swipe(axis),
            GestureEvent::Resize => self.apply_auto_height(),
        }
    }

    // --- Gesture handlers ---

    fn handle_touchstart(&mut self, position: Point) {
        self.resolve_max_scale(false);
        self.viewport = self.host.viewport_rect();

        if self.session.kind == GestureKind::Idle {
            if let Some(rect) = self.viewport {
                self.session.start = rect.to_local(position);
            }
        }
    }

    fn handle_touchend(&mut self, source: InputSource, touches_remaining: usize) {
        match source {
            InputSource::Touch => {
                if self.session.scale < 1.0 {
                    self.set_scale(1.0);
                }

                if self.config.auto_zoom_out && self.session.kind == GestureKind::Pinch {
                    self.set_scale(1.0);
                }

                if self.session.kind == GestureKind::Pinch
                    || (self.session.kind == GestureKind::Pan
                        && self.session.scale > self.config.min_pan_scale)
                {
                    self.align_content();
                }

                if matches!(
                    self.session.kind,
                    GestureKind::Pan
                        | GestureKind::Pinch
                        | GestureKind::HorizontalSwipe
                        | GestureKind::VerticalSwipe
                ) {
                    self.session.commit();
                }

                if touches_remaining == 0 {
                    self.session.kind = GestureKind::Idle;
                    self.session.pinch = None;
                } else {
                    self.session.kind = GestureKind::TouchEnd;
                }
            }
            InputSource::Mouse => {
                self.session.commit();
                self.session.kind = GestureKind::Idle;
                self.session.pinch = None;
            }
        }
    }

    fn handle_pan(&mut self, position: Point, source: InputSource) {
        if self.session.scale < self.config.min_pan_scale || self.config.disable_pan {
            return;
        }
        let Some(rect) = self.viewport else {
            return;
        };

        let local = rect.to_local(position);
        self.session.kind = GestureKind::Pan;

        // Movement delta is anchored on the pointer position captured at
        // touchstart.
        let committed = self.session.committed;
        self.session.move_x = committed.move_x + (local.x - self.session.start.x);
        self.session.move_y = committed.move_y + (local.y - self.session.start.y);

        if self.config.limit_pan {
            self.apply_pan_limits();
        }

        // Mouse drags settle continuously; touch drags settle on release.
        if source == InputSource::Mouse && self.session.scale > self.config.min_pan_scale {
            self.settle_in_place();
        }

        self.apply_transform(0);
    }

    fn handle_pinch(&mut self, touches: [Point; 2]) {
        let Some(rect) = self.viewport else {
            return;
        };

        let current_distance = geometry::distance(touches[0], touches[1]);
        let local_center = geometry::midpoint(rect.to_local(touches[0]), rect.to_local(touches[1]));
        let committed = self.session.committed;

        if self.config.draggable_on_pinch {
            if self.session.kind != GestureKind::Pinch {
                self.session.pinch = Some(PinchAnchor {
                    initial_distance: current_distance,
                    center_offset: Point::new(
                        local_center.x - committed.move_x,
                        local_center.y - committed.move_y,
                    ),
                    initial_center: local_center,
                });
                self.session.kind = GestureKind::Pinch;
            }

            let Some(anchor) = self.session.pinch else {
                return;
            };
            if anchor.initial_distance == 0.0 {
                return;
            }

            let ratio = current_distance / anchor.initial_distance;
            self.set_scale(committed.scale * ratio);

            // Pinch center drift pans the content alongside the zoom.
            let drift_x = local_center.x - anchor.initial_center.x;
            let drift_y = local_center.y - anchor.initial_center.y;
            self.session.move_x = committed.move_x + drift_x - (ratio - 1.0) * anchor.center_offset.x;
            self.session.move_y = committed.move_y + drift_y - (ratio - 1.0) * anchor.center_offset.y;
        } else {
            match self.session.kind {
                // A second contact takes over from idle or an active pan,
                // re-anchoring on the new midpoint.
                GestureKind::Idle | GestureKind::Pan => {
                    self.session.pinch = Some(PinchAnchor {
                        initial_distance: current_distance,
                        center_offset: Point::new(
                            local_center.x - committed.move_x,
                            local_center.y - committed.move_y,
                        ),
                        initial_center: local_center,
                    });
                }
                GestureKind::Pinch => {}
                _ => return,
            }
            self.session.kind = GestureKind::Pinch;

            let Some(anchor) = self.session.pinch else {
                return;
            };
            if anchor.initial_distance == 0.0 {
                return;
            }

            let ratio = current_distance / anchor.initial_distance;
            self.set_scale(committed.scale * ratio);
            self.session.move_x =
                committed.move_x - (ratio * anchor.center_offset.x - anchor.center_offset.x);
            self.session.move_y =
                committed.move_y - (ratio * anchor.center_offset.y - anchor.center_offset.y);
        }

        self.enforce_scale_limits();
        if self.config.limit_pan {
            self.apply_pan_limits();
        }
        self.apply_transform(0);
    }

    fn handle_double_tap(&mut self, position: Point) {
        self.toggle_zoom_at(Some(position));
    }

    fn handle_wheel(&mut self, position: Point, delta_y: f64) {
        self.resolve_max_scale(false);

        let factor = self.config.wheel_zoom_factor;
        let step = if delta_y < 0.0 { factor } else { -factor };
        let mut new_scale = self.session.committed.scale + step;

        // Snap to the exact boundary instead of stranding the user within one
        // step-width of it. The max-side window is symmetric so accumulated
        // float error in repeated steps still lands on the limit exactly.
        if new_scale < 1.0 + factor {
            new_scale = 1.0;
        } else if (new_scale - self.max_scale).abs() < factor {
            new_scale = self.max_scale;
        }

        if new_scale < 1.0 || new_scale > self.max_scale {
            return;
        }
        if new_scale == self.session.scale {
            return;
        }

        self.viewport = self.host.viewport_rect();
        let Some(rect) = self.viewport else {
            return;
        };

        let committed = self.session.committed;
        let center = Point::new(
            position.x - rect.left - committed.move_x,
            position.y - rect.top - committed.move_y,
        );
        self.set_zoom(new_scale, Some(center));
    }

    fn handle_swipe(&mut self, axis: SwipeAxis) {
        if self.session.kind == GestureKind::Idle {
            self.session.kind = match axis {
                SwipeAxis::Horizontal => GestureKind::HorizontalSwipe,
                SwipeAxis::Vertical => GestureKind::VerticalSwipe,
            };
        }
    }

    // --- Programmatic zoom API ---

    /// Zoom in by `step`, clamped to the maximum scale.
    ///
    /// Returns the resulting scale.
    pub fn zoom_in(&mut self, step: f64) -> f64 {
        if self.destroyed {
            return self.session.scale;
        }
        let target = (self.session.scale + step).min(self.max_scale);
        if target != self.session.scale {
            self.set_zoom(target, None);
        }
        self.session.scale
    }

    /// Zoom out by `step`, clamped to the minimum scale.
    ///
    /// Returns the resulting scale.
    pub fn zoom_out(&mut self, step: f64) -> f64 {
        if self.destroyed {
            return self.session.scale;
        }
        let target = (self.session.scale - step).max(self.config.min_scale);
        if target != self.session.scale {
            self.set_zoom(target, None);
        }
        self.session.scale
    }

    /// Toggle between the identity transform and the configured control
    /// scale, centered on the element.
    pub fn toggle_zoom(&mut self) {
        self.toggle_zoom_at(None);
    }

    /// Toggle zoom centered on `point` (client coordinates): zoom to
    /// `zoom_control_scale + 1` from identity, back to identity otherwise.
    pub fn zoom_at_point(&mut self, point: Point) {
        if self.destroyed {
            return;
        }
        if self.session.committed.scale == 1.0 {
            self.viewport = self.host.viewport_rect();
            let Some(rect) = self.viewport else {
                return;
            };
            let committed = self.session.committed;
            let center = Point::new(
                point.x - rect.left - committed.move_x,
                point.y - rect.top - committed.move_y,
            );
            let target = committed.scale * (self.config.zoom_control_scale + 1.0);
            self.set_zoom(target, Some(center));
        } else {
            self.reset_zoom();
        }
    }

    /// Return to `scale = 1`, `move = (0, 0)` with an animated transition.
    pub fn reset_zoom(&mut self) {
        if self.destroyed {
            return;
        }
        self.set_scale(1.0);
        self.session.move_x = 0.0;
        self.session.move_y = 0.0;
        self.session.commit();
        self.apply_transform(self.config.transition_duration);
        debug!("🔄 zoom reset");
    }

    fn toggle_zoom_at(&mut self, tap: Option<Point>) {
        if self.destroyed {
            return;
        }
        if self.session.committed.scale != 1.0 {
            self.reset_zoom();
            return;
        }

        let committed = self.session.committed;
        match tap {
            Some(position) => {
                let Some(rect) = self.viewport else {
                    return;
                };
                let local = rect.to_local(position);
                let tap_scale = self.config.double_tap_scale;
                self.set_scale(committed.scale * tap_scale);
                self.session.move_x = committed.move_x - local.x * (tap_scale - 1.0);
                self.session.move_y = committed.move_y - local.y * (tap_scale - 1.0);
            }
            None => {
                self.set_scale(committed.scale * (self.config.zoom_control_scale + 1.0));
                if let Some(element) = self.host.element_size() {
                    self.session.move_x =
                        committed.move_x - (element.width * (self.session.scale - 1.0)) / 2.0;
                    self.session.move_y =
                        committed.move_y - (element.height * (self.session.scale - 1.0)) / 2.0;
                }
            }
        }

        self.settle_in_place();
        self.session.commit();
        self.apply_transform(self.config.transition_duration);
    }

    /// The shared "apply a new scale" path: recenter, settle, commit,
    /// animate. `center` is element-local, relative to the committed
    /// translation; `None` recenters on the element's middle.
    fn set_zoom(&mut self, scale: f64, center: Option<Point>) {
        self.set_scale(scale);
        let committed = self.session.committed;

        if let Some(element) = self.host.element_size() {
            if committed.scale != 0.0 {
                let ratio = scale / committed.scale;
                let center = center.unwrap_or_else(|| {
                    Point::new(
                        element.width / 2.0 - committed.move_x,
                        element.height / 2.0 - committed.move_y,
                    )
                });
                self.session.move_x = committed.move_x - (ratio * center.x - center.x);
                self.session.move_y = committed.move_y - (ratio * center.y - center.y);
            }
        }

        self.settle_in_place();
        self.session.commit();
        self.apply_transform(self.config.transition_duration);
        debug!(
            "🔍 zoom {:.2}x, move ({:.1}, {:.1})",
            self.session.scale, self.session.move_x, self.session.move_y
        );
    }

    // --- Limits & alignment ---

    /// Clamp the scale into `[min_scale, max_scale]`, rescaling the
    /// translation first so the pan-to-overflow ratio survives the clamp.
    fn enforce_scale_limits(&mut self) {
        let over_max = self.session.scale > self.max_scale;
        let under_min = self.session.scale <= self.config.min_scale;
        if !over_max && !under_min {
            return;
        }

        let Some(image) = self.host.image_size() else {
            return;
        };
        if !image.is_laid_out() {
            return;
        }

        let enlarged_width = image.width * self.session.scale;
        let enlarged_height = image.height * self.session.scale;
        let move_x_ratio = overflow_ratio(self.session.move_x, enlarged_width - image.width);
        let move_y_ratio = overflow_ratio(self.session.move_y, enlarged_height - image.height);

        if over_max {
            self.set_scale(self.max_scale);
        }
        if self.session.scale <= self.config.min_scale {
            self.set_scale(self.config.min_scale);
        }

        let clamped_width = image.width * self.session.scale;
        let clamped_height = image.height * self.session.scale;
        self.session.move_x = -(move_x_ratio * (clamped_width - image.width)).abs();
        self.session.move_y = -(move_y_ratio * (clamped_height - image.height)).abs();
    }

    /// Clamp both pan axes against the current layout.
    fn apply_pan_limits(&mut self) {
        let Some(extents) = self.clamp_extents() else {
            return;
        };
        self.session.move_y = bounds::limit_pan(
            self.session.move_y,
            extents.image.height,
            extents.element.height,
            extents.viewport.height,
            self.session.scale,
        );
        self.session.move_x = bounds::limit_pan(
            self.session.move_x,
            extents.image.width,
            extents.element.width,
            extents.viewport.width,
            self.session.scale,
        );
    }

    /// Run the centering pass on the live translation. Returns whether it
    /// changed anything.
    fn settle_in_place(&mut self) -> bool {
        let layout = self.clamp_extents();
        let (x, y) = bounds::settle(
            self.session.move_x,
            self.session.move_y,
            self.session.scale,
            layout.as_ref(),
        );
        let changed = x != self.session.move_x || y != self.session.move_y;
        self.session.move_x = x;
        self.session.move_y = y;
        changed
    }

    /// Alignment pass at gesture end: settle, and only when that moved the
    /// content, commit and animate. Calling this twice in a row never
    /// produces a second visible motion.
    fn align_content(&mut self) {
        if self.settle_in_place() {
            self.session.commit();
            self.apply_transform(self.config.transition_duration);
        }
    }

    fn clamp_extents(&self) -> Option<Extents> {
        let image = self.host.image_size()?;
        let element = self.host.element_size()?;
        let rect = self.host.viewport_rect()?;
        Some(Extents {
            image,
            element,
            viewport: Size::new(rect.width, rect.height),
        })
    }

    // --- Max-scale resolution ---

    /// Re-check the natural image dimensions immediately, bypassing the rate
    /// limit. Hosts call this from their image-load notification.
    pub fn refresh_max_scale(&mut self) {
        self.resolve_max_scale(true);
    }

    fn resolve_max_scale(&mut self, force: bool) {
        let Some(resolver) = self.resolver.as_mut() else {
            return;
        };
        if !force {
            if let Some(last) = resolver.last_check {
                if last.elapsed() < Duration::from_millis(NATURAL_SIZE_POLL_INTERVAL_MS) {
                    return;
                }
            }
        }
        resolver.last_check = Some(Instant::now());

        let natural = self.host.natural_image_size();
        let displayed = self.host.image_size();
        if let (Some(natural), Some(displayed)) = (natural, displayed) {
            if natural.width > 0.0 && displayed.width > 0.0 {
                self.max_scale = natural.width / displayed.width;
                self.resolver = None;
                debug!("max scale resolved from natural image size: {:.3}", self.max_scale);
            }
        }
    }

    // --- Auto-height ---

    fn apply_auto_height(&mut self) {
        if !self.config.auto_height {
            return;
        }
        let Some(natural) = self.host.natural_image_size() else {
            return;
        };
        if !natural.is_laid_out() {
            return;
        }
        let Some(rect) = self.host.viewport_rect() else {
            return;
        };
        let aspect = natural.width / natural.height;
        self.host.set_image_max_height(Some(rect.width / aspect));
    }

    // --- Queries ---

    /// The current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.session.scale
    }

    /// The current transform triple.
    #[must_use]
    pub fn transform(&self) -> ZoomEvent {
        ZoomEvent {
            scale: self.session.scale,
            move_x: self.session.move_x,
            move_y: self.session.move_y,
        }
    }

    /// The effective maximum scale (configured, or resolved from the natural
    /// image size).
    #[must_use]
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Whether the content is scaled past the identity transform.
    #[must_use]
    pub fn is_zoomed_in(&self) -> bool {
        self.session.scale > 1.0
    }

    /// Whether the current scale has reached the maximum.
    #[must_use]
    pub fn is_zoom_limit_reached(&self) -> bool {
        self.session.scale >= self.max_scale
    }

    /// The configuration this engine was constructed with.
    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Whether the scaled content exceeds the viewport on either axis.
    ///
    /// `None` below scale 1 (indeterminate) or when layout data is missing.
    #[must_use]
    pub fn is_dragging(&self) -> Option<bool> {
        if self.config.disable_pan {
            return Some(false);
        }
        let image = self.host.image_size()?;
        let rect = self.host.viewport_rect()?;

        if self.session.scale > 1.0 {
            Some(
                image.height * self.session.scale > rect.height
                    || image.width * self.session.scale > rect.width,
            )
        } else if self.session.scale == 1.0 {
            Some(image.height > rect.height || image.width > rect.width)
        } else {
            None
        }
    }

    // --- Teardown ---

    /// Revert all style mutations and stop reacting to input.
    ///
    /// Idempotent; the host detaches its listeners separately.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.host.remove_base_styles();
        self.host.set_image_draggable(true);
        self.host.set_image_max_height(None);
        self.resolver = None;
        self.destroyed = true;
        debug!("pinch-zoom engine destroyed");
    }

    // --- Internals ---

    fn set_scale(&mut self, scale: f64) {
        self.session.scale = scale;
        if let Some(callback) = self.on_zoom_change.as_mut() {
            callback(ZoomEvent {
                scale: self.session.scale,
                move_x: self.session.move_x,
                move_y: self.session.move_y,
            });
        }
    }

    fn apply_transform(&mut self, transition_ms: u32) {
        self.host.apply_transform(AppliedTransform {
            scale: self.session.scale,
            move_x: self.session.move_x,
            move_y: self.session.move_y,
            transition_ms,
        });
    }
}

/// Ratio of a pan offset to the content overflow it sits in; 0 when there is
/// no overflow.
fn overflow_ratio(move_offset: f64, overflow: f64) -> f64 {
    if overflow == 0.0 { 0.0 } else { move_offset / overflow }
}
