// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer-drag state machine.
//!
//! Converts a raw pointer stream bound to one element into a reusable
//! drag abstraction, independent of what is being dragged (canvas
//! background, a node, or a connector). The cycle is
//! `Idle -> Active -> Move -> Idle`; events arriving outside the states
//! that accept them are ignored, which bounds handling cost to the
//! lifetime of a gesture and guarantees at most one session per element.

use wireflow_graph::Position;

/// Pointer button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary (usually left) button; the only one that starts a drag
    Primary,
    /// Secondary (usually right) button
    Secondary,
    /// Auxiliary (usually middle) button
    Auxiliary,
}

/// Drag gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No pointer button held on the bound element
    #[default]
    Idle,
    /// Primary button pressed; delta captured, no movement yet
    Active,
    /// Pointer moving while pressed; position is live
    Move,
}

/// A drag session over one element, generic over the drop-target token
/// captured at release (the "element below" the pointer).
#[derive(Debug, Clone)]
pub struct DragController<T> {
    state: DragState,
    position: Position,
    delta: Position,
    external_offset: Position,
    zoom: f32,
    drop_target: Option<T>,
}

impl<T: Clone> DragController<T> {
    /// Create a controller with a seed position
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            state: DragState::Idle,
            position: Position::new(x, y),
            delta: Position::ZERO,
            external_offset: Position::ZERO,
            zoom: 1.0,
            drop_target: None,
        }
    }

    /// External offset added to every computed position (keeps a dragged
    /// node's on-screen position consistent with camera panning)
    pub fn with_external_offset(mut self, offset: Position) -> Self {
        self.external_offset = offset;
        self
    }

    /// Zoom divisor applied to computed positions, making them
    /// zoom-invariant in canvas units. Non-positive values are ignored.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        if zoom > 0.0 {
            self.zoom = zoom;
        }
        self
    }

    /// Current gesture state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Live output position (meaningful from the first move onward)
    pub fn position(&self) -> Position {
        self.position
    }

    /// Drop target captured by the last completed drag, if that gesture
    /// actually moved
    pub fn drop_target(&self) -> Option<&T> {
        self.drop_target.as_ref()
    }

    /// Begin a gesture. Only the primary button in the `Idle` state
    /// starts one; `origin` is the bound element's current on-screen
    /// origin, from which the pointer delta is captured.
    pub fn press(&mut self, button: PointerButton, pointer: Position, origin: Position) {
        if button != PointerButton::Primary || self.state != DragState::Idle {
            return;
        }

        self.delta = pointer - origin;
        self.drop_target = None;
        self.state = DragState::Active;
    }

    /// Pointer movement. Ignored while `Idle`; otherwise transitions to
    /// `Move` and updates the live position:
    /// `(pointer - delta + external_offset) / zoom`.
    pub fn motion(&mut self, pointer: Position) {
        if self.state == DragState::Idle {
            return;
        }

        self.state = DragState::Move;
        self.position = (pointer - self.delta + self.external_offset).scale(1.0 / self.zoom);
    }

    /// End the gesture and return to `Idle`.
    ///
    /// `below` identifies the element currently under the pointer. It is
    /// reported back only when the gesture actually moved; a press with
    /// no movement is a click, and must not resolve a drop target from a
    /// stale cycle.
    pub fn release(&mut self, below: Option<T>) -> Option<T> {
        let target = if self.state == DragState::Move {
            below
        } else {
            None
        };

        self.drop_target = target.clone();
        self.state = DragState::Idle;
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_without_movement_reports_no_drop_target() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0);

        drag.press(PointerButton::Primary, Position::new(5.0, 5.0), Position::ZERO);
        assert_eq!(drag.state(), DragState::Active);

        assert_eq!(drag.release(Some(7)), None);
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.drop_target(), None);
    }

    #[test]
    fn test_full_gesture_reports_drop_target() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0);

        drag.press(PointerButton::Primary, Position::new(5.0, 5.0), Position::ZERO);
        drag.motion(Position::new(9.0, 6.0));
        assert_eq!(drag.state(), DragState::Move);

        assert_eq!(drag.release(Some(7)), Some(7));
        assert_eq!(drag.drop_target(), Some(&7));
    }

    #[test]
    fn test_stale_target_cleared_on_next_press() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0);

        drag.press(PointerButton::Primary, Position::ZERO, Position::ZERO);
        drag.motion(Position::new(1.0, 1.0));
        drag.release(Some(7));
        assert_eq!(drag.drop_target(), Some(&7));

        // The next click (no movement) must not resurface the old target.
        drag.press(PointerButton::Primary, Position::ZERO, Position::ZERO);
        assert_eq!(drag.release(Some(9)), None);
        assert_eq!(drag.drop_target(), None);
    }

    #[test]
    fn test_non_primary_buttons_ignored() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0);

        drag.press(PointerButton::Secondary, Position::ZERO, Position::ZERO);
        assert_eq!(drag.state(), DragState::Idle);
        drag.press(PointerButton::Auxiliary, Position::ZERO, Position::ZERO);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_motion_in_idle_ignored() {
        let mut drag: DragController<u32> = DragController::new(3.0, 4.0);
        drag.motion(Position::new(50.0, 50.0));
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.position(), Position::new(3.0, 4.0));
    }

    #[test]
    fn test_one_session_per_element() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0);

        drag.press(PointerButton::Primary, Position::new(10.0, 0.0), Position::ZERO);
        // A second press mid-gesture must not recapture the delta.
        drag.press(PointerButton::Primary, Position::new(99.0, 99.0), Position::ZERO);
        drag.motion(Position::new(12.0, 0.0));
        assert_eq!(drag.position(), Position::new(2.0, 0.0));
    }

    #[test]
    fn test_position_is_zoom_invariant() {
        let mut drag: DragController<u32> = DragController::new(0.0, 0.0)
            .with_external_offset(Position::new(-10.0, 0.0))
            .with_zoom(2.0);

        // Element origin at (20, 20) on screen, grabbed at (25, 25).
        drag.press(
            PointerButton::Primary,
            Position::new(25.0, 25.0),
            Position::new(20.0, 20.0),
        );
        drag.motion(Position::new(35.0, 25.0));

        // Screen origin moved to (30, 20); canvas = (30 - 10, 20 + 0) / 2.
        assert_eq!(drag.position(), Position::new(10.0, 10.0));
    }
}
