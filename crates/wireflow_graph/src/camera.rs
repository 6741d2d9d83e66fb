// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera state: the pan offset + zoom factor defining the
//! canvas-to-screen transform `screen = canvas * zoom + offset`.

use crate::geometry::Position;
use serde::{Deserialize, Serialize};

/// Minimum zoom factor
pub const ZOOM_MIN: f32 = 0.5;
/// Maximum zoom factor
pub const ZOOM_MAX: f32 = 2.0;
/// Zoom change per wheel event
pub const WHEEL_ZOOM_STEP: f32 = 0.03;
/// Zoom change per control-button press
pub const BUTTON_ZOOM_STEP: f32 = 0.1;

/// Session-wide view transform over the infinite canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen-space pan offset
    pub offset: Position,
    /// Zoom factor, always within `[ZOOM_MIN, ZOOM_MAX]`
    pub zoom: f32,
}

impl Camera {
    /// Create a camera at the origin with unit zoom
    pub fn new() -> Self {
        Self {
            offset: Position::ZERO,
            zoom: 1.0,
        }
    }

    /// Set the zoom factor, clamped to the valid range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Step the zoom in by one button increment
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + BUTTON_ZOOM_STEP);
    }

    /// Step the zoom out by one button increment
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - BUTTON_ZOOM_STEP);
    }

    /// Apply a wheel event at a screen-space cursor position.
    ///
    /// The zoom delta is bounded to one step per event (sign of the
    /// vertical wheel delta), the result is clamped, and the offset is
    /// recomputed so the canvas point under the cursor stays stationary
    /// on screen.
    pub fn wheel_zoom(&mut self, cursor: Position, scroll_delta: f32) {
        let delta = scroll_delta.clamp(-1.0, 1.0) * WHEEL_ZOOM_STEP;
        let new_zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);

        let ratio = 1.0 - new_zoom / self.zoom;
        self.offset += (cursor - self.offset).scale(ratio);
        self.zoom = new_zoom;
    }

    /// Center the view on a canvas-local position at unit zoom
    pub fn focus_on(&mut self, position: Position) {
        self.zoom = 1.0;
        self.offset = Position::new(-position.x, -position.y);
    }

    /// Canvas-local to screen coordinates
    pub fn canvas_to_screen(&self, canvas: Position) -> Position {
        canvas.scale(self.zoom) + self.offset
    }

    /// Screen to canvas-local coordinates
    pub fn screen_to_canvas(&self, screen: Position) -> Position {
        (screen - self.offset).scale(1.0 / self.zoom)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
