// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector-to-connector path construction.
//!
//! Pure functions from two endpoints to a renderer-agnostic command
//! list. The bezier form is used for the live rubber-band line, the
//! stepped form for committed connections.

use serde::{Deserialize, Serialize};
use wireflow_graph::Position;

/// Minimum clearance before a stepped path turns a corner
const STEP_MIN_DIFF: f32 = 15.0;

/// One drawing command of a connector path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a subpath
    MoveTo(Position),
    /// Straight segment
    LineTo(Position),
    /// Quadratic curve
    QuadTo {
        /// Control point
        ctrl: Position,
        /// End point
        to: Position,
    },
    /// Cubic curve
    CubicTo {
        /// First control point
        ctrl1: Position,
        /// Second control point
        ctrl2: Position,
        /// End point
        to: Position,
    },
}

/// Smooth cubic path between two connectors, with control points at the
/// horizontal midpoint.
pub fn bezier_path(p0: Position, p1: Position) -> Vec<PathCommand> {
    let cx = (p0.x + p1.x) / 2.0;

    vec![
        PathCommand::MoveTo(p0),
        PathCommand::CubicTo {
            ctrl1: Position::new(cx, p0.y),
            ctrl2: Position::new(cx, p1.y),
            to: p1,
        },
    ]
}

/// Orthogonal stepped path between two connectors: horizontal run, two
/// quarter-turn corners around the midpoint, horizontal run.
pub fn stepped_path(p0: Position, p1: Position) -> Vec<PathCommand> {
    let offset = if (p1.y - p0.y).abs() < STEP_MIN_DIFF * 2.0 {
        (p1.y - p0.y).abs() / 2.0
    } else {
        STEP_MIN_DIFF
    };

    let offset_y = if p1.y < p0.y { -offset } else { offset };
    let offset_x = if p1.x - p0.x < -STEP_MIN_DIFF * 2.0 {
        -offset
    } else {
        offset
    };

    let cx = (p1.x - p0.x) / 2.0 + p0.x;

    vec![
        PathCommand::MoveTo(p0),
        PathCommand::LineTo(Position::new(cx - offset_x, p0.y)),
        PathCommand::QuadTo {
            ctrl: Position::new(cx, p0.y),
            to: Position::new(cx, p0.y + offset_y),
        },
        PathCommand::LineTo(Position::new(cx, p1.y - offset_y)),
        PathCommand::QuadTo {
            ctrl: Position::new(cx, p1.y),
            to: Position::new(cx + offset_x, p1.y),
        },
        PathCommand::LineTo(p1),
    ]
}

/// Flatten a command list into points for renderers that only draw line
/// segments. Curves are sampled with `segments` subdivisions each.
pub fn flatten(path: &[PathCommand], segments: usize) -> Vec<Position> {
    let mut points = Vec::new();
    let mut current = Position::ZERO;

    for command in path {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                points.push(p);
                current = p;
            }
            PathCommand::QuadTo { ctrl, to } => {
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let mt = 1.0 - t;
                    let x = mt * mt * current.x + 2.0 * mt * t * ctrl.x + t * t * to.x;
                    let y = mt * mt * current.y + 2.0 * mt * t * ctrl.y + t * t * to.y;
                    points.push(Position::new(x, y));
                }
                current = to;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let t2 = t * t;
                    let t3 = t2 * t;
                    let mt = 1.0 - t;
                    let mt2 = mt * mt;
                    let mt3 = mt2 * mt;

                    let x = mt3 * current.x
                        + 3.0 * mt2 * t * ctrl1.x
                        + 3.0 * mt * t2 * ctrl2.x
                        + t3 * to.x;
                    let y = mt3 * current.y
                        + 3.0 * mt2 * t * ctrl1.y
                        + 3.0 * mt * t2 * ctrl2.y
                        + t3 * to.y;
                    points.push(Position::new(x, y));
                }
                current = to;
            }
        }
    }

    points
}
