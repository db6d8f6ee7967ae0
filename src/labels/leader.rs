use serde::{Deserialize, Serialize};

use crate::ir::{ChartFrame, Point, Side};

/// Three-point connector from the arc to the label text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    /// On the outer arc.
    pub p0: Point,
    /// Displaced label point.
    pub p1: Point,
    /// Horizontal terminus next to the text.
    pub p2: Point,
}

impl LeaderLine {
    pub fn points(&self) -> [Point; 3] {
        [self.p0, self.p1, self.p2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderGeometry {
    pub line: LeaderLine,
    pub text_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderStyle {
    pub length: f64,
    pub horizontal_margin: f64,
    pub text_offset: f64,
}

pub fn build_leader_line(
    anchor: Point,
    label: Point,
    side: Side,
    frame: &ChartFrame,
    style: &LeaderStyle,
) -> LeaderGeometry {
    let x_limit = frame.x_limit(style.horizontal_margin);
    let end_x = (label.x + style.length * side.sign())
        .max(frame.cx - x_limit)
        .min(frame.cx + x_limit);
    let p2 = Point::new(end_x, label.y);
    LeaderGeometry {
        line: LeaderLine {
            p0: anchor,
            p1: label,
            p2,
        },
        text_x: p2.x + style.text_offset * side.sign(),
    }
}
