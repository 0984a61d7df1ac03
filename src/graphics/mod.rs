//! Drawing seam between the machine core and whatever paints it.
//!
//! Components only ever talk to `dyn Graphics`; the terminal canvas in
//! `engine::canvas` is one implementation, tests use a recording one.

mod assets;
mod path;
mod polygon;

pub use assets::{ImageDir, PLACEHOLDER};
pub use glam::DVec2;
pub use path::Path;
pub(crate) use polygon::circle_points;
pub use polygon::{Polygon, point_in_polygon};

use std::path::PathBuf;

use crate::types::Color;

/// How the inside of a polygon is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Color(Color),
    /// A resolved image file. Backends that cannot show pictures texture it.
    Image(PathBuf),
}

/// Line style for strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub glyph: char,
}

impl Pen {
    pub const fn new(color: Color, glyph: char) -> Self {
        Pen { color, glyph }
    }
}

pub trait Graphics {
    /// Save the current transform.
    fn push_state(&mut self);

    /// Restore the transform saved by the matching `push_state`.
    fn pop_state(&mut self);

    fn translate(&mut self, offset: DVec2);

    fn scale(&mut self, factor: f64);

    fn fill_polygon(&mut self, points: &[DVec2], fill: &Fill);

    fn stroke_polyline(&mut self, points: &[DVec2], pen: &Pen);

    fn stroke_path(&mut self, path: &Path, pen: &Pen) {
        self.stroke_polyline(&path.flatten(), pen);
    }
}

/// Convert turns to a unit direction. Turn 0 points up the screen and
/// positive turns go clockwise (screen y grows downward).
pub fn direction(turns: f64) -> DVec2 {
    let angle = turns * std::f64::consts::TAU;
    DVec2::new(angle.sin(), -angle.cos())
}

/// Rotate `point` about the origin by `turns`, clockwise on screen.
pub fn rotate(point: DVec2, turns: f64) -> DVec2 {
    DVec2::from_angle(turns * std::f64::consts::TAU).rotate(point)
}


#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn direction_starts_up_and_turns_clockwise() {
        let up = direction(0.0);
        assert_abs_diff_eq!(up.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(up.y, -1.0, epsilon = 1e-12);

        let right = direction(0.25);
        assert_abs_diff_eq!(right.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(right.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_agrees_with_direction() {
        let tip = rotate(DVec2::new(0.0, -1.0), 0.125);
        let expected = direction(0.125);
        assert_abs_diff_eq!(tip.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(tip.y, expected.y, epsilon = 1e-12);
    }
}
