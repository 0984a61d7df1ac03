use glam::DVec2;

use super::{Fill, Graphics, ImageDir, rotate};
use crate::types::Color;

/// Vertex count used to approximate circles.
const CIRCLE_STEPS: usize = 32;

/// A filled outline defined around its own origin.
///
/// Placement and rotation (turns, clockwise, about the origin) are supplied
/// by the owning component at draw time, so one outline serves every pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<DVec2>,
    fill: Fill,
}

impl Polygon {
    pub fn new(points: Vec<DVec2>, fill: Fill) -> Self {
        Polygon { points, fill }
    }

    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        let points = vec![
            DVec2::new(x, y),
            DVec2::new(x + width, y),
            DVec2::new(x + width, y + height),
            DVec2::new(x, y + height),
        ];
        Polygon::new(points, Fill::Color(Color::rgb(128, 128, 128)))
    }

    /// Circle centred on the origin.
    pub fn circle(radius: f64) -> Self {
        Polygon::new(circle_points(radius), Fill::Color(Color::rgb(128, 128, 128)))
    }

    pub fn set_color(&mut self, color: Color) {
        self.fill = Fill::Color(color);
    }

    pub fn set_image(&mut self, images: &ImageDir, name: &str) {
        self.fill = images.fill(name);
    }

    /// Outline rotated by `turns` about the polygon origin and moved to `at`.
    pub fn vertices(&self, at: DVec2, turns: f64) -> Vec<DVec2> {
        self.points.iter().map(|p| at + rotate(*p, turns)).collect()
    }

    pub fn draw(&self, graphics: &mut dyn Graphics, at: DVec2, turns: f64) {
        if self.points.len() < 3 {
            return;
        }
        graphics.fill_polygon(&self.vertices(at, turns), &self.fill);
    }

    /// Hit test for a point given relative to the polygon origin, with the
    /// outline rotated by `turns`.
    pub fn contains(&self, local: DVec2, turns: f64) -> bool {
        point_in_polygon(&self.points, rotate(local, -turns))
    }
}

pub(crate) fn circle_points(radius: f64) -> Vec<DVec2> {
    (0..CIRCLE_STEPS)
        .map(|i| {
            let angle = i as f64 / CIRCLE_STEPS as f64 * std::f64::consts::TAU;
            DVec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(points: &[DVec2], p: DVec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn rectangle_contains_its_interior_only() {
        let rect = Polygon::rectangle(-10.0, 0.0, 20.0, 100.0);
        assert!(rect.contains(DVec2::new(0.0, 50.0), 0.0));
        assert!(!rect.contains(DVec2::new(0.0, -5.0), 0.0));
        assert!(!rect.contains(DVec2::new(15.0, 50.0), 0.0));
    }

    #[test]
    fn rotation_moves_the_hit_area() {
        // A stick pointing up; a quarter turn points it right.
        let stick = Polygon::rectangle(-2.0, -50.0, 4.0, 50.0);
        assert!(stick.contains(DVec2::new(0.0, -40.0), 0.0));

        assert!(!stick.contains(DVec2::new(0.0, -40.0), 0.25));
        assert!(stick.contains(DVec2::new(40.0, 0.0), 0.25));
    }

    #[test]
    fn vertices_are_placed_at_the_draw_position() {
        let rect = Polygon::rectangle(0.0, 0.0, 2.0, 2.0);
        let placed = rect.vertices(DVec2::new(10.0, 20.0), 0.0);
        assert_abs_diff_eq!(placed[2].x, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(placed[2].y, 22.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_hit_matches_radius() {
        let circle = Polygon::circle(10.0);
        assert!(circle.contains(DVec2::new(6.0, 6.0), 0.0));
        assert!(!circle.contains(DVec2::new(9.0, 9.0), 0.0));
    }
}
