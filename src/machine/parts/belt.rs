use std::f64::consts::PI;

use glam::DVec2;

use crate::graphics::{Graphics, Path, Pen};
use crate::machine::component::{ComponentBase, Part};
use crate::types::Color;

/// Peak sideways flap as a fraction of a run's length.
const ROCK_AMOUNT: f64 = 0.01;
/// Flap rate for a run one pixel long, in radians per second. Longer runs
/// flap proportionally slower.
const ROCK_BASE_RATE: f64 = PI * 1000.0;

const BELT: Pen = Pen::new(Color::rgb(30, 30, 30), '~');

/// The two straight runs of an open belt around two round parts, each run
/// bowing back and forth over time.
#[derive(Debug, Clone)]
pub struct FlappingBelt {
    base: ComponentBase,
    runs: Vec<(DVec2, DVec2)>,
    time: f64,
}

impl FlappingBelt {
    /// Belt around circles `(c1, r1)` and `(c2, r2)`. Circles where one
    /// contains the other have no outer tangents and give an empty belt.
    pub fn between(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Self {
        FlappingBelt {
            base: ComponentBase::default(),
            runs: outer_tangents(c1, r1, c2, r2),
            time: 0.0,
        }
    }

    pub fn runs(&self) -> &[(DVec2, DVec2)] {
        &self.runs
    }

    /// Sideways displacement of a run of `length` pixels at the current time.
    pub fn flap(&self, length: f64) -> f64 {
        if length < 1.0 {
            return 0.0;
        }
        ROCK_AMOUNT * length * (ROCK_BASE_RATE / length * self.time).sin()
    }
}

impl Part for FlappingBelt {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn set_time(&mut self, time: f64) -> Option<f64> {
        self.time = time;
        None
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        let at = origin + self.position();
        for &(start, end) in &self.runs {
            let along = end - start;
            let length = along.length();
            let mut path = Path::new(at + start);
            if length < 1.0 {
                path.line_to(at + end);
            } else {
                let bow = along.perp() / length * self.flap(length);
                path.curve_to(at + start + bow, at + end - bow, at + end);
            }
            graphics.stroke_path(&path, &BELT);
        }
    }
}

/// Tangent points of the two outer tangents of two circles.
fn outer_tangents(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Vec<(DVec2, DVec2)> {
    let between = c2 - c1;
    let distance = between.length();
    if distance <= (r1 - r2).abs() {
        return Vec::new();
    }
    let u = between / distance;
    let k = (r1 - r2) / distance;
    let h = (1.0 - k * k).sqrt();
    [1.0, -1.0]
        .into_iter()
        .map(|side| {
            let normal = u * k + u.perp() * (h * side);
            (c1 + normal * r1, c2 + normal * r2)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::graphics::testing::{Call, Recorder};

    #[test]
    fn equal_circles_give_parallel_runs() {
        let belt = FlappingBelt::between(DVec2::ZERO, 10.0, DVec2::new(100.0, 0.0), 10.0);
        let runs = belt.runs();
        assert_eq!(runs.len(), 2);
        for &(start, end) in runs {
            assert_abs_diff_eq!(start.y.abs(), 10.0, epsilon = 1e-9);
            assert_abs_diff_eq!(end.y, start.y, epsilon = 1e-9);
            assert_abs_diff_eq!(end.x - start.x, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn tangent_points_touch_their_circles_at_right_angles() {
        let (c1, r1) = (DVec2::new(-80.0, -40.0), 15.0);
        let (c2, r2) = (DVec2::new(70.0, -150.0), 40.0);
        let belt = FlappingBelt::between(c1, r1, c2, r2);
        for &(start, end) in belt.runs() {
            assert_abs_diff_eq!(start.distance(c1), r1, epsilon = 1e-9);
            assert_abs_diff_eq!(end.distance(c2), r2, epsilon = 1e-9);
            let run = end - start;
            assert_abs_diff_eq!(run.dot(start - c1), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(run.dot(end - c2), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn nested_circles_have_no_belt() {
        let belt = FlappingBelt::between(DVec2::ZERO, 30.0, DVec2::new(5.0, 0.0), 10.0);
        assert!(belt.runs().is_empty());
    }

    #[test]
    fn flap_is_bounded_and_moves_with_time() {
        let mut belt = FlappingBelt::between(DVec2::ZERO, 10.0, DVec2::new(200.0, 0.0), 10.0);
        assert_eq!(belt.flap(200.0), 0.0);

        belt.set_time(0.1);
        let flap = belt.flap(200.0);
        assert!(flap != 0.0);
        assert!(flap.abs() <= ROCK_AMOUNT * 200.0);
    }

    #[test]
    fn draws_one_stroke_per_run() {
        let mut belt = FlappingBelt::between(DVec2::ZERO, 10.0, DVec2::new(100.0, 0.0), 10.0);
        belt.set_time(0.05);
        let mut recorder = Recorder::new();
        belt.draw(&mut recorder, DVec2::new(5.0, 5.0));

        assert_eq!(recorder.calls.len(), 2);
        for call in &recorder.calls {
            let Call::Stroke { points, .. } = call else {
                panic!("belt should only stroke");
            };
            assert_abs_diff_eq!(points[0].x, 5.0, epsilon = 1e-9);
        }
    }
}
