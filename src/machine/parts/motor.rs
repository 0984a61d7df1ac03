use glam::DVec2;

use super::draw_spoke;
use crate::error::{MachineError, require_finite};
use crate::graphics::{Graphics, ImageDir, Pen, Polygon};
use crate::machine::component::{ComponentBase, Part};
use crate::machine::rotation::RotationSource;
use crate::types::Color;

/// Side of the square motor body, in pixels.
const BODY_SIZE: f64 = 80.0;
/// Shaft pulley centre relative to the motor position.
const SHAFT_OFFSET: DVec2 = DVec2::new(0.0, -BODY_SIZE / 2.0);
pub(crate) const SHAFT_RADIUS: f64 = 15.0;

const SPOKE: Pen = Pen::new(Color::rgb(40, 40, 40), '*');

/// Turns time into rotation. Stationary body with a shaft pulley that turns
/// `speed` times per second while running.
#[derive(Debug, Clone)]
pub struct Motor {
    base: ComponentBase,
    speed: f64,
    running: bool,
    source: RotationSource,
    body: Polygon,
    shaft: Polygon,
}

impl Motor {
    /// A stopped motor at 1 turn per second, sitting on `position`.
    pub fn new(position: DVec2, images: &ImageDir) -> Self {
        let mut body = Polygon::rectangle(-BODY_SIZE / 2.0, -BODY_SIZE, BODY_SIZE, BODY_SIZE);
        body.set_image(images, "motor3.png");
        let mut shaft = Polygon::circle(SHAFT_RADIUS);
        shaft.set_image(images, "pulley2.png");

        Motor {
            base: ComponentBase::at(position),
            speed: 1.0,
            running: false,
            source: RotationSource::default(),
            body,
            shaft,
        }
    }

    /// Turns per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), MachineError> {
        self.speed = require_finite("motor speed", speed)?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn shaft_center(&self) -> DVec2 {
        self.position() + SHAFT_OFFSET
    }

    pub fn shaft_radius(&self) -> f64 {
        SHAFT_RADIUS
    }
}

impl Part for Motor {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn set_time(&mut self, time: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let turns = (time * self.speed).rem_euclid(1.0);
        self.set_rotation(turns);
        Some(turns)
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        let at = origin + self.position();
        self.body.draw(graphics, at, 0.0);

        let turns = self.base.draw_rotation();
        let shaft = origin + self.shaft_center();
        self.shaft.draw(graphics, shaft, turns);
        draw_spoke(graphics, shaft, SHAFT_RADIUS, turns, &SPOKE);
    }

    fn hit_test(&self, point: DVec2) -> bool {
        point.distance(self.shaft_center()) <= SHAFT_RADIUS
            || self.body.contains(point - self.position(), 0.0)
    }

    fn rotation_source(&self) -> Option<&RotationSource> {
        Some(&self.source)
    }

    fn rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn running_motor(speed: f64) -> Motor {
        let mut motor = Motor::new(DVec2::ZERO, &ImageDir::none());
        motor.set_speed(speed).unwrap();
        motor.set_running(true);
        motor
    }

    #[test]
    fn rotation_is_the_fractional_part_of_elapsed_turns() {
        let mut motor = running_motor(1.0);
        assert_abs_diff_eq!(motor.set_time(0.5).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(motor.set_time(1.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(motor.set_time(2.25).unwrap(), 0.25, epsilon = 1e-12);

        let mut fast = running_motor(2.5);
        assert_abs_diff_eq!(fast.set_time(0.5).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn re_evaluating_a_time_ignores_history() {
        let mut stepped = running_motor(0.7);
        for frame in 0..90 {
            stepped.set_time(frame as f64 / 30.0);
        }
        let direct = running_motor(0.7).set_time(3.0).unwrap();
        assert_abs_diff_eq!(stepped.set_time(3.0).unwrap(), direct, epsilon = 1e-12);
    }

    #[test]
    fn stopped_motor_freezes() {
        let mut motor = running_motor(1.0);
        motor.set_time(0.3);
        motor.set_running(false);

        assert_eq!(motor.set_time(0.9), None);
        assert_abs_diff_eq!(motor.rotation(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn negative_time_still_yields_a_turn_in_range() {
        let turns = running_motor(1.0).set_time(-0.25).unwrap();
        assert_abs_diff_eq!(turns, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_speed_is_rejected() {
        let mut motor = Motor::new(DVec2::ZERO, &ImageDir::none());
        assert!(motor.set_speed(f64::NAN).is_err());
        assert_eq!(motor.speed(), 1.0);
    }

    #[test]
    fn hit_covers_body_and_shaft() {
        let motor = Motor::new(DVec2::new(100.0, 0.0), &ImageDir::none());
        assert!(motor.hit_test(DVec2::new(100.0, -10.0)));
        assert!(motor.hit_test(DVec2::new(130.0, -70.0)));
        assert!(!motor.hit_test(DVec2::new(100.0, 10.0)));
        assert!(!motor.hit_test(DVec2::new(150.0, -40.0)));
    }
}
