//! Machine-side facade: one active machine, its clock, and where it sits.

use glam::DVec2;
use log::info;

use crate::error::{MachineError, require_positive};
use crate::graphics::Graphics;
use crate::machine::{Machine, MachineFactory};

pub struct MachineSystem {
    factory: MachineFactory,
    machine: Machine,
    machine_number: u32,
    frame_rate: f64,
    location: DVec2,
    running: bool,
}

impl MachineSystem {
    /// System showing machine 1 at 30 frames per second.
    pub fn new(factory: MachineFactory) -> Result<Self, MachineError> {
        let machine = factory.create(1)?;
        Ok(MachineSystem {
            factory,
            machine,
            machine_number: 1,
            frame_rate: 30.0,
            location: DVec2::ZERO,
            running: true,
        })
    }

    /// Replace the active machine with a fresh build of `variant`. Its
    /// bubbles and clock start over; the running flag carries across.
    pub fn choose_machine(&mut self, variant: u32) -> Result<(), MachineError> {
        let mut machine = self.factory.create(variant)?;
        machine.set_running(self.running);
        self.machine = machine;
        self.machine_number = variant;
        info!("switched to machine {variant}");
        Ok(())
    }

    pub fn machine_number(&self) -> u32 {
        self.machine_number
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<(), MachineError> {
        self.frame_rate = require_positive("frame rate", frame_rate)?;
        Ok(())
    }

    /// Bring the machine to `frame`, counted from when it started.
    pub fn set_machine_frame(&mut self, frame: u32) {
        self.machine.set_time(f64::from(frame) / self.frame_rate);
    }

    /// Seconds since the machine started, as of the last frame set.
    pub fn machine_time(&self) -> f64 {
        self.machine.time()
    }

    pub fn location(&self) -> DVec2 {
        self.location
    }

    pub fn set_location(&mut self, location: DVec2) {
        self.location = location;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
        self.machine.set_running(running);
    }

    pub fn draw(&self, graphics: &mut dyn Graphics) {
        self.machine.draw(graphics, self.location);
    }

    pub fn hit_test(&self, point: DVec2) -> bool {
        self.machine.hit_test(point - self.location)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::config::BubbleTuning;
    use crate::graphics::ImageDir;

    fn system() -> MachineSystem {
        MachineSystem::new(MachineFactory::new(ImageDir::none(), BubbleTuning::default(), 1))
            .unwrap()
    }

    #[test]
    fn frames_become_seconds_at_the_frame_rate() {
        let mut system = system();
        system.set_machine_frame(45);
        assert_abs_diff_eq!(system.machine_time(), 1.5, epsilon = 1e-12);

        system.set_frame_rate(60.0).unwrap();
        system.set_machine_frame(45);
        assert_abs_diff_eq!(system.machine_time(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn frame_rate_must_be_positive() {
        let mut system = system();
        assert!(system.set_frame_rate(0.0).is_err());
        assert!(system.set_frame_rate(f64::NAN).is_err());
        assert_eq!(system.frame_rate(), 30.0);
    }

    #[test]
    fn choosing_a_machine_starts_it_fresh() {
        let mut system = system();
        for frame in 0..60 {
            system.set_machine_frame(frame);
        }
        assert!(system.machine().blowers().any(|b| !b.bubbles().is_empty()));

        system.choose_machine(2).unwrap();
        assert_eq!(system.machine_number(), 2);
        assert_eq!(system.machine_time(), 0.0);
        assert!(system.machine().blowers().all(|b| b.bubbles().is_empty()));

        assert_eq!(system.choose_machine(3), Err(MachineError::UnknownVariant(3)));
        assert_eq!(system.machine_number(), 2);
    }

    #[test]
    fn running_flag_survives_a_switch() {
        let mut system = system();
        system.set_running(false);
        system.choose_machine(2).unwrap();
        assert!(!system.machine().is_running());
    }

    #[test]
    fn hit_test_is_relative_to_the_location() {
        let mut system = system();
        // Machine 1's base spans x -162.5..162.5, y 0..40.
        assert!(system.hit_test(DVec2::new(0.0, 20.0)));
        system.set_location(DVec2::new(500.0, 500.0));
        assert!(!system.hit_test(DVec2::new(0.0, 20.0)));
        assert!(system.hit_test(DVec2::new(500.0, 520.0)));
    }
}
