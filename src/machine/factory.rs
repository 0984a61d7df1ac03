//! Code-defined machine variants.

use glam::DVec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{BubbleBlower, Coupling, Machine, Motor, Part, Pulley, Shape};
use crate::config::BubbleTuning;
use crate::error::MachineError;
use crate::graphics::{Fill, ImageDir, Polygon, direction};
use crate::types::Color;

const BASE_WIDTH: f64 = 325.0;
const BASE_HEIGHT: f64 = 40.0;
const POST_WIDTH: f64 = 20.0;
const POST_HEIGHT: f64 = 120.0;

/// Wand tilt of the second machine's blower, in turns.
const BLOWER_TILT: f64 = -0.12;

/// Builds the numbered machine variants.
#[derive(Debug, Clone)]
pub struct MachineFactory {
    images: ImageDir,
    tuning: BubbleTuning,
    seed: u64,
}

impl MachineFactory {
    /// Variant numbers `create` accepts.
    pub const VARIANTS: [u32; 2] = [1, 2];

    pub fn new(images: ImageDir, tuning: BubbleTuning, seed: u64) -> Self {
        MachineFactory {
            images,
            tuning,
            seed,
        }
    }

    pub fn create(&self, variant: u32) -> Result<Machine, MachineError> {
        match variant {
            1 => self.create_first(),
            2 => self.create_second(),
            other => Err(MachineError::UnknownVariant(other)),
        }
    }

    /// Motor belted to a pulley on a post, the pulley turning a blower.
    fn create_first(&self) -> Result<Machine, MachineError> {
        let mut machine = Machine::new();
        machine.add_component(self.base());

        let post_at = DVec2::new(70.0, 0.0);
        let post_height = POST_HEIGHT * 1.35;
        machine.add_component(self.post(post_at, post_height));

        let motor = machine.add_component(self.motor(DVec2::new(-80.0, 0.0))?);

        let hub = post_at - DVec2::new(0.0, post_height - 10.0);
        let mut pulley = Pulley::new(hub, 40.0)?;
        pulley.set_image(&self.images, "pulley.png");
        let pulley = machine.add_component(pulley);
        machine.add_belt(motor, pulley)?;

        let blower = machine.add_component(self.blower(hub, 0)?);
        machine.connect(pulley, blower)?;
        Ok(machine)
    }

    /// Motor belted to a compound pulley on the left post that also turns a
    /// pinwheel; the compound pulley's large wheel is belted up to a small
    /// pulley on the right post carrying a tilted blower.
    fn create_second(&self) -> Result<Machine, MachineError> {
        let mut machine = Machine::new();
        machine.add_component(self.base());

        let left = DVec2::new(-BASE_WIDTH / 2.0 + 50.0, 0.0);
        let right = DVec2::new(BASE_WIDTH / 2.0 - 50.0, 0.0);
        machine.add_component(self.post(left, POST_HEIGHT * 1.35));
        machine.add_component(self.post(right, POST_HEIGHT));

        let motor = machine.add_component(self.motor(DVec2::ZERO)?);

        let left_hub = left - DVec2::new(0.0, POST_HEIGHT * 1.35 - 10.0);
        let mut small = Pulley::new(left_hub, 20.0)?;
        small.set_image(&self.images, "pulley4.png");
        let small = machine.add_component(small);
        machine.add_belt(motor, small)?;

        let mut large = Pulley::new(left_hub, 30.0)?;
        large.set_image(&self.images, "pulley4.png");
        large.set_phase(0.125);
        let large = machine.add_component(large);
        machine.connect_pulleys(small, large, Coupling::Shaft)?;

        let wheel = machine.add_component(pinwheel(left_hub));
        machine.connect(small, wheel)?;

        let right_hub = right - DVec2::new(0.0, POST_HEIGHT - 10.0);
        let mut driven = Pulley::new(right_hub, 15.0)?;
        driven.set_image(&self.images, "pulley4.png");
        let driven = machine.add_component(driven);
        machine.add_belt(large, driven)?;

        let mut blower = self.blower(right_hub, 0)?;
        blower.set_phase(BLOWER_TILT);
        let blower = machine.add_component(blower);
        machine.connect(driven, blower)?;
        Ok(machine)
    }

    fn base(&self) -> Shape {
        let mut base = Shape::rectangle(
            DVec2::ZERO,
            -BASE_WIDTH / 2.0,
            0.0,
            BASE_WIDTH,
            BASE_HEIGHT,
        );
        base.set_image(&self.images, "base.png");
        base
    }

    fn post(&self, at: DVec2, height: f64) -> Shape {
        let mut post = Shape::rectangle(at, -POST_WIDTH / 2.0, -height, POST_WIDTH, height);
        post.set_image(&self.images, "post.png");
        post
    }

    fn motor(&self, at: DVec2) -> Result<Motor, MachineError> {
        let mut motor = Motor::new(at, &self.images);
        motor.set_speed(1.0)?;
        motor.set_running(true);
        Ok(motor)
    }

    /// Blower number `index` of a machine. Each gets its own stream of
    /// randomness derived from the factory seed.
    fn blower(&self, at: DVec2, index: u64) -> Result<BubbleBlower, MachineError> {
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(index));
        BubbleBlower::new(at, self.tuning.clone(), rng, &self.images)
    }
}

/// Four-bladed star centred on `hub`.
fn pinwheel(hub: DVec2) -> Shape {
    const BLADES: usize = 4;
    let points = (0..BLADES * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { 45.0 } else { 8.0 };
            direction(i as f64 / (BLADES * 2) as f64) * radius
        })
        .collect();
    Shape::new(
        hub,
        Polygon::new(points, Fill::Color(Color::rgb(220, 60, 60))),
    )
}
