use glam::DVec2;
use rand::Rng;

use crate::config::BubbleTuning;
use crate::graphics::{Fill, Graphics, circle_points};

/// A single bubble drifting away from a blower. Coordinates are relative to
/// the blower's pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    popped: bool,
}

impl Bubble {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64) -> Self {
        Bubble {
            position,
            velocity,
            radius,
            popped: false,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_popped(&self) -> bool {
        self.popped
    }

    pub fn pop(&mut self) {
        self.popped = true;
    }

    /// Advance one fixed step: gravity, drift, and a chance to grow. A bubble
    /// that grows past the pop radius pops.
    pub fn step<R: Rng>(&mut self, tuning: &BubbleTuning, rng: &mut R) {
        if self.popped {
            return;
        }
        let dt = tuning.time_step;
        self.velocity.y += tuning.gravity * dt;
        self.position += self.velocity * dt;
        if rng.gen_bool(tuning.growth_chance) {
            self.radius += tuning.growth;
        }
        if self.radius > tuning.pop_radius {
            self.popped = true;
        }
    }

    pub fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2, fill: &Fill) {
        if self.popped {
            return;
        }
        let center = origin + self.position;
        let outline: Vec<DVec2> = circle_points(self.radius)
            .into_iter()
            .map(|p| p + center)
            .collect();
        graphics.fill_polygon(&outline, fill);
    }
}
