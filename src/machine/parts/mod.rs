//! Mechanical parts and their `Part` implementations.

mod belt;
mod blower;
mod bubble;
mod motor;
mod pulley;
mod shape;

pub use belt::FlappingBelt;
pub use blower::BubbleBlower;
pub use bubble::Bubble;
pub use motor::Motor;
pub use pulley::{Coupling, Pulley};
pub use shape::{Generic, Shape};

use glam::DVec2;

use crate::graphics::{Graphics, Pen, direction};

/// Line from the centre of a round part to its rim, so turning is visible.
fn draw_spoke(graphics: &mut dyn Graphics, center: DVec2, radius: f64, turns: f64, pen: &Pen) {
    let rim = center + direction(turns) * radius;
    graphics.stroke_polyline(&[center, rim], pen);
}
