use glam::DVec2;

use super::draw_spoke;
use crate::error::{MachineError, require_finite, require_positive};
use crate::graphics::{Graphics, ImageDir, Pen, Polygon};
use crate::machine::ComponentId;
use crate::machine::component::{ComponentBase, Part};
use crate::machine::rotation::RotationSource;
use crate::types::Color;

const SPOKE: Pen = Pen::new(Color::rgb(40, 40, 40), '*');

/// How a pulley is tied to the part driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coupling {
    /// Belt drive; the pulley's own multiplier sets the ratio.
    Belt,
    /// Rigidly on the driver's shaft.
    Shaft,
    /// Belt drive with the multiplier derived from the two radii.
    RadiusRatio,
}

/// Receives rotation, scales it by `multiplier`, and passes it on.
///
/// `phase` only shifts how the pulley is drawn; the value forwarded
/// downstream is always `received * multiplier`.
#[derive(Debug, Clone)]
pub struct Pulley {
    base: ComponentBase,
    radius: f64,
    multiplier: f64,
    driver: Option<ComponentId>,
    coupling: Option<Coupling>,
    source: RotationSource,
    polygon: Polygon,
}

impl Pulley {
    pub fn new(position: DVec2, radius: f64) -> Result<Self, MachineError> {
        let radius = require_positive("pulley radius", radius)?;
        Ok(Pulley {
            base: ComponentBase::at(position),
            radius,
            multiplier: 1.0,
            driver: None,
            coupling: None,
            source: RotationSource::default(),
            polygon: Polygon::circle(radius),
        })
    }

    pub fn set_image(&mut self, images: &ImageDir, name: &str) {
        self.polygon.set_image(images, name);
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), MachineError> {
        self.multiplier = require_finite("speed multiplier", multiplier)?;
        Ok(())
    }

    /// The part this pulley is driven by, if connected.
    pub fn driver(&self) -> Option<ComponentId> {
        self.driver
    }

    pub fn coupling(&self) -> Option<Coupling> {
        self.coupling
    }

    pub(crate) fn set_driver(&mut self, driver: ComponentId, coupling: Coupling) {
        self.driver = Some(driver);
        self.coupling = Some(coupling);
    }
}

impl Part for Pulley {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn set_current_rotation(&mut self, rotation: f64) -> Option<f64> {
        let adjusted = rotation * self.multiplier;
        self.set_rotation(adjusted);
        Some(adjusted)
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        let at = origin + self.position();
        let turns = self.base.draw_rotation();
        self.polygon.draw(graphics, at, turns);
        draw_spoke(graphics, at, self.radius, turns, &SPOKE);
    }

    fn hit_test(&self, point: DVec2) -> bool {
        point.distance(self.position()) <= self.radius
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

    #[test]
    fn forwards_scaled_rotation_without_phase() {
        let mut pulley = Pulley::new(DVec2::ZERO, 20.0).unwrap();
        pulley.set_multiplier(1.5).unwrap();
        pulley.set_phase(0.3);

        let forwarded = pulley.set_current_rotation(0.4).unwrap();
        assert_abs_diff_eq!(forwarded, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(pulley.rotation(), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(pulley.base().draw_rotation(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn drawn_rotation_wraps_into_one_turn() {
        let mut pulley = Pulley::new(DVec2::ZERO, 20.0).unwrap();
        pulley.set_multiplier(3.0).unwrap();
        pulley.set_phase(0.5);

        pulley.set_current_rotation(0.7);
        // 0.7 * 3 + 0.5 = 2.6
        assert_abs_diff_eq!(pulley.base().draw_rotation(), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn non_physical_parameters_are_rejected() {
        assert!(matches!(
            Pulley::new(DVec2::ZERO, 0.0),
            Err(MachineError::InvalidConfiguration { what: "pulley radius", .. })
        ));
        assert!(Pulley::new(DVec2::ZERO, -4.0).is_err());
        assert!(Pulley::new(DVec2::ZERO, f64::INFINITY).is_err());

        let mut pulley = Pulley::new(DVec2::ZERO, 10.0).unwrap();
        assert!(pulley.set_multiplier(f64::NAN).is_err());
        assert_eq!(pulley.multiplier(), 1.0);
    }

    #[test]
    fn hit_test_uses_the_radius() {
        let pulley = Pulley::new(DVec2::new(50.0, 50.0), 10.0).unwrap();
        assert!(pulley.hit_test(DVec2::new(58.0, 50.0)));
        assert!(!pulley.hit_test(DVec2::new(61.0, 50.0)));
    }
}
