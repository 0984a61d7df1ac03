use glam::DVec2;

use crate::graphics::{Graphics, ImageDir, Polygon};
use crate::machine::component::{ComponentBase, Part};

/// Decorative outline: bases, posts, flags. Turns if something drives it.
#[derive(Debug, Clone)]
pub struct Shape {
    base: ComponentBase,
    polygon: Polygon,
}

impl Shape {
    pub fn new(position: DVec2, polygon: Polygon) -> Self {
        Shape {
            base: ComponentBase::at(position),
            polygon,
        }
    }

    pub fn rectangle(position: DVec2, x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::new(position, Polygon::rectangle(x, y, width, height))
    }

    pub fn set_image(&mut self, images: &ImageDir, name: &str) {
        self.polygon.set_image(images, name);
    }
}

impl Part for Shape {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        self.polygon
            .draw(graphics, origin + self.position(), self.base.draw_rotation());
    }

    fn hit_test(&self, point: DVec2) -> bool {
        self.polygon
            .contains(point - self.position(), self.base.draw_rotation())
    }
}

/// A bare rotating point with no visuals of its own.
#[derive(Debug, Clone, Default)]
pub struct Generic {
    base: ComponentBase,
}

impl Generic {
    pub fn new(position: DVec2) -> Self {
        Generic {
            base: ComponentBase::at(position),
        }
    }
}

impl Part for Generic {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, _graphics: &mut dyn Graphics, _origin: DVec2) {}
}
