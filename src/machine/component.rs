//! The shared component surface and the closed set of component kinds.
//!
//! Each kind lives in `parts/` with its struct and `Part` implementation side
//! by side; `Component` dispatches to them.

use glam::DVec2;

use super::ComponentId;
use super::parts::{BubbleBlower, FlappingBelt, Generic, Motor, Pulley, Shape};
use super::rotation::{RotationSink, RotationSource};
use crate::graphics::Graphics;

/// State every component has: where it is, how it is turned, and the sink
/// rotation arrives through. All values are in the machine's local frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentBase {
    id: Option<ComponentId>,
    position: DVec2,
    /// Turns. Stored as received; wrapped only when drawn.
    rotation: f64,
    /// Draw-only bias in turns.
    phase: f64,
    sink: RotationSink,
}

impl ComponentBase {
    pub fn at(position: DVec2) -> Self {
        ComponentBase {
            position,
            ..Default::default()
        }
    }

    /// Slot in the owning machine, once added.
    pub fn id(&self) -> Option<ComponentId> {
        self.id
    }

    pub fn sink(&self) -> &RotationSink {
        &self.sink
    }

    pub(crate) fn sink_mut(&mut self) -> &mut RotationSink {
        &mut self.sink
    }

    pub(crate) fn attach(&mut self, id: ComponentId) {
        self.id = Some(id);
        self.sink.set_owner(id);
    }

    /// Rotation the component is drawn with, in `[0, 1)`.
    pub fn draw_rotation(&self) -> f64 {
        (self.rotation + self.phase).rem_euclid(1.0)
    }
}

pub trait Part {
    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    fn position(&self) -> DVec2 {
        self.base().position
    }

    fn set_position(&mut self, position: DVec2) {
        self.base_mut().position = position;
    }

    fn rotation(&self) -> f64 {
        self.base().rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.base_mut().rotation = rotation;
    }

    fn phase(&self) -> f64 {
        self.base().phase
    }

    fn set_phase(&mut self, phase: f64) {
        self.base_mut().phase = phase;
    }

    /// Rotation arriving through this component's sink.
    ///
    /// Returns the value to push on through the component's own source, for
    /// components that drive others.
    fn set_current_rotation(&mut self, rotation: f64) -> Option<f64> {
        self.set_rotation(rotation);
        None
    }

    /// Driving pass of a tick. Returns a rotation to push downstream.
    fn set_time(&mut self, _time: f64) -> Option<f64> {
        None
    }

    /// Reacting pass of a tick, run after every rotation for `time` has
    /// propagated.
    fn update(&mut self, _time: f64) {}

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2);

    /// `point` is in the machine's local frame.
    fn hit_test(&self, _point: DVec2) -> bool {
        false
    }

    fn rotation_source(&self) -> Option<&RotationSource> {
        None
    }

    fn rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum Component {
    Motor(Motor),
    Pulley(Pulley),
    Shape(Shape),
    FlappingBelt(FlappingBelt),
    BubbleBlower(BubbleBlower),
    Generic(Generic),
}

macro_rules! dispatch {
    ($component:expr, $part:ident => $body:expr) => {
        match $component {
            Component::Motor($part) => $body,
            Component::Pulley($part) => $body,
            Component::Shape($part) => $body,
            Component::FlappingBelt($part) => $body,
            Component::BubbleBlower($part) => $body,
            Component::Generic($part) => $body,
        }
    };
}

impl Part for Component {
    fn base(&self) -> &ComponentBase {
        dispatch!(self, p => p.base())
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        dispatch!(self, p => p.base_mut())
    }

    fn set_position(&mut self, position: DVec2) {
        dispatch!(self, p => p.set_position(position))
    }

    fn set_rotation(&mut self, rotation: f64) {
        dispatch!(self, p => p.set_rotation(rotation))
    }

    fn set_phase(&mut self, phase: f64) {
        dispatch!(self, p => p.set_phase(phase))
    }

    fn set_current_rotation(&mut self, rotation: f64) -> Option<f64> {
        dispatch!(self, p => p.set_current_rotation(rotation))
    }

    fn set_time(&mut self, time: f64) -> Option<f64> {
        dispatch!(self, p => p.set_time(time))
    }

    fn update(&mut self, time: f64) {
        dispatch!(self, p => p.update(time))
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        dispatch!(self, p => p.draw(graphics, origin))
    }

    fn hit_test(&self, point: DVec2) -> bool {
        dispatch!(self, p => p.hit_test(point))
    }

    fn rotation_source(&self) -> Option<&RotationSource> {
        dispatch!(self, p => p.rotation_source())
    }

    fn rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        dispatch!(self, p => p.rotation_source_mut())
    }
}

impl Component {
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Motor(_) => "motor",
            Component::Pulley(_) => "pulley",
            Component::Shape(_) => "shape",
            Component::FlappingBelt(_) => "belt",
            Component::BubbleBlower(_) => "bubble blower",
            Component::Generic(_) => "component",
        }
    }

    pub fn as_motor(&self) -> Option<&Motor> {
        match self {
            Component::Motor(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_motor_mut(&mut self) -> Option<&mut Motor> {
        match self {
            Component::Motor(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_pulley(&self) -> Option<&Pulley> {
        match self {
            Component::Pulley(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_pulley_mut(&mut self) -> Option<&mut Pulley> {
        match self {
            Component::Pulley(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_blower(&self) -> Option<&BubbleBlower> {
        match self {
            Component::BubbleBlower(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_belt(&self) -> Option<&FlappingBelt> {
        match self {
            Component::FlappingBelt(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Motor> for Component {
    fn from(part: Motor) -> Self {
        Component::Motor(part)
    }
}

impl From<Pulley> for Component {
    fn from(part: Pulley) -> Self {
        Component::Pulley(part)
    }
}

impl From<Shape> for Component {
    fn from(part: Shape) -> Self {
        Component::Shape(part)
    }
}

impl From<FlappingBelt> for Component {
    fn from(part: FlappingBelt) -> Self {
        Component::FlappingBelt(part)
    }
}

impl From<BubbleBlower> for Component {
    fn from(part: BubbleBlower) -> Self {
        Component::BubbleBlower(part)
    }
}

impl From<Generic> for Component {
    fn from(part: Generic) -> Self {
        Component::Generic(part)
    }
}
