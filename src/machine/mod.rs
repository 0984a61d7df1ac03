//! The machine: an arena of components joined by one-way rotation edges.
//!
//! A tick runs in two passes. The driving pass calls `set_time` on every
//! component and pushes whatever the motors produce through the edges, depth
//! first. The update pass then lets time-reactive components (blowers) act on
//! what arrived, so the outcome does not depend on the order components were
//! added in.

mod component;
mod factory;
mod parts;
mod rotation;

use std::fmt;

use glam::DVec2;
use log::debug;

pub use component::{Component, ComponentBase, Part};
pub use factory::MachineFactory;
pub use parts::{Bubble, BubbleBlower, Coupling, FlappingBelt, Generic, Motor, Pulley, Shape};
pub use rotation::{RotationSink, RotationSource};

use crate::error::MachineError;
use crate::graphics::Graphics;

/// Slot of a component in its machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component #{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Machine {
    components: Vec<Component>,
    time: f64,
}

impl Machine {
    pub fn new() -> Self {
        Machine::default()
    }

    /// Append a component and stamp it with its slot.
    pub fn add_component(&mut self, component: impl Into<Component>) -> ComponentId {
        let mut component = component.into();
        let id = ComponentId(self.components.len());
        component.base_mut().attach(id);
        debug!("added {} as {id}", component.kind());
        self.components.push(component);
        id
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0)
    }

    /// Components in insertion (and draw) order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn motors(&self) -> impl Iterator<Item = &Motor> {
        self.components.iter().filter_map(Component::as_motor)
    }

    pub fn blowers(&self) -> impl Iterator<Item = &BubbleBlower> {
        self.components.iter().filter_map(Component::as_blower)
    }

    /// Time of the last tick, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    fn get(&self, id: ComponentId) -> Result<&Component, MachineError> {
        self.component(id).ok_or(MachineError::UnknownComponent(id))
    }

    /// Add a rotation edge from `source`'s rotation source to `sink`.
    pub fn connect(&mut self, source: ComponentId, sink: ComponentId) -> Result<(), MachineError> {
        if self.get(source)?.rotation_source().is_none() {
            return Err(MachineError::NotADriver(source));
        }
        let driven = self.get(sink)?;
        if source == sink || self.reaches(sink, source) {
            return Err(MachineError::GraphCycle {
                source_id: source,
                sink,
            });
        }
        if let Some(driver) = driven.base().sink().source() {
            return Err(MachineError::AlreadyDriven { sink, driver });
        }

        if let Some(edges) = self.components[source.0].rotation_source_mut() {
            edges.add_sink(sink);
        }
        self.components[sink.0].base_mut().sink_mut().set_source(source);
        debug!("connected {source} -> {sink}");
        Ok(())
    }

    /// Whether rotation pushed out of `from` can arrive at `to`.
    fn reaches(&self, from: ComponentId, to: ComponentId) -> bool {
        let mut stack = vec![from];
        let mut seen = vec![false; self.components.len()];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            if let Some(source) = self.components[id.0].rotation_source() {
                stack.extend_from_slice(source.sinks());
            }
        }
        false
    }

    /// Drive pulley `driven` from `driver`, a pulley or a motor's shaft.
    ///
    /// `RadiusRatio` sets the driven pulley's multiplier to the ratio of the
    /// two radii; `Shaft` resets it to 1; `Belt` leaves it alone.
    pub fn connect_pulleys(
        &mut self,
        driver: ComponentId,
        driven: ComponentId,
        coupling: Coupling,
    ) -> Result<(), MachineError> {
        let (_, driver_radius) = self.round_part(driver)?;
        let driven_radius = match self.get(driven)?.as_pulley() {
            Some(pulley) => pulley.radius(),
            None => return Err(MachineError::NotAPulley(driven)),
        };

        self.connect(driver, driven)?;

        let Some(pulley) = self.components[driven.0].as_pulley_mut() else {
            return Err(MachineError::NotAPulley(driven));
        };
        match coupling {
            Coupling::Belt => {}
            Coupling::Shaft => pulley.set_multiplier(1.0)?,
            Coupling::RadiusRatio => pulley.set_multiplier(driver_radius / driven_radius)?,
        }
        pulley.set_driver(driver, coupling);
        Ok(())
    }

    /// Belt `driven` to `driver` with a radius-ratio coupling and add the
    /// belt itself as a component.
    pub fn add_belt(
        &mut self,
        driver: ComponentId,
        driven: ComponentId,
    ) -> Result<ComponentId, MachineError> {
        self.connect_pulleys(driver, driven, Coupling::RadiusRatio)?;
        let (c1, r1) = self.round_part(driver)?;
        let (c2, r2) = self.round_part(driven)?;
        Ok(self.add_component(FlappingBelt::between(c1, r1, c2, r2)))
    }

    /// Centre and radius of a part a belt can run around.
    fn round_part(&self, id: ComponentId) -> Result<(DVec2, f64), MachineError> {
        match self.get(id)? {
            Component::Pulley(pulley) => Ok((pulley.position(), pulley.radius())),
            Component::Motor(motor) => Ok((motor.shaft_center(), motor.shaft_radius())),
            _ => Err(MachineError::NotAPulley(id)),
        }
    }

    /// Store `rotation` on `id`'s source and push it to every sink in
    /// registration order.
    pub fn set_source_rotation(&mut self, id: ComponentId, rotation: f64) {
        let Some(source) = self
            .components
            .get_mut(id.0)
            .and_then(|c| c.rotation_source_mut())
        else {
            return;
        };
        source.set_rotation(rotation);
        let sinks = source.sinks().to_vec();
        for sink in sinks {
            self.deliver(sink, rotation);
        }
    }

    fn deliver(&mut self, id: ComponentId, rotation: f64) {
        let Some(component) = self.components.get_mut(id.0) else {
            return;
        };
        component.base_mut().sink_mut().set_rotation(rotation);
        if let Some(onward) = component.set_current_rotation(rotation) {
            self.set_source_rotation(id, onward);
        }
    }

    /// Bring every component to `time` seconds.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        for index in 0..self.components.len() {
            if let Some(rotation) = self.components[index].set_time(time) {
                self.set_source_rotation(ComponentId(index), rotation);
            }
        }
        for component in &mut self.components {
            component.update(time);
        }
    }

    /// Start or stop every motor.
    pub fn set_running(&mut self, running: bool) {
        for component in &mut self.components {
            if let Some(motor) = component.as_motor_mut() {
                motor.set_running(running);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.motors().any(Motor::is_running)
    }

    pub fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        for component in &self.components {
            component.draw(graphics, origin);
        }
    }

    /// `point` is in the machine's local frame.
    pub fn hit_test(&self, point: DVec2) -> bool {
        self.components.iter().any(|c| c.hit_test(point))
    }
}
