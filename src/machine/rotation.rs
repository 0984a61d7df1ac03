//! The two ends of a rotation edge.
//!
//! Both ends only record state. Pushing a value along the edges is done by
//! `Machine::set_source_rotation`, which owns every component and can
//! therefore hand the value to each sink in turn.

use super::ComponentId;

/// Driving end: the current rotation and the sinks it feeds, in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationSource {
    rotation: f64,
    sinks: Vec<ComponentId>,
}

impl RotationSource {
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn sinks(&self) -> &[ComponentId] {
        &self.sinks
    }

    pub(crate) fn add_sink(&mut self, sink: ComponentId) {
        self.sinks.push(sink);
    }

    pub(crate) fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }
}

/// Driven end. Every component carries one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationSink {
    rotation: f64,
    owner: Option<ComponentId>,
    source: Option<ComponentId>,
}

impl RotationSink {
    /// Last rotation received.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Component this sink rotates.
    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    /// Component whose source drives this sink.
    pub fn source(&self) -> Option<ComponentId> {
        self.source
    }

    pub(crate) fn set_owner(&mut self, owner: ComponentId) {
        self.owner = Some(owner);
    }

    pub(crate) fn set_source(&mut self, source: ComponentId) {
        self.source = Some(source);
    }

    pub(crate) fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }
}
