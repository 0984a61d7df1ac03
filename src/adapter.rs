//! Host-side facade: a machine placed in a larger picture.
//!
//! The host works in screen space and absolute frame numbers. The adapter
//! owns the translation into machine space (position and scale) and machine
//! time (frames counted from the start frame), and the placement file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::DVec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{MachineError, require_finite, require_positive};
use crate::graphics::Graphics;
use crate::machine::MachineFactory;
use crate::system::MachineSystem;

const DEFAULT_SCALE: f64 = 0.75;

/// Screen position in a placement file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

fn default_machine_number() -> u32 {
    1
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

/// Everything about a placed machine that is saved. The machine's parts are
/// rebuilt from `machine_number`, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachinePlacement {
    pub name: String,
    pub position: Point,
    #[serde(default = "default_machine_number")]
    pub machine_number: u32,
    #[serde(default)]
    pub start_frame: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

pub struct MachineAdapter {
    name: String,
    system: MachineSystem,
    position: DVec2,
    scale: f64,
    start_frame: u32,
    /// Set once a frame at or after the start frame has been shown.
    started: bool,
}

impl MachineAdapter {
    pub fn new(name: impl Into<String>, factory: MachineFactory) -> Result<Self, MachineError> {
        Ok(MachineAdapter {
            name: name.into(),
            system: MachineSystem::new(factory)?,
            position: DVec2::ZERO,
            scale: DEFAULT_SCALE,
            start_frame: 0,
            started: false,
        })
    }

    pub fn from_placement(
        placement: &MachinePlacement,
        factory: MachineFactory,
    ) -> Result<Self, MachineError> {
        let mut adapter = MachineAdapter::new(placement.name.clone(), factory)?;
        adapter.set_position(placement.position.into())?;
        adapter.set_scale(placement.scale)?;
        adapter.set_start_frame(placement.start_frame);
        adapter.set_variant(placement.machine_number)?;
        Ok(adapter)
    }

    pub fn placement(&self) -> MachinePlacement {
        MachinePlacement {
            name: self.name.clone(),
            position: self.position.into(),
            machine_number: self.system.machine_number(),
            start_frame: self.start_frame,
            scale: self.scale,
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.placement())?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("saved {} to {}", self.name, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>, factory: MachineFactory) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let placement: MachinePlacement = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        MachineAdapter::from_placement(&placement, factory)
            .with_context(|| format!("Invalid placement in {}", path.display()))
    }

    /// Rebuild as machine `variant`, dropping any bubbles in flight. The
    /// next frame shown counts as the first again.
    pub fn set_variant(&mut self, variant: u32) -> Result<(), MachineError> {
        self.system.choose_machine(variant)?;
        self.started = false;
        Ok(())
    }

    pub fn variant(&self) -> u32 {
        self.system.machine_number()
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<(), MachineError> {
        self.system.set_frame_rate(frame_rate)
    }

    /// Show absolute `frame` of the host animation. The machine holds its
    /// rest pose until the start frame, and is reset to its own frame 0 the
    /// first time a frame at or after the start is shown.
    pub fn set_frame(&mut self, frame: u32) {
        if frame < self.start_frame {
            self.system.set_machine_frame(0);
            self.started = false;
            return;
        }
        if !self.started {
            self.system.set_machine_frame(0);
            self.started = true;
        }
        self.system.set_machine_frame(frame - self.start_frame);
    }

    pub fn draw(&self, graphics: &mut dyn Graphics) {
        graphics.push_state();
        graphics.translate(self.position);
        graphics.scale(self.scale);
        self.system.draw(graphics);
        graphics.pop_state();
    }

    /// `point` is in screen space.
    pub fn hit_test(&self, point: DVec2) -> bool {
        self.system.hit_test((point - self.position) / self.scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec2) -> Result<(), MachineError> {
        require_finite("position x", position.x)?;
        require_finite("position y", position.y)?;
        self.position = position;
        Ok(())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), MachineError> {
        self.scale = require_positive("scale", scale)?;
        Ok(())
    }

    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    pub fn set_start_frame(&mut self, start_frame: u32) {
        self.start_frame = start_frame;
        self.started = false;
    }

    pub fn system(&self) -> &MachineSystem {
        &self.system
    }
}
