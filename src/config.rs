use std::path::PathBuf;

use glam::DVec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{MachineError, require_finite, require_positive};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames per second used to turn frame numbers into machine time.
    pub frame_rate: f64,
    pub images_dir: PathBuf,
    /// Seed for bubble randomness; `None` picks a fresh one per run.
    pub seed: Option<u64>,
    pub canvas: CanvasConfig,
    pub bubbles: BubbleTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            frame_rate: 30.0,
            images_dir: PathBuf::from("images"),
            seed: None,
            canvas: CanvasConfig::default(),
            bubbles: BubbleTuning::default(),
        }
    }
}

impl SimConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "invalid config {} ({e}), using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("bubble-machine");
        path.push("config.json");
        path
    }
}

/// Size of the terminal canvas and how many machine pixels one cell covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u16,
    pub height: u16,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 100,
            height: 40,
            cell_width: 4.0,
            cell_height: 8.0,
        }
    }
}

/// Axis-aligned rectangle in machine pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Emission and motion constants for a bubble blower. Angles are in turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleTuning {
    pub bubbles_per_rotation: f64,
    /// Most bubbles spawned in one tick; `None` means no cap.
    pub max_per_tick: Option<u32>,
    /// Distance from the pivot to the wand tip, in pixels.
    pub tip_offset: f64,
    pub tip_offset_jitter: f64,
    /// Half-width of the cone the emission point is sampled from.
    pub tip_spread: f64,
    /// Launch direction relative to the tip direction.
    pub launch_bias: f64,
    pub launch_jitter: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Vertical acceleration in pixels/s². Negative floats bubbles upward.
    pub gravity: f64,
    /// Simulation step applied on every tick, in seconds.
    pub time_step: f64,
    pub initial_radius: f64,
    pub growth: f64,
    /// Chance per tick that a bubble grows by `growth`.
    pub growth_chance: f64,
    pub pop_radius: f64,
    /// Bubbles leaving this rectangle are discarded.
    pub cull_bounds: Bounds,
}

impl Default for BubbleTuning {
    fn default() -> Self {
        BubbleTuning {
            bubbles_per_rotation: 5.0,
            max_per_tick: Some(3),
            tip_offset: 100.0,
            tip_offset_jitter: 5.0,
            tip_spread: 0.04,
            launch_bias: 0.25,
            launch_jitter: 0.016,
            min_speed: 20.0,
            max_speed: 40.0,
            gravity: -8.0,
            time_step: 0.016,
            initial_radius: 8.0,
            growth: 1.0,
            growth_chance: 0.1,
            pop_radius: 16.0,
            cull_bounds: Bounds {
                min: DVec2::new(-800.0, -600.0),
                max: DVec2::new(800.0, 600.0),
            },
        }
    }
}

impl BubbleTuning {
    pub fn validate(&self) -> Result<(), MachineError> {
        require_positive("bubbles per rotation", self.bubbles_per_rotation)?;
        if self.max_per_tick == Some(0) {
            return Err(MachineError::invalid(
                "bubble cap",
                "a per-tick cap of zero never spawns; use no cap instead",
            ));
        }
        require_finite("tip offset", self.tip_offset)?;
        for (what, value) in [
            ("tip offset jitter", self.tip_offset_jitter),
            ("tip spread", self.tip_spread),
            ("launch jitter", self.launch_jitter),
            ("minimum speed", self.min_speed),
            ("growth", self.growth),
        ] {
            if require_finite(what, value)? < 0.0 {
                return Err(MachineError::invalid(what, format!("{value} is negative")));
            }
        }
        require_finite("launch bias", self.launch_bias)?;
        require_finite("maximum speed", self.max_speed)?;
        if self.max_speed < self.min_speed {
            return Err(MachineError::invalid(
                "speed range",
                format!("{} is below the minimum {}", self.max_speed, self.min_speed),
            ));
        }
        require_finite("gravity", self.gravity)?;
        require_positive("time step", self.time_step)?;
        require_positive("initial radius", self.initial_radius)?;
        if !(0.0..=1.0).contains(&self.growth_chance) {
            return Err(MachineError::invalid(
                "growth chance",
                format!("{} is not a probability", self.growth_chance),
            ));
        }
        if require_finite("pop radius", self.pop_radius)? <= self.initial_radius {
            return Err(MachineError::invalid(
                "pop radius",
                format!(
                    "{} must exceed the initial radius {}",
                    self.pop_radius, self.initial_radius
                ),
            ));
        }
        let cull = self.cull_bounds;
        if !(cull.min.x < cull.max.x && cull.min.y < cull.max.y) {
            return Err(MachineError::invalid("cull bounds", "minimum must be below maximum"));
        }
        Ok(())
    }

    /// Rotation that has to accumulate for one bubble.
    pub fn spawn_threshold(&self) -> f64 {
        1.0 / self.bubbles_per_rotation
    }
}
