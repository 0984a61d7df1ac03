use glam::DVec2;
use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use super::bubble::Bubble;
use crate::config::BubbleTuning;
use crate::error::MachineError;
use crate::graphics::{Fill, Graphics, ImageDir, Polygon, circle_points, direction};
use crate::machine::component::{ComponentBase, Part};
use crate::types::Color;

/// Slack when comparing accumulated rotation against the spawn threshold, so
/// five steps of 0.2 turns make exactly one turn's worth of bubbles.
const SPAWN_EPSILON: f64 = 1e-9;

const WAND_WIDTH: f64 = 6.0;
const RING_RADIUS: f64 = 12.0;

/// Turns incoming rotation into bubbles and keeps them moving.
///
/// The blower is a rotation sink. Its own rotation only records where the
/// wand points; the work happens in `update`, once per tick, after every
/// rotation for the tick has arrived.
#[derive(Debug, Clone)]
pub struct BubbleBlower {
    base: ComponentBase,
    tuning: BubbleTuning,
    rng: StdRng,
    previous: f64,
    accumulated: f64,
    bubbles: Vec<Bubble>,
    wand: Polygon,
    ring: Polygon,
    bubble_fill: Fill,
}

impl BubbleBlower {
    pub fn new(
        position: DVec2,
        tuning: BubbleTuning,
        rng: StdRng,
        images: &ImageDir,
    ) -> Result<Self, MachineError> {
        tuning.validate()?;
        let tip = DVec2::new(0.0, -tuning.tip_offset);
        let mut wand = Polygon::rectangle(
            -WAND_WIDTH / 2.0,
            -tuning.tip_offset,
            WAND_WIDTH,
            (tuning.tip_offset - RING_RADIUS).max(0.0),
        );
        wand.set_color(Color::rgb(160, 110, 60));
        let ring = Polygon::new(
            circle_points(RING_RADIUS).into_iter().map(|p| p + tip).collect(),
            Fill::Color(Color::rgb(200, 200, 220)),
        );

        Ok(BubbleBlower {
            base: ComponentBase::at(position),
            tuning,
            rng,
            previous: 0.0,
            accumulated: 0.0,
            bubbles: Vec::new(),
            wand,
            ring,
            bubble_fill: images.fill("bubble.png"),
        })
    }

    /// Live bubbles in spawn order.
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn tuning(&self) -> &BubbleTuning {
        &self.tuning
    }

    /// Rotation waiting to be turned into bubbles.
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Where the wand points, in turns: incoming rotation plus the tilt.
    pub fn orientation(&self) -> f64 {
        self.rotation() + self.phase()
    }

    /// Forward rotation since the previous tick. A drop of more than half a
    /// turn is the input wrapping past a whole turn, and only the part past
    /// the wrap counts. Any other backward motion counts as none.
    fn delta(&self) -> f64 {
        let mut delta = self.rotation() - self.previous;
        if delta < -0.5 {
            delta = delta.rem_euclid(1.0);
        }
        delta.max(0.0)
    }

    /// Spawn as many bubbles as the accumulated rotation pays for, up to the
    /// per-tick cap. Returns how many were spawned.
    fn blow(&mut self) -> u32 {
        self.accumulated += self.delta();
        self.previous = self.rotation();

        let threshold = self.tuning.spawn_threshold();
        let mut spawned = 0;
        while self.accumulated + SPAWN_EPSILON >= threshold {
            if self.tuning.max_per_tick.is_some_and(|cap| spawned >= cap) {
                debug!(
                    "bubble cap of {spawned} reached, dropping {:.3} turns",
                    self.accumulated
                );
                self.accumulated %= threshold;
                break;
            }
            let bubble = self.create_bubble();
            self.bubbles.push(bubble);
            self.accumulated = (self.accumulated - threshold).max(0.0);
            spawned += 1;
        }
        spawned
    }

    fn create_bubble(&mut self) -> Bubble {
        let t = &self.tuning;
        let tip_turns = self.orientation() + self.rng.gen_range(-t.tip_spread..=t.tip_spread);
        let launch_turns =
            tip_turns + t.launch_bias + self.rng.gen_range(-t.launch_jitter..=t.launch_jitter);
        let speed = self.rng.gen_range(t.min_speed..=t.max_speed);
        let offset = t.tip_offset + self.rng.gen_range(-t.tip_offset_jitter..=t.tip_offset_jitter);

        Bubble::new(
            direction(tip_turns) * offset,
            direction(launch_turns) * speed,
            t.initial_radius,
        )
    }

    /// Return to the rest pose: no bubbles, nothing owed, and the current
    /// rotation taken as the starting point.
    fn rest(&mut self) {
        self.previous = self.rotation();
        self.accumulated = 0.0;
        self.bubbles.clear();
    }
}

impl Part for BubbleBlower {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn update(&mut self, time: f64) {
        if time <= 0.0 {
            self.rest();
            return;
        }
        let spawned = self.blow();
        if spawned > 0 {
            debug!("blew {spawned} bubble(s) at t={time:.3}");
        }

        for bubble in &mut self.bubbles {
            bubble.step(&self.tuning, &mut self.rng);
        }
        let cull = self.tuning.cull_bounds;
        self.bubbles
            .retain(|b| !b.is_popped() && cull.contains(b.position()));
    }

    fn draw(&self, graphics: &mut dyn Graphics, origin: DVec2) {
        let at = origin + self.position();
        let turns = self.base.draw_rotation();
        self.wand.draw(graphics, at, turns);
        self.ring.draw(graphics, at, turns);
        for bubble in &self.bubbles {
            bubble.draw(graphics, at, &self.bubble_fill);
        }
    }

    fn hit_test(&self, point: DVec2) -> bool {
        let local = point - self.position();
        let turns = self.base.draw_rotation();
        self.wand.contains(local, turns) || self.ring.contains(local, turns)
    }
}
