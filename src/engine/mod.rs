//! Engine: steps a placed machine through host frames and captures each one
//! as a `ResolvedScene`.
//!
//! The engine owns time; it never deals with terminals, ANSI codes, or
//! playback.

pub mod canvas;

use crate::adapter::MachineAdapter;
use crate::config::CanvasConfig;
use crate::types::ResolvedScene;
use canvas::CellCanvas;

pub struct Engine;

impl Engine {
    /// Show host frames `0..frame_count` on `adapter` and capture each.
    ///
    /// The frame the machine starts on carries a marker so the player can
    /// jump to it.
    pub fn compile(
        adapter: &mut MachineAdapter,
        frame_count: u32,
        canvas: &CanvasConfig,
    ) -> Vec<ResolvedScene> {
        (0..frame_count)
            .map(|frame| Self::resolve_frame(adapter, frame, canvas))
            .collect()
    }

    fn resolve_frame(
        adapter: &mut MachineAdapter,
        frame: u32,
        config: &CanvasConfig,
    ) -> ResolvedScene {
        adapter.set_frame(frame);

        let mut canvas = CellCanvas::new(config);
        adapter.draw(&mut canvas);

        let marker = (frame == adapter.start_frame())
            .then(|| format!("{} starts", adapter.name()));
        canvas.into_scene(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BubbleTuning;
    use crate::graphics::ImageDir;
    use crate::machine::MachineFactory;

    #[test]
    fn one_scene_per_frame_with_the_start_marked() {
        let factory = MachineFactory::new(ImageDir::none(), BubbleTuning::default(), 3);
        let mut adapter = MachineAdapter::new("mill", factory).unwrap();
        adapter.set_position(glam::DVec2::new(200.0, 250.0)).unwrap();
        adapter.set_start_frame(4);

        let config = CanvasConfig::default();
        let scenes = Engine::compile(&mut adapter, 10, &config);

        assert_eq!(scenes.len(), 10);
        assert!(scenes.iter().all(|s| !s.ops.is_empty()));
        assert!(scenes.iter().all(|s| s.width == config.width));
        let marked: Vec<_> = scenes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.marker.as_deref().map(|m| (i, m)))
            .collect();
        assert_eq!(marked, vec![(4, "mill starts")]);
    }
}
