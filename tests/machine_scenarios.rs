use approx::assert_abs_diff_eq;
use glam::DVec2;

use bubble_machine::adapter::MachineAdapter;
use bubble_machine::config::{BubbleTuning, CanvasConfig};
use bubble_machine::engine::Engine;
use bubble_machine::graphics::ImageDir;
use bubble_machine::machine::{Component, MachineFactory, Part};
use bubble_machine::renderer::Renderer;
use bubble_machine::types::{Frame, PlayablePresentation, TerminalContract};

fn factory(seed: u64) -> MachineFactory {
    MachineFactory::new(ImageDir::none(), BubbleTuning::default(), seed)
}

fn motor_rotation(adapter: &MachineAdapter) -> f64 {
    adapter
        .system()
        .machine()
        .motors()
        .next()
        .map(|m| m.rotation())
        .unwrap()
}

#[test]
fn first_machine_turns_once_a_second_from_its_start_frame() {
    let mut adapter = MachineAdapter::new("machine", factory(1)).unwrap();
    adapter.set_frame_rate(30.0).unwrap();
    adapter.set_start_frame(30);

    for (frame, expected) in [(30, 0.0), (45, 0.5), (60, 0.0)] {
        adapter.set_frame(frame);
        assert_abs_diff_eq!(motor_rotation(&adapter), expected, epsilon = 1e-9);
    }
}

#[test]
fn scrubbing_back_before_the_start_resets_the_machine() {
    let mut adapter = MachineAdapter::new("machine", factory(2)).unwrap();
    adapter.set_start_frame(10);
    for frame in 0..120 {
        adapter.set_frame(frame);
    }
    let blower = adapter.system().machine().blowers().next().unwrap();
    assert!(!blower.bubbles().is_empty());

    adapter.set_frame(3);
    let blower = adapter.system().machine().blowers().next().unwrap();
    assert!(blower.bubbles().is_empty());
    assert_abs_diff_eq!(motor_rotation(&adapter), 0.0, epsilon = 1e-12);
}

#[test]
fn bubbles_follow_the_blower_rotation() {
    let mut adapter = MachineAdapter::new("machine", factory(3)).unwrap();
    let tuning = BubbleTuning::default();
    let mut spawned_positions = Vec::new();

    for frame in 0..300 {
        adapter.set_frame(frame);
        let blower = adapter.system().machine().blowers().next().unwrap();
        for bubble in blower.bubbles() {
            assert!(bubble.radius() >= tuning.initial_radius);
            assert!(bubble.radius() <= tuning.pop_radius);
            assert!(tuning.cull_bounds.contains(bubble.position()));
            assert!(!bubble.is_popped());
        }
        if let Some(newest) = blower.bubbles().last() {
            spawned_positions.push(newest.position());
        }
    }
    assert!(!spawned_positions.is_empty());
}

#[test]
fn second_machine_drives_its_blower_faster_than_its_motor() {
    let mut adapter = MachineAdapter::new("machine", factory(4)).unwrap();
    adapter.set_variant(2).unwrap();
    adapter.set_frame(12);

    let machine = adapter.system().machine();
    let motor = motor_rotation(&adapter);
    let blower = machine.blowers().next().unwrap();
    // 15 -> 20 belt, shaft, then 30 -> 15 belt.
    assert_abs_diff_eq!(blower.rotation(), motor * 0.75 * 2.0, epsilon = 1e-9);

    let belts = machine
        .components()
        .iter()
        .filter(|c| matches!(c, Component::FlappingBelt(_)))
        .count();
    assert_eq!(belts, 2);
}

#[test]
fn placement_survives_save_and_load() {
    let mut adapter = MachineAdapter::new("bubbler", factory(5)).unwrap();
    adapter.set_variant(2).unwrap();
    adapter.set_position(DVec2::new(250.0, 180.0)).unwrap();
    adapter.set_scale(0.5).unwrap();
    adapter.set_start_frame(90);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bubbler.json");
    adapter.save(&path).unwrap();

    let loaded = MachineAdapter::load(&path, factory(5)).unwrap();
    assert_eq!(loaded.placement(), adapter.placement());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["machine_number"], 2);
    assert_eq!(json["position"]["x"], 250.0);
}

#[test]
fn rendered_presentation_marks_the_start_and_survives_json() {
    let canvas = CanvasConfig::default();
    let mut adapter = MachineAdapter::new("machine", factory(6)).unwrap();
    adapter.set_position(DVec2::new(200.0, 260.0)).unwrap();
    adapter.set_start_frame(15);

    let scenes = Engine::compile(&mut adapter, 60, &canvas);
    let contract = TerminalContract {
        width: canvas.width,
        height: canvas.height,
    };
    let presentation = Renderer::render(&scenes, contract, 30.0);
    assert_eq!(presentation.frames.len(), 60);
    assert_eq!(presentation.markers.len(), 1);
    assert_eq!(presentation.markers[0].frame_index, 15);

    // The motor spins after the start, so some frame after it changes cells.
    let moving = presentation.frames[16..]
        .iter()
        .any(|f| matches!(f, Frame::Diff { changes } if !changes.is_empty()));
    assert!(moving);

    let json = serde_json::to_string(&presentation).unwrap();
    let back: PlayablePresentation = serde_json::from_str(&json).unwrap();
    assert_eq!(back.frames.len(), 60);
    assert_eq!(back.markers, presentation.markers);
    assert_eq!(back.frame_rate, 30.0);
}

#[test]
fn clicks_land_on_the_machine_through_position_and_scale() {
    let mut adapter = MachineAdapter::new("machine", factory(7)).unwrap();
    adapter.set_position(DVec2::new(300.0, 300.0)).unwrap();
    adapter.set_frame(0);

    // Middle of the base: machine (0, 20) scaled by 0.75.
    assert!(adapter.hit_test(DVec2::new(300.0, 315.0)));
    // Well clear of every part.
    assert!(!adapter.hit_test(DVec2::new(0.0, 0.0)));
}
