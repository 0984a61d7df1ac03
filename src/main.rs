use std::{fs, process};

use anyhow::{Context, Result, bail};
use glam::DVec2;
use log::info;
use rand::RngCore;

use bubble_machine::{
    adapter::MachineAdapter,
    config::SimConfig,
    engine::Engine,
    graphics::ImageDir,
    machine::MachineFactory,
    player::Player,
    renderer::Renderer,
    types::{PlayablePresentation, TerminalContract},
};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const INIT_USAGE: &str = "bubble-machine init <placement.json> [variant]";
const RENDER_USAGE: &str = "bubble-machine render <placement.json> <output.json> [frames]";
const PLAY_USAGE: &str = "bubble-machine play <presentation.json>";
const RUN_USAGE: &str = "bubble-machine run <placement.json> [frames]";
const HIT_USAGE: &str = "bubble-machine hit <placement.json> <col> <row> [frame]";

/// Frames rendered or simulated when no count is given.
const DEFAULT_FRAMES: u32 = 300;

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = SimConfig::load();

    match args.next().as_deref() {
        Some("init") => {
            let path = args.next().context(INIT_USAGE)?;
            let variant = parse_or(args.next(), 1, "variant")?;
            init(&config, &path, variant)
        }
        Some("render") => {
            let placement_path = args.next().context(RENDER_USAGE)?;
            let output_path = args.next().context(RENDER_USAGE)?;
            let frames = parse_or(args.next(), DEFAULT_FRAMES, "frame count")?;
            render(&config, &placement_path, &output_path, frames)
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(&path)
        }
        Some("run") => {
            let path = args.next().context(RUN_USAGE)?;
            let frames = parse_or(args.next(), DEFAULT_FRAMES, "frame count")?;
            simulate(&config, &path, frames)
        }
        Some("hit") => {
            let path = args.next().context(HIT_USAGE)?;
            let col: u16 = args.next().context(HIT_USAGE)?.parse().context("Invalid column")?;
            let row: u16 = args.next().context(HIT_USAGE)?.parse().context("Invalid row")?;
            let frame = parse_or(args.next(), 0, "frame")?;
            hit(&config, &path, col, row, frame)
        }
        _ => bail!(
            "Bubble Machine: animated pulley machines in the terminal\n\nUsage:\n  {INIT_USAGE}\n  {RENDER_USAGE}\n  {PLAY_USAGE}\n  {RUN_USAGE}\n  {HIT_USAGE}"
        ),
    }
}

fn parse_or(arg: Option<String>, default: u32, what: &str) -> Result<u32> {
    match arg {
        Some(s) => s.parse().with_context(|| format!("Invalid {what}: {s}")),
        None => Ok(default),
    }
}

fn factory(config: &SimConfig) -> MachineFactory {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    info!("bubble seed {seed}");
    MachineFactory::new(
        ImageDir::new(&config.images_dir),
        config.bubbles.clone(),
        seed,
    )
}

fn load(config: &SimConfig, path: &str) -> Result<MachineAdapter> {
    let mut adapter = MachineAdapter::load(path, factory(config))?;
    adapter
        .set_frame_rate(config.frame_rate)
        .context("Invalid frame rate in config")?;
    Ok(adapter)
}

fn init(config: &SimConfig, path: &str, variant: u32) -> Result<()> {
    let mut adapter = MachineAdapter::new(format!("machine {variant}"), factory(config))?;
    adapter.set_variant(variant)?;
    // Base centred horizontally, resting near the bottom of the canvas.
    let canvas = &config.canvas;
    let size = DVec2::new(
        f64::from(canvas.width) * canvas.cell_width,
        f64::from(canvas.height) * canvas.cell_height,
    );
    adapter.set_position(DVec2::new(size.x / 2.0, size.y - 60.0))?;
    adapter.save(path)?;

    eprintln!("Wrote machine {variant} placement to {path}");
    Ok(())
}

fn render(config: &SimConfig, placement_path: &str, output_path: &str, frames: u32) -> Result<()> {
    let mut adapter = load(config, placement_path)?;

    let scenes = Engine::compile(&mut adapter, frames, &config.canvas);
    let contract = TerminalContract {
        width: config.canvas.width,
        height: config.canvas.height,
    };
    let presentation = Renderer::render(&scenes, contract, config.frame_rate);

    let output_json = serde_json::to_string_pretty(&presentation)?;
    fs::write(output_path, &output_json)
        .with_context(|| format!("Failed to write {output_path}"))?;

    eprintln!(
        "Rendered {} frames from {} -> {}",
        presentation.frames.len(),
        placement_path,
        output_path,
    );

    Ok(())
}

fn play(path: &str) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let presentation: PlayablePresentation =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))?;

    let mut player = Player::new(presentation);
    player.play()
}

/// Step the machine without drawing and report once per second of host time.
fn simulate(config: &SimConfig, path: &str, frames: u32) -> Result<()> {
    let mut adapter = load(config, path)?;
    let per_second = config.frame_rate.round().max(1.0) as u32;

    for frame in 0..frames {
        adapter.set_frame(frame);
        if frame % per_second != 0 && frame + 1 != frames {
            continue;
        }
        let system = adapter.system();
        let bubbles: usize = system.machine().blowers().map(|b| b.bubbles().len()).sum();
        println!(
            "frame {frame:>5}  machine time {:>7.3}s  bubbles {bubbles}",
            system.machine_time(),
        );
    }
    Ok(())
}

fn hit(config: &SimConfig, path: &str, col: u16, row: u16, frame: u32) -> Result<()> {
    let mut adapter = load(config, path)?;
    adapter.set_frame(frame);

    let point = DVec2::new(
        (f64::from(col) + 0.5) * config.canvas.cell_width,
        (f64::from(row) + 0.5) * config.canvas.cell_height,
    );
    let verdict = if adapter.hit_test(point) { "hit" } else { "miss" };
    println!("{verdict}: {} at cell ({col}, {row}), frame {frame}", adapter.name());
    Ok(())
}
