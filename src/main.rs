//! Headless demo: plays a scripted session against the bundled dataset and
//! writes every k-th frame as a PNG.
//!
//! ```text
//! airglow-demo [--frames N] [--every K] [--out DIR] [--config FILE] [--seed S]
//! ```
//!
//! Set `RUST_LOG=debug` to see effect spawns and mode changes.

use airglow::prelude::*;
use airglow::{ConfigError, RenderError};
use rand::rngs::SmallRng;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug)]
enum DemoError {
    Args(String),
    Config(ConfigError),
    Render(RenderError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Args(msg) => write!(f, "{}", msg),
            DemoError::Config(e) => write!(f, "Invalid configuration: {}", e),
            DemoError::Render(e) => write!(f, "Failed to write frame: {}", e),
            DemoError::Io(e) => write!(f, "Failed to read config file: {}", e),
            DemoError::Json(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for DemoError {}

impl From<ConfigError> for DemoError {
    fn from(e: ConfigError) -> Self {
        DemoError::Config(e)
    }
}

impl From<RenderError> for DemoError {
    fn from(e: RenderError) -> Self {
        DemoError::Render(e)
    }
}

impl From<std::io::Error> for DemoError {
    fn from(e: std::io::Error) -> Self {
        DemoError::Io(e)
    }
}

impl From<serde_json::Error> for DemoError {
    fn from(e: serde_json::Error) -> Self {
        DemoError::Json(e)
    }
}

struct Options {
    frames: u64,
    every: u64,
    out: PathBuf,
    config: Option<PathBuf>,
    seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frames: 600,
            every: 30,
            out: PathBuf::from("frames"),
            config: None,
            seed: 2023,
        }
    }
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, DemoError> {
        let mut options = Options::default();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| DemoError::Args(format!("{} needs a value", flag)));
            match flag.as_str() {
                "--frames" => options.frames = parse_number(&value()?)?,
                "--every" => options.every = parse_number::<u64>(&value()?)?.max(1),
                "--out" => options.out = PathBuf::from(value()?),
                "--config" => options.config = Some(PathBuf::from(value()?)),
                "--seed" => options.seed = parse_number(&value()?)?,
                other => return Err(DemoError::Args(format!("Unknown argument: {}", other))),
            }
        }
        Ok(options)
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, DemoError> {
    text.parse()
        .map_err(|_| DemoError::Args(format!("Expected a number, got {:?}", text)))
}

/// Scripted user actions keyed by frame number.
fn script(frame: u64, scene: &Scene<RegionalDataset>, input: &mut Input) {
    let size = scene.config().bounds();
    // slow figure-eight over the district grid
    let t = frame as f32 * 0.01;
    let pointer = Vec2::new(
        size.x * 0.5 + (t * 2.0).sin() * size.x * 0.35,
        size.y * 0.4 + (t * 3.0).sin() * size.y * 0.2,
    );
    input.pointer_moved(pointer);

    match frame {
        30 => input.primary_click(),
        60 => tap(input, Key::E),
        120 => tap(input, Key::R),
        240 => tap(input, Key::R),
        260 => {
            if let Some(cell) = scene.layout().cell(0) {
                input.pointer_moved(cell.center());
                input.primary_click();
            }
        }
        300 => tap(input, Key::W),
        330 => {
            let timeline = scene.timeline();
            input.pointer_moved(timeline.origin + timeline.size * Vec2::new(0.9, 0.5));
            input.primary_click();
        }
        420 => tap(input, Key::Left),
        450 => tap(input, Key::S),
        500 => tap(input, Key::C),
        _ => {}
    }
}

fn tap(input: &mut Input, key: Key) {
    input.key_down(key);
    input.key_up(key);
}

fn load_config(options: &Options) -> Result<SceneConfig, DemoError> {
    let config = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<SceneConfig>(&text)?
        }
        None => SceneConfig::new(),
    };
    Ok(config.with_seed(options.seed).with_fixed_timestep(1.0 / 60.0))
}

fn run(options: Options) -> Result<(), DemoError> {
    let config = load_config(&options)?;
    let size = config.bounds();

    let mut data_rng = SmallRng::seed_from_u64(options.seed);
    let data = RegionalDataset::hong_kong(&mut data_rng);
    let mut scene = Scene::new(config, data)?;
    let mut input = Input::new();
    let mut canvas = RasterCanvas::new(size.x as u32, size.y as u32);

    log::info!(
        "Rendering {} frames to {} (every {})",
        options.frames,
        options.out.display(),
        options.every
    );

    let mut written = 0;
    for frame in 0..options.frames {
        script(frame, &scene, &mut input);
        for command in input.drain() {
            if !scene.handle(command) {
                return Ok(());
            }
        }
        scene.advance_frame(input.pointer());

        if frame % options.every == 0 {
            scene.draw(&mut canvas);
            canvas.save(options.out.join(format!("frame_{:05}.png", frame)))?;
            written += 1;
            log::debug!(
                "Frame {} (+{:.3}s): year {:.2}, index {:.1}, {} effects",
                frame,
                scene.frame_delta(),
                scene.current_year(),
                scene.index_value(),
                scene.effects().total()
            );
        }
    }

    let stats = scene.statistics();
    log::info!(
        "Wrote {} frames. Best year {} ({:.1}), worst year {} ({:.1}), {:.2}/year improvement",
        written,
        stats.best_year,
        stats.best_mean,
        stats.worst_year,
        stats.worst_mean,
        stats.yearly_improvement
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = Options::parse(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
