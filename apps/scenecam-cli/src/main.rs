mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scenecam_common::FrameStep;
use scenecam_input::KeyboardState;
use scenecam_render::DebugTextRenderer;
use scenecam_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

use crate::demo::{CameraMode, DemoConfig, DemoScene};

#[derive(Parser)]
#[command(name = "scenecam-cli", about = "Headless driver for the scene and camera demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding the demo configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Camera rig, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    camera: Option<CameraMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run frames with a held key pattern and print the last one
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Held keys for every frame, any of "wasd". They steer the tank, or
        /// the camera itself under `--camera free-fly`
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Seconds per frame; omit for a fixed step of one reference frame
        #[arg(short, long)]
        elapsed: Option<f32>,
        /// Print every frame instead of only the last
        #[arg(long)]
        all: bool,
    },
    /// Print the scene hierarchy and camera
    Info,
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config: DemoConfig = match &cli.config {
        Some(path) => scenecam_common::load_json(path)?,
        None => DemoConfig::default(),
    };
    if let Some(camera) = cli.camera {
        config.camera = camera;
    }

    match cli.command {
        Commands::Run {
            frames,
            keys,
            elapsed,
            all,
        } => {
            let mut scene = DemoScene::new(&config)?;
            let keys = KeyboardState::from_keys(&keys);
            let step = elapsed.map_or(FrameStep::ONE, FrameStep::from_elapsed);
            let renderer = DebugTextRenderer::new();
            tracing::info!(frames, step = step.frames(), "running demo");

            for _ in 0..frames {
                scene.tick(keys, step)?;
                if all {
                    print!("{}", scene.render(&renderer));
                }
            }
            if !all {
                print!("{}", scene.render(&renderer));
            }
            println!("frames={}", scene.frame());
        }
        Commands::Info => {
            let scene = DemoScene::new(&config)?;
            let graph = scene.graph();
            println!("scenecam-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", SceneInspector::summary(graph));
            println!("{}", SceneInspector::inspect_camera(scene.camera().camera()));
            for ring in scene.rings() {
                println!(
                    "ring: members={} radius={} direction={:?}",
                    ring.members().len(),
                    ring.orbit().radius(),
                    ring.orbit().direction()
                );
            }
            println!("tank parts: {}", scene.tank().all().len());
            for (depth, id) in SceneInspector::hierarchy(graph) {
                if let Some(info) = SceneInspector::inspect_node(graph, id) {
                    println!("{:indent$}{info}", "", indent = depth * 2);
                }
            }
        }
        Commands::Config => {
            println!("{}", scenecam_common::to_pretty_json(&config)?);
        }
    }

    Ok(())
}
