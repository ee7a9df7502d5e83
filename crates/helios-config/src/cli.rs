//! Command-line argument parsing for the Helios generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Helios command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "helios", about = "Procedural looping solar-system animations")]
pub struct CliArgs {
    /// Number of animations to generate. Prompts on stdin when omitted.
    #[arg(long, short = 'n')]
    pub iterations: Option<u32>,

    /// Maximum number of concurrent runs.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Generate one animation at a time instead of using the worker pool.
    #[arg(long)]
    pub sequential: bool,

    /// Base seed for a reproducible batch.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory receiving the animated GIFs.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Metadata file receiving one JSON line per run.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Frames per revolution.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Disable planet surface textures.
    #[arg(long)]
    pub no_texture: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.iterations {
            self.batch.iterations = Some(n);
        }
        if let Some(w) = args.workers {
            self.batch.workers = w;
        }
        if args.sequential {
            self.batch.sequential = true;
        }
        if let Some(seed) = args.seed {
            self.batch.seed = Some(seed);
        }
        if let Some(ref dir) = args.output_dir {
            self.output.gif_dir = dir.clone();
        }
        if let Some(ref path) = args.metadata {
            self.output.metadata_path = path.clone();
        }
        if let Some(frames) = args.frames {
            self.animation.frames = frames;
        }
        if args.no_texture {
            self.texture.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
