//! One generation run: layout, frame loop, GIF, metadata line.

use std::path::PathBuf;

use helios_config::{Config, NamingScheme};
use helios_render::{FrameCompositor, OpenSimplexSource, SkiaCanvas, Style, SurfaceTexturer};
use helios_system::{Entropy, LayoutGenerator, SceneState, SeededEntropy, Stage};
use tracing::{debug, info};

use crate::error::RunError;
use crate::metadata::MetadataLog;
use crate::sequence::SequenceAssembler;

const NAME_RANGE: (i64, i64) = (1, 10_000);
const PROGRESS_INTERVAL: u32 = 60;

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutput {
    pub seed: u64,
    pub gif_path: PathBuf,
    pub frames: u32,
    /// Planets left after the animation; fewer than placed in black-hole mode.
    pub planets: usize,
}

/// Entropy for run `index`: derived from the batch seed when one is set, otherwise
/// freshly seeded from the OS.
pub fn run_entropy(base_seed: Option<u64>, index: u32) -> SeededEntropy {
    match base_seed {
        Some(seed) => SeededEntropy::new(seed.wrapping_add(u64::from(index))),
        None => SeededEntropy::from_os(),
    }
}

fn artifact_name(config: &Config, entropy: &mut impl Entropy, index: u32) -> String {
    let id = match config.output.naming {
        NamingScheme::Random => entropy.randint(NAME_RANGE.0, NAME_RANGE.1) as u64,
        NamingScheme::Sequential => u64::from(index) + 1,
    };
    format!("{id}.gif")
}

/// Generate, animate, and write one piece.
pub fn generate(
    config: &Config,
    metadata: &MetadataLog,
    index: u32,
    mut entropy: SeededEntropy,
) -> Result<RunOutput, RunError> {
    let seed = entropy.seed();
    let layout = LayoutGenerator::new(config).generate(&mut entropy)?;
    info!(
        run = index,
        seed,
        planets = layout.planets.len(),
        stars = layout.starfield.len(),
        star_size = layout.star.size,
        "layout generated"
    );

    let gif_path = config
        .output
        .gif_dir
        .join(artifact_name(config, &mut entropy, index));

    let stage = Stage::from_config(&config.canvas);
    let mut scene = SceneState::new(layout, stage, &config.animation);
    let mut canvas = SkiaCanvas::new(config.canvas.width, config.canvas.height)?;
    let mut compositor = FrameCompositor::new(
        Style::from_config(config),
        SurfaceTexturer::new(OpenSimplexSource, &config.texture),
    );

    let mut assembler = SequenceAssembler::create(&gif_path, config.animation.frame_delay_ms)?;
    debug!(run = index, path = %assembler.path().display(), "encoding frames");
    compositor.animate(
        &mut canvas,
        &mut scene,
        config.animation.frames,
        |frame, image| {
            if frame % PROGRESS_INTERVAL == 0 {
                debug!(run = index, frame, "rendering");
            }
            assembler.push(image)
        },
    )?;
    let frames = assembler.finish()?;

    let planets = scene.into_planets();
    metadata.append(&planets)?;
    debug!(run = index, path = %metadata.path().display(), "metadata appended");
    info!(run = index, path = %gif_path.display(), frames, "animation written");

    Ok(RunOutput {
        seed,
        gif_path,
        frames,
        planets: planets.len(),
    })
}
