//! Configuration system for the Helios generator.
//!
//! Every creative constant of a generation run (canvas, palettes, placement ranges,
//! animation steps, output paths, batch size) lives here and persists to disk as a
//! RON file. Supports CLI overrides via clap and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, BatchConfig, CanvasConfig, Config, DebugConfig, FloatRange, IntRange,
    LayoutConfig, MoonConfig, NamingScheme, OutputConfig, RingConfig, StarConfig,
    StarfieldConfig, TextureConfig,
};
pub use error::ConfigError;
