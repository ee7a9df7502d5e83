//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canvas geometry and static colors.
    pub canvas: CanvasConfig,
    /// Central star settings.
    pub star: StarConfig,
    /// Background starfield settings.
    pub starfield: StarfieldConfig,
    /// Planet placement settings.
    pub layout: LayoutConfig,
    /// Moon attachment settings.
    pub moon: MoonConfig,
    /// Ring attachment settings.
    pub rings: RingConfig,
    /// Surface noise texture settings.
    pub texture: TextureConfig,
    /// Frame loop and black-hole settings.
    pub animation: AnimationConfig,
    /// Output artifact locations.
    pub output: OutputConfig,
    /// Batch driver settings.
    pub batch: BatchConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Inclusive integer range, drawn from with `randint` semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Returns `true` if at least one nonzero integer lies in the range.
    pub fn has_nonzero(&self) -> bool {
        self.min <= self.max && (self.min != 0 || self.max != 0)
    }
}

/// Inclusive float range, drawn from with `uniform` semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Canvas configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Thickness of the border frame, drawn in the star color.
    pub border_size: u32,
    /// Background fill, linear RGB in `[0, 1]`.
    pub background: [f64; 3],
    /// Color of the static starfield dots.
    pub starlight: [f64; 3],
}

/// Central star configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    /// Star radius range in pixels.
    pub size: IntRange,
    /// Add pure black to the star palette, enabling black-hole mode.
    pub allow_black_hole: bool,
}

/// Background starfield configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Range of the star count roll. One fewer point than the roll is placed.
    pub count: IntRange,
    /// Minimum distance of a point from any canvas edge.
    pub margin: u32,
    /// Radius of each dot.
    pub point_radius: f64,
}

/// Planet placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of placement attempts per run.
    pub attempts: u32,
    /// Planet palette, 8-bit RGB. The star palette is derived from it.
    pub palette: Vec<[u8; 3]>,
    /// Planet radius range.
    pub size: IntRange,
    /// Gap between consecutive orbits.
    pub distance: IntRange,
    /// Added to `distance.min` after every accepted planet.
    pub distance_min_step: i64,
    /// Initial angular speed range (tenths of a degree per frame).
    pub speed: IntRange,
    /// Subtracted from `speed.max` after every accepted planet.
    pub speed_max_step: i64,
    /// Subtracted from `speed.min` after every accepted planet.
    pub speed_min_step: i64,
    /// Initial orbital phase range in degrees.
    pub phase: IntRange,
    /// Multiplier applied to a body's size when checking orbit clearance.
    pub clearance_factor: f64,
}

/// Moon attachment configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoonConfig {
    /// Orbit radius around the parent.
    pub orbit: IntRange,
    /// Range of the attachment roll.
    pub chance: IntRange,
    /// A roll strictly above this value attaches a moon.
    pub chance_threshold: i64,
    /// Angular speed range (zero excluded).
    pub speed: IntRange,
    /// Moon radius range.
    pub size: IntRange,
}

/// Ring attachment configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RingConfig {
    /// Range of the attachment roll.
    pub chance: IntRange,
    /// A roll strictly above this value tries to attach rings.
    pub chance_threshold: i64,
    /// Number of rings attempted.
    pub count: IntRange,
    /// Stroke width range.
    pub width: IntRange,
    /// Radius range of the first ring.
    pub radius: IntRange,
    /// Planets strictly larger than this get `large_planet_bonus` added to each ring radius.
    pub large_planet_size: i64,
    pub large_planet_bonus: i64,
    /// Added to both ends of the radius range after each placed ring.
    pub radius_step: i64,
}

/// Surface noise texture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Textured variant. When `false` no planet carries noise parameters.
    pub enabled: bool,
    /// Range of the texture roll; any roll above `chance.min` textures the planet.
    pub chance: IntRange,
    /// Noise seed range.
    pub seed: IntRange,
    /// Base noise frequency range.
    pub scale: FloatRange,
    /// Light speckle threshold range.
    pub threshold_light: FloatRange,
    /// Dark speckle threshold range.
    pub threshold_dark: FloatRange,
    /// Octave count range.
    pub octaves: IntRange,
    /// Sampling grid stride in pixels.
    pub grid_stride: u32,
    /// Radius of each speckle dot.
    pub dot_radius: f64,
}

/// Frame loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames per revolution.
    pub frames: u32,
    /// Delay between frames in the encoded animation.
    pub frame_delay_ms: u32,
    /// Alpha of the cast half-disc shadow.
    pub shadow_alpha: f64,
    /// Alpha of ring strokes.
    pub ring_alpha: f64,
    /// Radius multiplier of the background disc that detaches a planet from its orbit line.
    pub detach_factor: f64,
    /// Black hole: `center` increase per planet per frame.
    pub black_hole_center_step: f64,
    /// Black hole: speed magnitude increase per planet per frame.
    pub black_hole_speed_step: f64,
    /// Black hole: star radius growth per consumed planet.
    pub black_hole_growth: f64,
    /// Black hole: exclusion radius is `star_center - star_size * factor`.
    pub black_hole_exclusion_factor: f64,
}

/// How output animation files are named.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NamingScheme {
    /// Random identifier in `1..=10000`.
    Random,
    /// Run index within the batch, starting at 1.
    Sequential,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one animated GIF per run.
    pub gif_dir: PathBuf,
    /// Append-only metadata file, one JSON array per run.
    pub metadata_path: PathBuf,
    /// File naming scheme for the animations.
    pub naming: NamingScheme,
}

/// Batch driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of runs executing concurrently.
    pub workers: usize,
    /// Number of runs. `None` prompts on stdin.
    pub iterations: Option<u32>,
    /// Run one generation at a time on the calling thread.
    pub sequential: bool,
    /// Base seed for reproducible batches. Run `k` uses `seed + k`.
    pub seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            border_size: 10,
            background: [0.514, 0.431, 0.976],
            starlight: [0.973, 0.929, 0.906],
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            size: IntRange::new(25, 40),
            allow_black_hole: true,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: IntRange::new(300, 500),
            margin: 12,
            point_radius: 1.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            attempts: 9,
            palette: vec![
                [181, 168, 250],
                [204, 196, 252],
                [95, 237, 223],
                [28, 94, 87],
                [32, 0, 82],
                [13, 0, 33],
                [74, 0, 43],
                [96, 0, 78],
                [38, 0, 31],
                [158, 245, 237],
                [199, 105, 158],
                [128, 51, 112],
                [248, 237, 231],
                [191, 247, 242],
                [217, 156, 191],
            ],
            size: IntRange::new(5, 15),
            distance: IntRange::new(50, 251),
            distance_min_step: 5,
            speed: IntRange::new(-15, 15),
            speed_max_step: 3,
            speed_min_step: 2,
            phase: IntRange::new(0, 360),
            clearance_factor: 1.5,
        }
    }
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            orbit: IntRange::new(40, 50),
            chance: IntRange::new(1, 10),
            chance_threshold: 3,
            speed: IntRange::new(-20, 20),
            size: IntRange::new(2, 4),
        }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            chance: IntRange::new(1, 10),
            chance_threshold: 7,
            count: IntRange::new(1, 3),
            width: IntRange::new(2, 4),
            radius: IntRange::new(15, 20),
            large_planet_size: 10,
            large_planet_bonus: 5,
            radius_step: 5,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: IntRange::new(0, 3),
            seed: IntRange::new(0, 10_000),
            scale: FloatRange::new(0.02, 0.1),
            threshold_light: FloatRange::new(0.1, 0.4),
            threshold_dark: FloatRange::new(-0.4, -0.1),
            octaves: IntRange::new(1, 3),
            grid_stride: 2,
            dot_radius: 1.5,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 360,
            frame_delay_ms: 33,
            shadow_alpha: 0.2,
            ring_alpha: 0.4,
            detach_factor: 1.5,
            black_hole_center_step: 2.0,
            black_hole_speed_step: 0.2,
            black_hole_growth: 5.0,
            black_hole_exclusion_factor: 1.5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            gif_dir: PathBuf::from("nft/gifs"),
            metadata_path: PathBuf::from("nft/metadata/metadata.txt"),
            naming: NamingScheme::Random,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            iterations: None,
            sequential: false,
            seed: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for the generator, `./helios` if the platform has none.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("helios")
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject configurations that cannot produce a run: empty or single-color
    /// palettes (the no-repeat color draw would never terminate), inverted ranges,
    /// speed ranges containing only zero, and degenerate canvas or batch sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let canvas = &self.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return invalid("canvas must be at least 1x1".into());
        }
        let short_side = canvas.width.min(canvas.height);
        if canvas.border_size * 2 >= short_side {
            return invalid(format!(
                "border {} leaves no room on a {}x{} canvas",
                canvas.border_size, canvas.width, canvas.height
            ));
        }
        if self.starfield.margin * 2 >= short_side {
            return invalid(format!(
                "starfield margin {} leaves no room on a {}x{} canvas",
                self.starfield.margin, canvas.width, canvas.height
            ));
        }

        let distinct: HashSet<[u8; 3]> = self.layout.palette.iter().copied().collect();
        if distinct.len() < 2 {
            return invalid("planet palette needs at least two distinct colors".into());
        }

        let int_ranges = [
            ("star.size", self.star.size),
            ("starfield.count", self.starfield.count),
            ("layout.size", self.layout.size),
            ("layout.distance", self.layout.distance),
            ("layout.speed", self.layout.speed),
            ("layout.phase", self.layout.phase),
            ("moon.orbit", self.moon.orbit),
            ("moon.chance", self.moon.chance),
            ("moon.speed", self.moon.speed),
            ("moon.size", self.moon.size),
            ("rings.chance", self.rings.chance),
            ("rings.count", self.rings.count),
            ("rings.width", self.rings.width),
            ("rings.radius", self.rings.radius),
            ("texture.chance", self.texture.chance),
            ("texture.seed", self.texture.seed),
            ("texture.octaves", self.texture.octaves),
        ];
        for (name, range) in int_ranges {
            if range.min > range.max {
                return invalid(format!("{name} is inverted: {} > {}", range.min, range.max));
            }
        }

        let float_ranges = [
            ("texture.scale", self.texture.scale),
            ("texture.threshold_light", self.texture.threshold_light),
            ("texture.threshold_dark", self.texture.threshold_dark),
        ];
        for (name, range) in float_ranges {
            if range.min > range.max {
                return invalid(format!("{name} is inverted: {} > {}", range.min, range.max));
            }
        }

        if !self.layout.speed.has_nonzero() {
            return invalid("layout.speed must contain a nonzero value".into());
        }
        if !self.moon.speed.has_nonzero() {
            return invalid("moon.speed must contain a nonzero value".into());
        }
        if self.texture.octaves.min < 1 {
            return invalid("texture.octaves must start at 1 or more".into());
        }
        if self.texture.seed.min < 0 || self.texture.seed.max > i64::from(u32::MAX) {
            return invalid("texture.seed must fit in u32".into());
        }
        if self.texture.grid_stride == 0 {
            return invalid("texture.grid_stride must be nonzero".into());
        }
        if self.animation.frames == 0 {
            return invalid("animation.frames must be nonzero".into());
        }
        if self.batch.workers == 0 {
            return invalid("batch.workers must be nonzero".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("width: 1000"));
        assert!(ron_str.contains("attempts: 9"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `moon` section entirely
        let ron_str = "(canvas: (), layout: (), animation: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.moon, MoonConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.canvas.width = 800;
        config.animation.frames = 120;
        config.output.naming = NamingScheme::Sequential;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_single_color_palette_rejected() {
        let mut config = Config::default();
        config.layout.palette = vec![[1, 2, 3], [1, 2, 3]];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_only_speed_rejected() {
        let mut config = Config::default();
        config.moon.speed = IntRange::new(0, 0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = Config::default();
        config.layout.size = IntRange::new(15, 5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("layout.size"));
    }

    #[test]
    fn test_oversized_border_rejected() {
        let mut config = Config::default();
        config.canvas.border_size = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_int_range_has_nonzero() {
        assert!(IntRange::new(-15, 15).has_nonzero());
        assert!(IntRange::new(-3, -1).has_nonzero());
        assert!(!IntRange::new(0, 0).has_nonzero());
    }

    #[test]
    fn test_default_dir_is_named_for_generator() {
        assert!(Config::default_dir().ends_with("helios"));
    }
}
