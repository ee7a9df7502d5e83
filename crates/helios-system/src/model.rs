//! Scene records: stage geometry, the star, planets with their optional moon or ring
//! system, surface noise parameters, and the static starfield.

use glam::{DVec2, IVec2};
use helios_config::{CanvasConfig, StarfieldConfig, TextureConfig};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::entropy::Entropy;

/// Canvas geometry shared by layout and kinematics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
    pub border: f64,
}

impl Stage {
    pub fn from_config(canvas: &CanvasConfig) -> Self {
        Self {
            width: f64::from(canvas.width),
            height: f64::from(canvas.height),
            border: f64::from(canvas.border_size),
        }
    }

    /// Canvas center; the star sits here and every orbit is centered on it.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The central star.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Radius in pixels. Grows only in black-hole mode.
    pub size: f64,
    pub color: Rgb,
    /// Layout coordinate of the star: half the canvas height. Planet `center`
    /// values are measured on the same axis and decrease outward.
    pub center: f64,
}

impl Star {
    pub fn is_black_hole(&self) -> bool {
        self.color.is_black()
    }
}

/// Parameters of a planet's speckle texture. Fully determines the pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub seed: u32,
    pub scale: f64,
    pub threshold_light: f64,
    pub threshold_dark: f64,
    pub octaves: u32,
}

impl NoiseParams {
    /// Roll for a texture. Returns `None` when texturing is disabled or the roll fails.
    pub fn draw(entropy: &mut impl Entropy, config: &TextureConfig) -> Option<Self> {
        if !config.enabled || entropy.int_in(config.chance) <= config.chance.min {
            return None;
        }
        Some(Self {
            // Range validated to fit in u32.
            seed: entropy.int_in(config.seed) as u32,
            scale: entropy.float_in(config.scale),
            threshold_light: entropy.float_in(config.threshold_light),
            threshold_dark: entropy.float_in(config.threshold_dark),
            octaves: entropy.int_in(config.octaves).max(1) as u32,
        })
    }
}

/// A moon circling its parent planet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub size: f64,
    /// Orbit radius around the parent.
    pub orbit: f64,
    /// Signed, never zero. Applied at twice the parent's angular rate formula.
    pub speed: f64,
}

/// One ring stroke around a planet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub width: f64,
    pub radius: f64,
}

/// What a planet carries besides its own body. At most one of a moon or a ring set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attachment {
    #[default]
    None,
    Moon(Moon),
    /// Ordered innermost first; never empty.
    Rings(Vec<Ring>),
}

impl Attachment {
    pub fn moon(&self) -> Option<&Moon> {
        match self {
            Attachment::Moon(moon) => Some(moon),
            _ => None,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        match self {
            Attachment::Rings(rings) => rings,
            _ => &[],
        }
    }
}

/// A placed planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Initial orbital phase in degrees.
    pub pos_orb: f64,
    /// Signed angular speed, never zero. Fractional once black-hole mode accelerates it.
    pub speed: f64,
    /// Body radius in pixels.
    pub size: f64,
    /// Layout coordinate; the orbit radius is `height / 2 - center - border`.
    pub center: f64,
    pub color: Rgb,
    pub attachment: Attachment,
    pub noise: Option<NoiseParams>,
}

/// Static background points, drawn identically on every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Starfield {
    pub points: Vec<IVec2>,
}

impl Starfield {
    /// Place `roll - 1` points uniformly inside the margin.
    pub fn generate(
        entropy: &mut impl Entropy,
        config: &StarfieldConfig,
        canvas: &CanvasConfig,
    ) -> Self {
        let count = entropy.int_in(config.count);
        let margin = i64::from(config.margin);
        let max_x = i64::from(canvas.width) - margin;
        let max_y = i64::from(canvas.height) - margin;

        let points = (1..count)
            .map(|_| {
                let x = entropy.randint(margin, max_x);
                let y = entropy.randint(margin, max_y);
                IVec2::new(x as i32, y as i32)
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
