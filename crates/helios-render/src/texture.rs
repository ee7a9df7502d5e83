//! Coherent-noise speckling of planet surfaces.
//!
//! A planet with [`NoiseParams`] gets light and dark dots on a regular grid inside its
//! disc. Each grid point samples a multi-octave sum of the seed's noise field at its
//! absolute canvas position, so the pattern drifts across the body as it orbits.

use glam::{DVec2, IVec2};
use helios_config::TextureConfig;
use helios_system::NoiseParams;
use rustc_hash::FxHashMap;

use crate::field::{NoiseField, NoiseSource};
use crate::surface::{Rgba, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Light,
    Dark,
}

/// One translucent dot of surface texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speckle {
    pub center: DVec2,
    pub tone: Tone,
    pub alpha: f64,
}

impl Speckle {
    pub fn color(&self) -> Rgba {
        let base = match self.tone {
            Tone::Light => Rgba::WHITE,
            Tone::Dark => Rgba::BLACK,
        };
        base.with_alpha(self.alpha)
    }
}

/// Turns noise parameters into speckles, caching one field per seed.
pub struct SurfaceTexturer<S: NoiseSource> {
    source: S,
    fields: FxHashMap<u32, S::Field>,
    stride: usize,
    dot_radius: f64,
}

impl<S: NoiseSource> SurfaceTexturer<S> {
    pub fn new(source: S, config: &TextureConfig) -> Self {
        Self {
            source,
            fields: FxHashMap::default(),
            stride: config.grid_stride.max(1) as usize,
            dot_radius: config.dot_radius,
        }
    }

    /// Octave sum at canvas point `(x, y)`: octave `o` samples at frequency `2^o` and
    /// is weighted by `1 / 2^o`.
    pub fn sample(&mut self, x: f64, y: f64, params: &NoiseParams) -> f64 {
        let source = &self.source;
        let field = self
            .fields
            .entry(params.seed)
            .or_insert_with(|| source.field(params.seed));

        (0..params.octaves)
            .map(|octave| {
                let freq = f64::from(1u32 << octave.min(31));
                field.sample(x * params.scale * freq, y * params.scale * freq) / freq
            })
            .sum()
    }

    /// Speckles for a body of `radius` at `center`.
    ///
    /// The grid runs from `-radius` (inclusive) to `radius` (exclusive) on both axes
    /// with the configured stride; points further than `radius` from the center are
    /// skipped.
    pub fn speckles(&mut self, center: IVec2, radius: f64, params: &NoiseParams) -> Vec<Speckle> {
        let r = radius as i32;
        let mut speckles = Vec::new();

        for dy in (-r..r).step_by(self.stride) {
            for dx in (-r..r).step_by(self.stride) {
                let offset = DVec2::new(f64::from(dx), f64::from(dy));
                if offset.length() > radius {
                    continue;
                }
                let point = center.as_dvec2() + offset;
                let n = self.sample(point.x, point.y, params);

                let speckle = if n > params.threshold_light {
                    Speckle {
                        center: point,
                        tone: Tone::Light,
                        alpha: params.threshold_light,
                    }
                } else if n < params.threshold_dark {
                    Speckle {
                        center: point,
                        tone: Tone::Dark,
                        alpha: -params.threshold_dark,
                    }
                } else {
                    continue;
                };
                speckles.push(speckle);
            }
        }
        speckles
    }

    /// Draw the speckles of a body onto `surface`.
    pub fn apply(
        &mut self,
        surface: &mut impl Surface,
        center: IVec2,
        radius: f64,
        params: &NoiseParams,
    ) {
        for speckle in self.speckles(center, radius, params) {
            surface.fill_circle(speckle.center, self.dot_radius, speckle.color());
        }
    }

    /// Number of distinct seeds seen so far.
    pub fn cached_fields(&self) -> usize {
        self.fields.len()
    }
}
