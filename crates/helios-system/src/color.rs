//! 8-bit body colors and the palettes they are drawn from.

use helios_config::Config;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB color. Equality is by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Pure black. A star of this color switches the animation into black-hole mode.
    pub const BLACK: Rgb = Rgb([0, 0, 0]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Channels as linear floats in `[0, 1]`.
    pub fn to_unit(self) -> [f64; 3] {
        self.0.map(|c| f64::from(c) / 255.0)
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self(value)
    }
}

/// Colors a planet may take.
pub fn planet_palette(config: &Config) -> Vec<Rgb> {
    config.layout.palette.iter().copied().map(Rgb).collect()
}

/// Colors the star may take: the planet palette plus black when black holes are allowed.
pub fn star_palette(config: &Config) -> Vec<Rgb> {
    let mut palette = planet_palette(config);
    if config.star.allow_black_hole && !palette.contains(&Rgb::BLACK) {
        palette.push(Rgb::BLACK);
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_unit_scales_channels() {
        let [r, g, b] = Rgb::new(255, 0, 51).to_unit();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_star_palette_adds_black_once() {
        let config = Config::default();
        let stars = star_palette(&config);
        let planets = planet_palette(&config);
        assert_eq!(stars.len(), planets.len() + 1);
        assert_eq!(stars.iter().filter(|c| c.is_black()).count(), 1);
        assert!(!planets.contains(&Rgb::BLACK));
    }

    #[test]
    fn test_star_palette_without_black_hole() {
        let mut config = Config::default();
        config.star.allow_black_hole = false;
        assert!(!star_palette(&config).contains(&Rgb::BLACK));
    }
}
