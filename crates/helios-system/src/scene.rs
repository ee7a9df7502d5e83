//! Owned scene state threaded through the frame loop.
//!
//! Frames must be evaluated in order: in black-hole mode each call to
//! [`SceneState::advance`] mutates orbit radii, speeds, the planet list, and the star
//! radius, and the next frame starts from the mutated state.

use helios_config::AnimationConfig;
use tracing::info;

use crate::kinematics::{BodyState, moon_position, planet_position};
use crate::layout::Layout;
use crate::model::{Planet, Stage, Star, Starfield};

/// Black-hole consumption parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackHole {
    /// Added to every planet's `center` each frame, shrinking its orbit.
    pub center_step: f64,
    /// Added to every planet's speed magnitude each frame.
    pub speed_step: f64,
    /// Star radius growth per consumed planet.
    pub growth: f64,
    /// Exclusion radius is `star.center - star.size * exclusion_factor`.
    pub exclusion_factor: f64,
}

impl BlackHole {
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            center_step: config.black_hole_center_step,
            speed_step: config.black_hole_speed_step,
            growth: config.black_hole_growth,
            exclusion_factor: config.black_hole_exclusion_factor,
        }
    }

    /// Layout `center` at which a planet is consumed by `star`.
    pub fn exclusion(&self, star: &Star) -> f64 {
        star.center - star.size * self.exclusion_factor
    }
}

/// Per-planet output of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetKinematics {
    pub body: BodyState,
    /// Present iff the planet carries a moon.
    pub moon: Option<BodyState>,
}

/// Everything the compositor needs for one frame, indexed like `SceneState::planets`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameKinematics {
    pub frame: u32,
    pub planets: Vec<PlanetKinematics>,
    /// Planets removed by the black hole during this frame.
    pub consumed: Vec<Planet>,
}

/// Mutable scene shared by the frame loop of a single run.
#[derive(Clone, Debug)]
pub struct SceneState {
    stage: Stage,
    star: Star,
    planets: Vec<Planet>,
    starfield: Starfield,
    black_hole: Option<BlackHole>,
}

impl SceneState {
    /// Wrap a layout. Black-hole mode engages iff the star is pure black.
    pub fn new(layout: Layout, stage: Stage, animation: &AnimationConfig) -> Self {
        let black_hole = layout
            .star
            .is_black_hole()
            .then(|| BlackHole::from_config(animation));
        if black_hole.is_some() {
            info!("black hole mode");
        }
        Self {
            stage,
            star: layout.star,
            planets: layout.planets,
            starfield: layout.starfield,
            black_hole,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn star(&self) -> &Star {
        &self.star
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn is_black_hole(&self) -> bool {
        self.black_hole.is_some()
    }

    /// Consume the scene, returning the planet list in its final state.
    pub fn into_planets(self) -> Vec<Planet> {
        self.planets
    }

    /// Evaluate `frame`: apply the black-hole step if active, then compute positions
    /// and terminators for every surviving planet and moon.
    pub fn advance(&mut self, frame: u32) -> FrameKinematics {
        let consumed = match self.black_hole {
            Some(black_hole) => self.consume(&black_hole, frame),
            None => Vec::new(),
        };

        let planets = self
            .planets
            .iter()
            .map(|planet| {
                let position = planet_position(&self.stage, planet, frame);
                let moon = planet.attachment.moon().map(|moon| {
                    BodyState::at(&self.stage, moon_position(position, planet, moon, frame))
                });
                PlanetKinematics {
                    body: BodyState::at(&self.stage, position),
                    moon,
                }
            })
            .collect();

        FrameKinematics {
            frame,
            planets,
            consumed,
        }
    }

    /// Shrink every orbit and speed every planet up, then remove planets that reached
    /// the exclusion radius in sequence order, growing the star once per removal. Each
    /// check sees the star as grown by earlier removals in the same frame.
    fn consume(&mut self, black_hole: &BlackHole, frame: u32) -> Vec<Planet> {
        let mut consumed = Vec::new();
        let mut survivors = Vec::with_capacity(self.planets.len());

        for mut planet in self.planets.drain(..) {
            planet.center += black_hole.center_step;
            planet.speed += black_hole.speed_step * planet.speed.signum();

            if planet.center >= black_hole.exclusion(&self.star) {
                self.star.size += black_hole.growth;
                info!(frame, star_size = self.star.size, "planet consumed");
                consumed.push(planet);
            } else {
                survivors.push(planet);
            }
        }

        self.planets = survivors;
        consumed
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
