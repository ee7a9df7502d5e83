//! Sequential, constrained planet placement.
//!
//! A fixed number of placement attempts each draw fresh parameters for one candidate
//! planet. A candidate is accepted only if its orbit band stays inside the border and
//! clear of the previous orbit. Accepted planets advance a [`PlacementState`]: the
//! next orbit starts further out, the speed range drifts downward, and the minimum
//! orbit gap widens. Rejected attempts leave the state untouched.

use helios_config::{Config, LayoutConfig};
use tracing::{debug, info};

use crate::color::{Rgb, planet_palette, star_palette};
use crate::entropy::{Entropy, choose_distinct, draw_nonzero};
use crate::error::LayoutError;
use crate::model::{Attachment, Moon, NoiseParams, Planet, Ring, Stage, Star, Starfield};

/// Everything generated once before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub star: Star,
    pub planets: Vec<Planet>,
    pub starfield: Starfield,
}

/// State carried from one accepted placement to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementState {
    pub last_center: f64,
    pub last_size: f64,
    pub last_color: Rgb,
    pub speed_min: i64,
    pub speed_max: i64,
    pub distance_min: i64,
    /// Orbit gap chosen for the previous accepted planet; zero before the first.
    pub previous_distance: i64,
}

impl PlacementState {
    /// State before any planet: the star is the "previous body".
    pub fn seeded(star: &Star, config: &LayoutConfig) -> Self {
        Self {
            last_center: star.center,
            last_size: star.size,
            last_color: star.color,
            speed_min: config.speed.min,
            speed_max: config.speed.max,
            distance_min: config.distance.min,
            previous_distance: 0,
        }
    }

    /// Fold an accepted planet into the state.
    pub fn accept(self, planet: &Planet, distance: i64, config: &LayoutConfig) -> Self {
        Self {
            last_center: planet.center,
            last_size: planet.size,
            last_color: planet.color,
            speed_min: self.speed_min - config.speed_min_step,
            speed_max: self.speed_max - config.speed_max_step,
            distance_min: self.distance_min + config.distance_min_step,
            previous_distance: distance,
        }
    }
}

/// Raw draws of one placement attempt.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    size: f64,
    distance: i64,
    center: f64,
    color: Rgb,
    phase: i64,
    speed: i64,
    ring_roll: i64,
    moon_roll: i64,
}

/// Generates the star, the starfield, and the planet sequence from a config.
pub struct LayoutGenerator<'a> {
    config: &'a Config,
    stage: Stage,
    planet_palette: Vec<Rgb>,
    star_palette: Vec<Rgb>,
}

impl<'a> LayoutGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            stage: Stage::from_config(&config.canvas),
            planet_palette: planet_palette(config),
            star_palette: star_palette(config),
        }
    }

    /// Generate a complete layout.
    pub fn generate(&self, entropy: &mut impl Entropy) -> Result<Layout, LayoutError> {
        let star = self.star(entropy)?;
        let starfield = Starfield::generate(entropy, &self.config.starfield, &self.config.canvas);
        debug!(stars = starfield.len(), "starfield computed");

        let planets = self.place_planets(entropy, &star)?;
        info!(
            planets = planets.len(),
            star_size = star.size,
            black_hole = star.is_black_hole(),
            "layout generated"
        );

        Ok(Layout {
            star,
            planets,
            starfield,
        })
    }

    /// Draw the central star.
    pub fn star(&self, entropy: &mut impl Entropy) -> Result<Star, LayoutError> {
        let size = entropy.int_in(self.config.star.size) as f64;
        let color = *entropy
            .choice(&self.star_palette)
            .ok_or(LayoutError::EmptyPalette("star"))?;
        Ok(Star {
            size,
            color,
            center: self.stage.height / 2.0,
        })
    }

    /// Run every placement attempt in order, folding accepted planets into the state.
    pub fn place_planets(
        &self,
        entropy: &mut impl Entropy,
        star: &Star,
    ) -> Result<Vec<Planet>, LayoutError> {
        let layout = &self.config.layout;
        let initial = (PlacementState::seeded(star, layout), Vec::new());

        let (_, planets) =
            (0..layout.attempts).try_fold(initial, |(state, mut planets), attempt| {
                match self.attempt(entropy, &state)? {
                    Some((planet, distance)) => {
                        let next = state.accept(&planet, distance, layout);
                        planets.push(planet);
                        Ok::<_, LayoutError>((next, planets))
                    }
                    None => {
                        debug!(attempt, "placement rejected");
                        Ok((state, planets))
                    }
                }
            })?;

        Ok(planets)
    }

    /// One placement attempt against `state`. Returns the planet and the orbit gap it
    /// used, or `None` if the candidate does not fit.
    pub fn attempt(
        &self,
        entropy: &mut impl Entropy,
        state: &PlacementState,
    ) -> Result<Option<(Planet, i64)>, LayoutError> {
        let candidate = self.candidate(entropy, state)?;
        if !self.clears(state, candidate.center, candidate.size) {
            return Ok(None);
        }

        let attachment = match self.moon(entropy, state, &candidate)? {
            Some(moon) => {
                debug!(orbit = moon.orbit, "moon attached");
                Attachment::Moon(moon)
            }
            None if candidate.ring_roll > self.config.rings.chance_threshold => {
                match self.rings(entropy, candidate.center, candidate.size) {
                    Some(rings) => {
                        debug!(count = rings.len(), "rings attached");
                        Attachment::Rings(rings)
                    }
                    None => Attachment::None,
                }
            }
            None => Attachment::None,
        };

        let planet = Planet {
            pos_orb: candidate.phase as f64,
            speed: candidate.speed as f64,
            size: candidate.size,
            center: candidate.center,
            color: candidate.color,
            attachment,
            noise: NoiseParams::draw(entropy, &self.config.texture),
        };
        Ok(Some((planet, candidate.distance)))
    }

    fn candidate(
        &self,
        entropy: &mut impl Entropy,
        state: &PlacementState,
    ) -> Result<Candidate, LayoutError> {
        let layout = &self.config.layout;
        if state.distance_min > layout.distance.max {
            return Err(LayoutError::InvertedRange {
                name: "layout.distance",
                min: state.distance_min,
                max: layout.distance.max,
            });
        }

        let size = entropy.int_in(layout.size) as f64;
        let distance = entropy.randint(state.distance_min, layout.distance.max);
        let center = state.last_center - state.last_size / 2.0 - size / 2.0 - distance as f64;
        let color = choose_distinct(entropy, &self.planet_palette, state.last_color)?;
        let phase = entropy.int_in(layout.phase);
        let ring_roll = entropy.int_in(self.config.rings.chance);
        let speed = draw_nonzero(entropy, "layout.speed", state.speed_min, state.speed_max)?;
        let moon_roll = entropy.int_in(self.config.moon.chance);

        Ok(Candidate {
            size,
            distance,
            center,
            color,
            phase,
            speed,
            ring_roll,
            moon_roll,
        })
    }

    /// The candidate's orbit band (its center widened by `clearance_factor * size / 2`)
    /// must stay inside the border and strictly inside the previous body's band.
    pub fn clears(&self, state: &PlacementState, center: f64, size: f64) -> bool {
        let half_band = |s: f64| s * self.config.layout.clearance_factor / 2.0;
        let inside_border = center - half_band(size) >= self.stage.border;
        let clear_of_previous =
            center + half_band(size) < state.last_center - half_band(state.last_size);
        inside_border && clear_of_previous
    }

    fn moon(
        &self,
        entropy: &mut impl Entropy,
        state: &PlacementState,
        candidate: &Candidate,
    ) -> Result<Option<Moon>, LayoutError> {
        let config = &self.config.moon;
        let orbit = entropy.int_in(config.orbit);
        let headroom = config.orbit.max + orbit;

        let fits = candidate.center - self.stage.border * 2.0 > orbit as f64
            && candidate.moon_roll > config.chance_threshold
            && candidate.distance >= headroom
            && state.previous_distance >= headroom;
        if !fits {
            return Ok(None);
        }

        let size = entropy.int_in(config.size) as f64;
        let speed = draw_nonzero(entropy, "moon.speed", config.speed.min, config.speed.max)?;
        Ok(Some(Moon {
            size,
            orbit: orbit as f64,
            speed: speed as f64,
        }))
    }

    fn rings(&self, entropy: &mut impl Entropy, center: f64, size: f64) -> Option<Vec<Ring>> {
        let config = &self.config.rings;
        let count = entropy.int_in(config.count);
        let mut radius_range = config.radius;
        let mut rings = Vec::new();

        for _ in 0..count {
            let mut radius = entropy.int_in(radius_range);
            let width = entropy.int_in(config.width);
            if size > config.large_planet_size as f64 {
                radius += config.large_planet_bonus;
            }

            if center - self.stage.border * 2.0 > (radius + width) as f64 {
                rings.push(Ring {
                    width: width as f64,
                    radius: radius as f64,
                });
                radius_range.min += config.radius_step;
                radius_range.max += config.radius_step;
            }
        }

        (!rings.is_empty()).then_some(rings)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
