//! Stylized circular orbits and shadow terminators.
//!
//! Positions use the parametric form `x = cx + r sin(θ)`, `y = cy + r cos(θ)` with
//! `θ = (pos_orb + frame * speed / 10)` degrees, truncated to whole pixels. Nothing
//! here is Keplerian; a planet with integer speed returns to its starting pixel after
//! a whole number of revolutions.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DVec2, IVec2};

use crate::model::{Moon, Planet, Stage};

/// Screen position of a body and the angle its shadow half-disc starts at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: IVec2,
    /// `None` for a body exactly at the canvas center, which casts no shadow.
    pub terminator: Option<f64>,
}

impl BodyState {
    pub fn at(stage: &Stage, position: IVec2) -> Self {
        Self {
            position,
            terminator: terminator_angle(stage.center(), position),
        }
    }
}

/// Orbit radius on screen for a layout `center` value.
pub fn orbit_radius(stage: &Stage, center: f64) -> f64 {
    stage.height / 2.0 - center - stage.border
}

/// Orbital angle in radians at `frame`.
pub fn orbital_angle(pos_orb: f64, speed: f64, frame: u32) -> f64 {
    (pos_orb + f64::from(frame) * speed / 10.0).to_radians()
}

fn polar(origin: DVec2, radius: f64, theta: f64) -> IVec2 {
    IVec2::new(
        (origin.x + radius * theta.sin()) as i32,
        (origin.y + radius * theta.cos()) as i32,
    )
}

/// Planet position at `frame`.
pub fn planet_position(stage: &Stage, planet: &Planet, frame: u32) -> IVec2 {
    let radius = orbit_radius(stage, planet.center);
    polar(
        stage.center(),
        radius,
        orbital_angle(planet.pos_orb, planet.speed, frame),
    )
}

/// Moon position at `frame`, circling `parent` at twice its own speed from the
/// parent's phase.
pub fn moon_position(parent: IVec2, planet: &Planet, moon: &Moon, frame: u32) -> IVec2 {
    polar(
        parent.as_dvec2(),
        moon.orbit,
        orbital_angle(planet.pos_orb, 2.0 * moon.speed, frame),
    )
}

/// Angle at which the shadow half-disc of a body at `position` begins.
///
/// Derived from the arctangent of the offset from `center`, quadrant-corrected. A zero
/// horizontal offset is handled by branch rather than division.
pub fn terminator_angle(center: DVec2, position: IVec2) -> Option<f64> {
    let dx = f64::from(position.x) - center.x;
    let dy = f64::from(position.y) - center.y;

    if dx < 0.0 {
        Some((dy / dx).atan() + FRAC_PI_2)
    } else if dx > 0.0 {
        Some((dy / dx).atan() - FRAC_PI_2)
    } else if dy > 0.0 {
        Some(0.0)
    } else if dy < 0.0 {
        Some(PI)
    } else {
        None
    }
}
