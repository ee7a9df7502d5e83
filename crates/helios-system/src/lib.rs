//! Scene generation and kinematics: the star, the nested planet layout with optional
//! moons and ring systems, the static starfield, and the per-frame orbital evaluator
//! including the black-hole consumption mode.

pub mod color;
pub mod entropy;
pub mod error;
pub mod kinematics;
pub mod layout;
pub mod model;
pub mod scene;

pub use color::{Rgb, planet_palette, star_palette};
pub use entropy::{Entropy, SeededEntropy};
pub use error::LayoutError;
pub use kinematics::{
    BodyState, moon_position, orbit_radius, orbital_angle, planet_position, terminator_angle,
};
pub use layout::{Layout, LayoutGenerator, PlacementState};
pub use model::{Attachment, Moon, NoiseParams, Planet, Ring, Stage, Star, Starfield};
pub use scene::{BlackHole, FrameKinematics, PlanetKinematics, SceneState};
