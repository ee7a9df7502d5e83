//! Frame rendering: a 2D surface abstraction over a tiny-skia canvas, coherent-noise
//! surface speckling, and the back-to-front compositor that turns scene kinematics
//! into frames.

pub mod compositor;
pub mod error;
pub mod field;
pub mod skia;
pub mod surface;
pub mod texture;

pub use compositor::{FrameCompositor, Style};
pub use error::RenderError;
pub use field::{NoiseField, NoiseSource, OpenSimplexField, OpenSimplexSource};
pub use skia::SkiaCanvas;
pub use surface::{Rgba, Surface};
pub use texture::{Speckle, SurfaceTexturer, Tone};
