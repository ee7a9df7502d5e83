//! The drawing primitives the compositor needs, independent of any rasterizer.

use glam::DVec2;
use image::RgbaImage;

use crate::error::RenderError;

/// Straight (non-premultiplied) color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque([1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba::opaque([0.0, 0.0, 0.0]);

    pub const fn opaque(rgb: [f64; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 1.0,
        }
    }

    /// Unit RGB with an alpha, all clamped to `[0, 1]`.
    pub fn from_unit(rgb: [f64; 3], alpha: f64) -> Self {
        Self {
            r: rgb[0].clamp(0.0, 1.0),
            g: rgb[1].clamp(0.0, 1.0),
            b: rgb[2].clamp(0.0, 1.0),
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Multiply the color channels by `factor`, saturating at 1.
    pub fn scaled(self, factor: f64) -> Self {
        Self::from_unit([self.r * factor, self.g * factor, self.b * factor], self.a)
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// A 2D canvas in pixel space, origin top-left, y down.
///
/// Coordinates passed to drawing calls are mapped through the current transform.
/// `save`/`restore` bracket transform changes.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    fn stroke_circle(&mut self, center: DVec2, radius: f64, line_width: f64, color: Rgba);

    /// Fill the half disc bounded by the arc from `start_angle` to `start_angle + PI`
    /// and the chord closing it.
    fn fill_half_disc(&mut self, center: DVec2, radius: f64, start_angle: f64, color: Rgba);

    /// Fill a disc of `radius` with a radial gradient: `inner` up to `inner_radius`,
    /// blending to `outer` at the edge.
    fn fill_radial_gradient(
        &mut self,
        center: DVec2,
        inner_radius: f64,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    );

    fn save(&mut self);

    fn restore(&mut self) -> Result<(), RenderError>;

    fn translate(&mut self, offset: DVec2);

    /// Copy the current pixels out as straight-alpha RGBA.
    fn snapshot(&self) -> Result<RgbaImage, RenderError>;
}
