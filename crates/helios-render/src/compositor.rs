//! Back-to-front frame composition.
//!
//! A frame is the static layer (background, border, starfield, star) followed by, for
//! each surviving planet in sequence order: its orbit line, a detach disc in the
//! background color, the shaded body with optional speckles, its shadow, and then its
//! moon or rings. The static layer is redrawn between frames except after the last,
//! so the final frame loops cleanly into the first.

use glam::{DVec2, IVec2};
use helios_config::Config;
use helios_system::{FrameKinematics, NoiseParams, Rgb, SceneState, orbit_radius};
use image::RgbaImage;
use tracing::debug;

use crate::error::RenderError;
use crate::field::NoiseSource;
use crate::surface::{Rgba, Surface};
use crate::texture::SurfaceTexturer;

/// Body gradient: `INNER_GAIN` times the base color inside `INNER_RATIO * r`,
/// blending to `OUTER_GAIN` times the base at the rim.
const INNER_GAIN: f64 = 1.2;
const OUTER_GAIN: f64 = 0.8;
const INNER_RATIO: f64 = 0.7;
const OUTLINE_WIDTH: f64 = 1.0;
const ORBIT_WIDTH: f64 = 1.0;

/// Fixed colors and factors that do not depend on the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub background: Rgba,
    pub starlight: Rgba,
    pub star_point_radius: f64,
    pub shadow_alpha: f64,
    pub ring_alpha: f64,
    pub detach_factor: f64,
}

impl Style {
    pub fn from_config(config: &Config) -> Self {
        Self {
            background: Rgba::from_unit(config.canvas.background, 1.0),
            starlight: Rgba::from_unit(config.canvas.starlight, 1.0),
            star_point_radius: config.starfield.point_radius,
            shadow_alpha: config.animation.shadow_alpha,
            ring_alpha: config.animation.ring_alpha,
            detach_factor: config.animation.detach_factor,
        }
    }
}

fn rgba(color: Rgb) -> Rgba {
    Rgba::opaque(color.to_unit())
}

/// Draws scenes onto any [`Surface`].
pub struct FrameCompositor<S: NoiseSource> {
    style: Style,
    texturer: SurfaceTexturer<S>,
}

impl<S: NoiseSource> FrameCompositor<S> {
    pub fn new(style: Style, texturer: SurfaceTexturer<S>) -> Self {
        Self { style, texturer }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Background, border in the star's color, starfield, and the star itself.
    pub fn draw_static(&mut self, surface: &mut impl Surface, scene: &SceneState) {
        let stage = scene.stage();
        let (w, h, b) = (stage.width, stage.height, stage.border);
        let star = scene.star();
        let star_color = rgba(star.color);

        surface.fill_rect(DVec2::ZERO, DVec2::new(w, h), self.style.background);

        surface.fill_rect(DVec2::ZERO, DVec2::new(b, h), star_color);
        surface.fill_rect(DVec2::ZERO, DVec2::new(w, b), star_color);
        surface.fill_rect(DVec2::new(0.0, h - b), DVec2::new(w, b), star_color);
        surface.fill_rect(DVec2::new(w - b, 0.0), DVec2::new(b, h), star_color);

        for point in &scene.starfield().points {
            surface.fill_circle(
                point.as_dvec2(),
                self.style.star_point_radius,
                self.style.starlight,
            );
        }

        let star_center = DVec2::new(w / 2.0, star.center);
        self.draw_body(surface, star_center, star.size, star.color, None);
    }

    /// Shaded disc with optional speckles and a thin black outline.
    pub fn draw_body(
        &mut self,
        surface: &mut impl Surface,
        center: DVec2,
        radius: f64,
        color: Rgb,
        noise: Option<&NoiseParams>,
    ) {
        let base = rgba(color);
        surface.fill_radial_gradient(
            center,
            radius * INNER_RATIO,
            radius,
            base.scaled(INNER_GAIN),
            base.scaled(OUTER_GAIN),
        );
        if let Some(params) = noise {
            self.texturer
                .apply(surface, center.as_ivec2(), radius, params);
        }
        surface.stroke_circle(center, radius, OUTLINE_WIDTH, Rgba::BLACK);
    }

    fn draw_shadow(
        &self,
        surface: &mut impl Surface,
        center: IVec2,
        radius: f64,
        terminator: Option<f64>,
    ) {
        if let Some(angle) = terminator {
            surface.fill_half_disc(
                center.as_dvec2(),
                radius,
                angle,
                Rgba::BLACK.with_alpha(self.style.shadow_alpha),
            );
        }
    }

    /// Planets, moons, and rings for one frame.
    ///
    /// `kinematics` must come from the `advance` call that left `scene` in its current
    /// state, so both index the same surviving planets.
    pub fn draw_bodies(
        &mut self,
        surface: &mut impl Surface,
        scene: &SceneState,
        kinematics: &FrameKinematics,
    ) -> Result<(), RenderError> {
        let stage = scene.stage();
        let mut orbit_color = scene.star().color;

        for (planet, k) in scene.planets().iter().zip(&kinematics.planets) {
            surface.stroke_circle(
                stage.center(),
                orbit_radius(stage, planet.center),
                ORBIT_WIDTH,
                rgba(orbit_color),
            );
            orbit_color = planet.color;

            let position = k.body.position.as_dvec2();
            surface.fill_circle(
                position,
                planet.size * self.style.detach_factor,
                self.style.background,
            );
            self.draw_body(
                surface,
                position,
                planet.size,
                planet.color,
                planet.noise.as_ref(),
            );
            self.draw_shadow(surface, k.body.position, planet.size, k.body.terminator);

            if let (Some(moon), Some(moon_state)) = (planet.attachment.moon(), k.moon) {
                self.draw_body(
                    surface,
                    moon_state.position.as_dvec2(),
                    moon.size,
                    planet.color,
                    None,
                );
                self.draw_shadow(surface, moon_state.position, moon.size, moon_state.terminator);
            }

            let rings = planet.attachment.rings();
            if !rings.is_empty() {
                let ring_color = rgba(planet.color).with_alpha(self.style.ring_alpha);
                surface.save();
                surface.translate(position);
                for ring in rings {
                    surface.stroke_circle(DVec2::ZERO, ring.radius, ring.width, ring_color);
                }
                surface.restore()?;
            }
        }
        Ok(())
    }

    /// Render `frames` frames of `scene`, handing each snapshot to `on_frame` in order.
    ///
    /// Stops at the first error from drawing or from `on_frame`.
    pub fn animate<E>(
        &mut self,
        surface: &mut impl Surface,
        scene: &mut SceneState,
        frames: u32,
        mut on_frame: impl FnMut(u32, RgbaImage) -> Result<(), E>,
    ) -> Result<(), E>
    where
        E: From<RenderError>,
    {
        self.draw_static(surface, scene);

        for frame in 0..frames {
            let kinematics = scene.advance(frame);
            if !kinematics.consumed.is_empty() {
                debug!(
                    frame,
                    consumed = kinematics.consumed.len(),
                    remaining = scene.planets().len(),
                    "black hole step"
                );
            }
            self.draw_bodies(surface, scene, &kinematics)?;
            on_frame(frame, surface.snapshot()?)?;

            if frame + 1 < frames {
                self.draw_static(surface, scene);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "compositor_tests.rs"]
mod tests;
