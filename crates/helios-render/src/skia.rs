//! Software rasterization of [`Surface`] calls onto a tiny-skia pixmap.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use image::RgbaImage;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, Path, PathBuilder, Pixmap, Point, RadialGradient, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::error::RenderError;
use crate::surface::{Rgba, Surface};

/// An anti-aliased RGBA canvas.
pub struct SkiaCanvas {
    pixmap: Pixmap,
    transform: Transform,
    saved: Vec<Transform>,
}

impl SkiaCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            saved: Vec::new(),
        })
    }

    fn fill(&mut self, path: &Path, paint: &Paint) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, self.transform, None);
    }
}

fn color(rgba: Rgba) -> Color {
    Color::from_rgba(
        rgba.r as f32,
        rgba.g as f32,
        rgba.b as f32,
        rgba.a as f32,
    )
    .unwrap_or(Color::BLACK)
}

fn solid(rgba: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = true;
    paint
}

fn circle(center: DVec2, radius: f64) -> Option<Path> {
    PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
}

fn on_circle(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    center + radius * DVec2::new(angle.cos(), angle.sin())
}

/// Append a clockwise arc (angles grow toward +y) as cubic segments of at most a
/// quarter turn each.
fn arc_to(builder: &mut PathBuilder, center: DVec2, radius: f64, start: f64, sweep: f64) {
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    for i in 0..segments {
        let a0 = start + step * i as f64;
        let a1 = a0 + step;
        let p0 = on_circle(center, radius, a0);
        let p3 = on_circle(center, radius, a1);
        let c1 = p0 + k * radius * DVec2::new(-a0.sin(), a0.cos());
        let c2 = p3 - k * radius * DVec2::new(-a1.sin(), a1.cos());
        builder.cubic_to(
            c1.x as f32,
            c1.y as f32,
            c2.x as f32,
            c2.y as f32,
            p3.x as f32,
            p3.y as f32,
        );
    }
}

impl Surface for SkiaCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba) {
        if let Some(rect) =
            Rect::from_xywh(origin.x as f32, origin.y as f32, size.x as f32, size.y as f32)
        {
            self.pixmap
                .fill_rect(rect, &solid(color), self.transform, None);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if let Some(path) = circle(center, radius) {
            self.fill(&path, &solid(color));
        }
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, line_width: f64, color: Rgba) {
        let Some(path) = circle(center, radius) else {
            return;
        };
        let stroke = Stroke {
            width: line_width as f32,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, self.transform, None);
    }

    fn fill_half_disc(&mut self, center: DVec2, radius: f64, start_angle: f64, color: Rgba) {
        let mut builder = PathBuilder::new();
        let start = on_circle(center, radius, start_angle);
        builder.move_to(start.x as f32, start.y as f32);
        arc_to(&mut builder, center, radius, start_angle, PI);
        builder.close();
        if let Some(path) = builder.finish() {
            self.fill(&path, &solid(color));
        }
    }

    fn fill_radial_gradient(
        &mut self,
        center: DVec2,
        inner_radius: f64,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    ) {
        let Some(path) = circle(center, radius) else {
            return;
        };
        let focus = Point::from_xy(center.x as f32, center.y as f32);
        let inner_stop = (inner_radius / radius).clamp(0.0, 1.0) as f32;
        let shader = RadialGradient::new(
            focus,
            focus,
            radius as f32,
            vec![
                GradientStop::new(0.0, color(inner)),
                GradientStop::new(inner_stop, color(inner)),
                GradientStop::new(1.0, color(outer)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        );

        let mut paint = Paint::default();
        paint.anti_alias = true;
        match shader {
            Some(shader) => paint.shader = shader,
            // Degenerate radius: fall back to the outer color.
            None => paint.set_color(color(outer)),
        }
        self.fill(&path, &paint);
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        self.transform = self.saved.pop().ok_or(RenderError::UnbalancedRestore)?;
        Ok(())
    }

    fn translate(&mut self, offset: DVec2) {
        self.transform = self
            .transform
            .pre_translate(offset.x as f32, offset.y as f32);
    }

    fn snapshot(&self) -> Result<RgbaImage, RenderError> {
        let bytes: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), bytes)
            .ok_or_else(|| RenderError::Snapshot("pixel buffer size mismatch".to_string()))
    }
}
