use std::sync::Arc;

use vello_cpu::kurbo::{Affine, Rect};

use crate::foundation::core::Canvas;
use crate::foundation::error::{SinusError, SinusResult};
use crate::layout::cache::LayoutEntry;
use crate::raster::surface::SourceSurface;
use crate::scene::content::ImageSource;

/// What to draw into the source surface.
#[derive(Clone, Copy, Debug)]
pub enum RasterContent<'a> {
    /// Tiled, scrolling text lines.
    Text(&'a LayoutEntry),
    /// A bitmap scaled to cover the canvas.
    Image(&'a ImageSource),
}

/// Draws text lines or an image into a [`SourceSurface`] with `vello_cpu`.
///
/// Drawing happens in logical canvas coordinates; the surface itself is `canvas * quality_factor`
/// pixels and a uniform scale maps one onto the other.
pub struct Rasterizer {
    canvas: Canvas,
    quality_factor: f32,
    pixel_size: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    surface: SourceSurface,
    image_paint: Option<ImagePaint>,
}

struct ImagePaint {
    source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl Rasterizer {
    /// Allocate surfaces for `canvas` scaled by `quality_factor`.
    pub fn new(canvas: Canvas, quality_factor: f32) -> SinusResult<Self> {
        if !quality_factor.is_finite() || quality_factor <= 0.0 {
            return Err(SinusError::init("quality factor must be finite and > 0"));
        }
        let pixel_size = canvas.scaled(quality_factor);
        let (w, h) = surface_dims(pixel_size)?;
        Ok(Self {
            canvas,
            quality_factor,
            pixel_size,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            surface: SourceSurface::new(pixel_size.width, pixel_size.height),
            image_paint: None,
        })
    }

    /// Logical canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Surface size in pixels.
    pub fn pixel_size(&self) -> Canvas {
        self.pixel_size
    }

    /// Reallocate for a new canvas size; a no-op when nothing changed.
    pub fn resize(&mut self, canvas: Canvas) -> SinusResult<()> {
        if canvas == self.canvas {
            return Ok(());
        }
        *self = Self::new(canvas, self.quality_factor)?;
        Ok(())
    }

    /// Draw `content` at `time` seconds and return the updated surface.
    ///
    /// Text scrolls by `speed * 100` logical pixels per second, wrapping every tile width.
    pub fn draw(
        &mut self,
        content: RasterContent<'_>,
        speed: f32,
        time: f64,
    ) -> SinusResult<&SourceSurface> {
        self.ctx.reset();
        self.ctx.set_paint_transform(Affine::IDENTITY);
        let base = Affine::scale(f64::from(self.quality_factor));

        match content {
            RasterContent::Text(layout) => self.draw_text(layout, speed, time, base),
            RasterContent::Image(image) => self.draw_image(image, base)?,
        }

        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.surface.load_premultiplied(
            self.pixel_size.width,
            self.pixel_size.height,
            self.pixmap.data_as_u8_slice(),
        );
        Ok(&self.surface)
    }

    /// Surface produced by the last `draw`.
    pub fn surface(&self) -> &SourceSurface {
        &self.surface
    }

    fn draw_text(&mut self, layout: &LayoutEntry, speed: f32, time: f64, base: Affine) {
        let canvas_w = f64::from(self.canvas.width);
        let scroll = time * f64::from(speed) * 100.0;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

        for line in 0..layout.num_curves {
            let Some(entry) = layout.entry_for_line(line) else {
                continue;
            };
            let len = f64::from(entry.width);
            let base_x = -len + scroll % len;
            let first = (-base_x / len).floor().max(0.0);
            let last = (((canvas_w - base_x) / len).ceil() + 1.0).min(f64::from(entry.repetitions));
            let y_mid = f64::from(layout.line_center(line));

            for r in first as i64..last as i64 {
                let x = base_x + r as f64 * len;
                if x + len >= 0.0 && x <= canvas_w {
                    entry.line.fill(&mut self.ctx, base, x, y_mid);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &ImageSource, base: Affine) -> SinusResult<()> {
        let paint = self.image_paint_for(image)?;
        let (cw, ch) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let scale = (cw / iw).max(ch / ih);
        let dx = (cw - iw * scale) / 2.0;
        let dy = (ch - ih * scale) / 2.0;

        self.ctx
            .set_transform(base * Affine::translate((dx, dy)) * Affine::scale(scale));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    }

    fn image_paint_for(&mut self, image: &ImageSource) -> SinusResult<vello_cpu::Image> {
        if let Some(cached) = &self.image_paint
            && Arc::ptr_eq(&cached.source, &image.rgba8)
        {
            return Ok(cached.paint.clone());
        }
        let pixmap = pixmap_from_straight_rgba8(&image.rgba8, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_paint = Some(ImagePaint {
            source: image.rgba8.clone(),
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

fn surface_dims(size: Canvas) -> SinusResult<(u16, u16)> {
    let w = u16::try_from(size.width)
        .map_err(|_| SinusError::init(format!("surface width {} exceeds u16", size.width)))?;
    let h = u16::try_from(size.height)
        .map_err(|_| SinusError::init(format!("surface height {} exceeds u16", size.height)))?;
    Ok((w, h))
}

fn pixmap_from_straight_rgba8(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SinusResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(Canvas { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SinusError::init("image byte length mismatch"));
    }
    let premul = |c: u8, a: u16| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            let a = u16::from(px[3]);
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([
                premul(px[0], a),
                premul(px[1], a),
                premul(px[2], a),
                px[3],
            ])
        })
        .collect::<Vec<_>>();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/rasterizer.rs"]
mod tests;
