use std::sync::Arc;

use vello_cpu::kurbo::{Affine, Rect};

use crate::foundation::error::{SinusError, SinusResult};
use crate::scene::content::TextContent;
use crate::text::font::ParleyShaper;
use crate::text::library::FontLibrary;

/// Shapes single-line text runs.
///
/// Implementations turn a string into a [`ShapedLine`] that can be measured and filled any number
/// of times without touching the shaper again.
pub trait TextShaper: Send {
    /// Shape `text` at `font_size` logical pixels.
    fn shape(&mut self, text: &str, font_size: f32) -> SinusResult<ShapedLine>;

    /// Identity of the font data, folded into layout cache keys.
    fn font_key(&self) -> u64;
}

/// Pick the shaper for `text`, looking its font family up in the system font directories.
pub fn shaper_for(text: &TextContent) -> SinusResult<Box<dyn TextShaper>> {
    shaper_from_library(text, &FontLibrary::system())
}

/// Pick the shaper for `text`: its font file when configured, else its font family from
/// `library`, else block glyphs.
pub fn shaper_from_library(
    text: &TextContent,
    library: &FontLibrary,
) -> SinusResult<Box<dyn TextShaper>> {
    if let Some(path) = text.font_file.as_deref() {
        let bytes = std::fs::read(path).map_err(|e| {
            SinusError::validation(format!("read font file '{}': {e}", path.display()))
        })?;
        return Ok(Box::new(ParleyShaper::new(bytes)?));
    }
    match ParleyShaper::from_family(&text.font_family, library)? {
        Some(shaper) => Ok(Box::new(shaper)),
        None => {
            tracing::warn!(
                family = %text.font_family,
                "font family not installed, drawing block glyphs"
            );
            Ok(Box::new(BlockShaper))
        }
    }
}

/// One shaped run of text with its advance and box height.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    /// Advance width in logical pixels.
    pub width: f32,
    /// Line box height in logical pixels.
    pub height: f32,
    pub(crate) paint: LinePaint,
}

#[derive(Clone, Debug)]
pub(crate) enum LinePaint {
    Glyphs(Arc<[GlyphRunPaint]>),
    Blocks(Arc<[Rect]>),
}

/// Glyphs sharing one font face.
#[derive(Clone, Debug)]
pub(crate) struct GlyphRunPaint {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) glyphs: Vec<PlacedGlyph>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PlacedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl ShapedLine {
    /// Fill the run with its left edge at `x`, its line box vertically centred on `y_mid`.
    ///
    /// Coordinates are in the space of `base`; the caller sets the paint.
    pub(crate) fn fill(&self, ctx: &mut vello_cpu::RenderContext, base: Affine, x: f64, y_mid: f64) {
        let top = y_mid - f64::from(self.height) * 0.5;
        ctx.set_transform(base * Affine::translate((x, top)));
        match &self.paint {
            LinePaint::Glyphs(runs) => {
                for run in runs.iter() {
                    let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&run.font)
                        .font_size(run.font_size)
                        .fill_glyphs(glyphs);
                }
            }
            LinePaint::Blocks(rects) => {
                for r in rects.iter() {
                    ctx.fill_rect(r);
                }
            }
        }
    }
}

/// Font-free shaper drawing every visible character as a solid block.
///
/// Each character advances `0.6 * size`; non-whitespace characters fill a `0.4 * size` wide,
/// `0.7 * size` tall block centred in the line box. Output is exactly reproducible on any machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockShaper;

impl BlockShaper {
    pub const ADVANCE: f32 = 0.6;
    pub const INK_WIDTH: f32 = 0.4;
    pub const INK_HEIGHT: f32 = 0.7;
}

impl TextShaper for BlockShaper {
    fn shape(&mut self, text: &str, font_size: f32) -> SinusResult<ShapedLine> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(SinusError::validation("font size must be finite and > 0"));
        }
        let size = f64::from(font_size);
        let advance = size * f64::from(Self::ADVANCE);
        let inset = (advance - size * f64::from(Self::INK_WIDTH)) * 0.5;
        let ink_top = size * (1.0 - f64::from(Self::INK_HEIGHT)) * 0.5;
        let ink_bottom = ink_top + size * f64::from(Self::INK_HEIGHT);

        let mut rects = Vec::new();
        let mut count = 0usize;
        for (i, ch) in text.chars().enumerate() {
            count = i + 1;
            if ch.is_whitespace() {
                continue;
            }
            let x0 = i as f64 * advance + inset;
            rects.push(Rect::new(x0, ink_top, x0 + advance - inset * 2.0, ink_bottom));
        }

        Ok(ShapedLine {
            width: (count as f64 * advance) as f32,
            height: font_size,
            paint: LinePaint::Blocks(rects.into()),
        })
    }

    fn font_key(&self) -> u64 {
        0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
