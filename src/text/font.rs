use std::borrow::Cow;

use crate::foundation::error::{SinusError, SinusResult};
use crate::text::library::FontLibrary;
use crate::text::shaper::{GlyphRunPaint, LinePaint, PlacedGlyph, ShapedLine, TextShaper};

/// Text shaper over registered font files, laid out with Parley and filled with `vello_cpu`
/// glyph runs.
///
/// Text is shaped bold, as a single unwrapped line. Parley picks the closest registered face of
/// the family for each run.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font_key: u64,
}

impl ParleyShaper {
    /// Register `font_bytes` and prepare a shaper for its first family.
    pub fn new(font_bytes: Vec<u8>) -> SinusResult<Self> {
        let font_key = xxhash_rust::xxh3::xxh3_64(&font_bytes);

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SinusError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SinusError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "font registered");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_key,
        })
    }

    /// Shaper for the installed `family`, or `None` when `library` holds no font of that family.
    pub fn from_family(family: &str, library: &FontLibrary) -> SinusResult<Option<Self>> {
        let mut font_ctx = parley::FontContext::default();
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        for path in library.candidates(family) {
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "font file skipped");
                    continue;
                }
            };
            hasher.update(&bytes);
            font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes), None);
        }

        let Some(family_id) = font_ctx.collection.family_id(family) else {
            return Ok(None);
        };
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SinusError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "font family resolved");

        Ok(Some(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_key: hasher.digest(),
        }))
    }

    /// Family name read from the font file.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl TextShaper for ParleyShaper {
    fn shape(&mut self, text: &str, font_size: f32) -> SinusResult<ShapedLine> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(SinusError::validation("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(()));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let run = glyph_run.run();
                runs.push(GlyphRunPaint {
                    font: run.font().clone(),
                    font_size: run.font_size(),
                    glyphs: glyph_run
                        .positioned_glyphs()
                        .map(|g| PlacedGlyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                        .collect(),
                });
            }
        }

        Ok(ShapedLine {
            width: layout.full_width(),
            height: layout.height(),
            paint: LinePaint::Glyphs(runs.into()),
        })
    }

    fn font_key(&self) -> u64 {
        self.font_key
    }
}
