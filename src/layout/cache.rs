use crate::foundation::core::Canvas;
use crate::foundation::error::SinusResult;
use crate::scene::content::TextContent;
use crate::text::shaper::{ShapedLine, TextShaper};

/// Separator used when folding entries into the cache key.
const ENTRY_SEPARATOR: char = '\u{1}';

/// Spacing offsets closer than this (in pixels) share a layout.
const SPACING_TOLERANCE: f32 = 0.001;

/// Measured text entry.
#[derive(Clone, Debug)]
pub struct EntryMetrics {
    /// Sanitized entry text.
    pub text: String,
    /// Tile width in logical pixels, never below 1.
    pub width: f32,
    /// Tiles needed to cover the canvas width with one tile of slack on each side.
    pub repetitions: u32,
    /// Shaped run, filled once per visible tile.
    pub line: ShapedLine,
}

/// Layout shared by every frame until one of its inputs changes.
#[derive(Clone, Debug)]
pub struct LayoutEntry {
    /// Per-entry metrics in display order.
    pub entries: Vec<EntryMetrics>,
    /// Line count the layout was built for.
    pub num_curves: u32,
    /// Distance between line centres in logical pixels.
    pub line_height: f32,
    /// Vertical offset of the first line's top edge.
    pub adjusted_start_offset: f32,
}

impl LayoutEntry {
    /// Metrics of the entry shown on line `line`.
    pub fn entry_for_line(&self, line: u32) -> Option<&EntryMetrics> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(line as usize % self.entries.len())
    }

    /// Vertical centre of line `line` in logical pixels.
    pub fn line_center(&self, line: u32) -> f32 {
        self.adjusted_start_offset + line as f32 * self.line_height + self.line_height * 0.5
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CacheKey {
    entries: u64,
    font_size_bits: u32,
    font_family: String,
    font_key: u64,
    num_curves: u32,
    canvas: Canvas,
}

impl CacheKey {
    fn new(
        entries: &[String],
        text: &TextContent,
        num_curves: u32,
        canvas: Canvas,
        font_key: u64,
    ) -> Self {
        let joined = entries.join(&ENTRY_SEPARATOR.to_string());
        Self {
            entries: xxhash_rust::xxh3::xxh3_64(joined.as_bytes()),
            font_size_bits: text.font_size.to_bits(),
            font_family: text.font_family.clone(),
            font_key,
            num_curves,
            canvas,
        }
    }
}

/// Memoised text layout.
///
/// `resolve` rebuilds only when the entries, font, line count, canvas size or spacing offset
/// (beyond 0.001 px) change, or after [`TextLayoutCache::invalidate`].
#[derive(Debug)]
pub struct TextLayoutCache {
    cached: Option<Cached>,
    dirty: bool,
    recomputes: u64,
}

#[derive(Debug)]
struct Cached {
    key: CacheKey,
    spacing_offset: f32,
    entry: LayoutEntry,
}

impl Default for TextLayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutCache {
    pub fn new() -> Self {
        Self {
            cached: None,
            dirty: true,
            recomputes: 0,
        }
    }

    /// Layout for the given inputs, rebuilt only when stale.
    pub fn resolve(
        &mut self,
        text: &TextContent,
        num_curves: u32,
        spacing: f32,
        canvas: Canvas,
        shaper: &mut dyn TextShaper,
    ) -> SinusResult<&LayoutEntry> {
        let entries = text.sanitized_entries();
        let num_curves = num_curves.max(1);
        let key = CacheKey::new(&entries, text, num_curves, canvas, shaper.font_key());
        let spacing_offset = spacing_offset(canvas, spacing);

        let fresh = !self.dirty
            && self.cached.as_ref().is_some_and(|c| {
                c.key == key && (c.spacing_offset - spacing_offset).abs() <= SPACING_TOLERANCE
            });
        let cached = match self.cached.take() {
            Some(c) if fresh => c,
            _ => {
                let entry = measure(&entries, text.font_size, num_curves, spacing, canvas, shaper)?;
                self.recomputes += 1;
                self.dirty = false;
                tracing::debug!(
                    entries = entries.len(),
                    num_curves,
                    width = canvas.width,
                    height = canvas.height,
                    recomputes = self.recomputes,
                    "text layout recomputed"
                );
                Cached {
                    key,
                    spacing_offset,
                    entry,
                }
            }
        };
        Ok(&self.cached.insert(cached).entry)
    }

    /// Force the next `resolve` to rebuild.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Number of rebuilds so far.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

/// Uncached layout computation.
#[tracing::instrument(level = "debug", skip(text, shaper), fields(entries = text.entries.len()))]
pub fn build_entry(
    text: &TextContent,
    num_curves: u32,
    spacing: f32,
    canvas: Canvas,
    shaper: &mut dyn TextShaper,
) -> SinusResult<LayoutEntry> {
    let entries = text.sanitized_entries();
    measure(&entries, text.font_size, num_curves.max(1), spacing, canvas, shaper)
}

fn measure(
    entries: &[String],
    font_size: f32,
    num_curves: u32,
    spacing: f32,
    canvas: Canvas,
    shaper: &mut dyn TextShaper,
) -> SinusResult<LayoutEntry> {
    let canvas_w = canvas.width as f32;
    let mut metrics = Vec::with_capacity(entries.len());
    for text in entries {
        let line = shaper.shape(text, font_size)?;
        let measured = if line.width > 0.0 { line.width } else { 0.0001 };
        let width = measured.max(1.0);
        let repetitions = (canvas_w / width).ceil() as u32 + 2;
        metrics.push(EntryMetrics {
            text: text.clone(),
            width,
            repetitions,
            line,
        });
    }

    Ok(LayoutEntry {
        entries: metrics,
        num_curves,
        line_height: canvas.height as f32 / num_curves as f32 * spacing,
        adjusted_start_offset: -spacing_offset(canvas, spacing),
    })
}

fn spacing_offset(canvas: Canvas, spacing: f32) -> f32 {
    canvas.height as f32 * (spacing - 1.0) / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cache.rs"]
mod tests;
