use rayon::prelude::*;

use crate::foundation::math::{LUMA, Vec3, add3, dot3, scale3, unorm8};
use crate::raster::surface::SourceSurface;
use crate::render::frame::FrameRGBA;
use crate::scene::params::ParameterSet;
use crate::shader::color::{heat_map, rotate_hue};
use crate::shader::deform::{DeformParams, deform_uv};
use crate::shader::noise::{grain_noise, noise};
use crate::wave::WaveType;

/// Maximum number of blur taps.
const MAX_BLUR_SAMPLES: u32 = 25;

/// Everything the compositor reads for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Animation time in seconds.
    pub time: f32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub num_curves: f32,
    pub spacing: f32,
    pub frequency: f32,
    /// Displacement in output pixels.
    pub amplitude: f32,
    /// Vertical offset in output pixels.
    pub vertical_offset: f32,
    pub phase: f32,
    pub rotation: f32,
    pub time_stagger: f32,
    pub wave_type: WaveType,
    pub hue: f32,
    pub motion_blur: f32,
    pub heat_map_enabled: bool,
    pub grain: f32,
    pub text_color: Vec3,
    pub background_color: Vec3,
    pub preserve_image_color: bool,
}

impl FrameUniforms {
    /// Uniforms for `params` rendered at `time` into a `width x height` target.
    ///
    /// Pixel-valued parameters are multiplied by `quality_factor` so geometry keeps its
    /// proportions at export resolutions. `preserve_image_color` is the effective flag (already
    /// gated on image mode).
    pub fn from_params(
        params: &ParameterSet,
        time: f64,
        width: u32,
        height: u32,
        quality_factor: f32,
        preserve_image_color: bool,
    ) -> Self {
        Self {
            time: time as f32,
            width,
            height,
            num_curves: params.line_count() as f32,
            spacing: params.effective_spacing(),
            frequency: params.frequency,
            amplitude: params.amplitude * quality_factor,
            vertical_offset: params.vertical_offset * quality_factor,
            phase: params.phase,
            rotation: params.rotation,
            time_stagger: params.time_stagger,
            wave_type: params.wave_type,
            hue: params.hue,
            motion_blur: params.motion_blur,
            heat_map_enabled: params.heat_map_enabled,
            grain: params.grain,
            text_color: params.text_color.to_array(),
            background_color: params.background_color.to_array(),
            preserve_image_color,
        }
    }

    pub(crate) fn deform(&self) -> DeformParams {
        DeformParams {
            time: self.time,
            resolution_y: self.height as f32,
            num_curves: self.num_curves,
            spacing: self.spacing,
            frequency: self.frequency,
            amplitude: self.amplitude,
            vertical_offset: self.vertical_offset,
            phase: self.phase,
            rotation: self.rotation,
            time_stagger: self.time_stagger,
            wave_type: self.wave_type,
        }
    }

    fn blur_active(&self) -> bool {
        self.motion_blur > 0.01
    }

    fn heat_map_active(&self) -> bool {
        self.heat_map_enabled && self.blur_active()
    }
}

/// Per-pixel deformation, blur, recolor and grain over a [`SourceSurface`].
///
/// The output frame is reused across calls and only reallocated when the target size changes.
#[derive(Debug, Default)]
pub struct DeformCompositor {
    frame: FrameRGBA,
}

impl DeformCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shade every output pixel. Rows are produced top-down.
    pub fn composite(&mut self, source: &SourceSurface, uniforms: &FrameUniforms) -> &FrameRGBA {
        let (w, h) = (uniforms.width, uniforms.height);
        self.frame.resize(w, h);
        if w == 0 || h == 0 {
            return &self.frame;
        }

        let deform = uniforms.deform();
        let stride = w as usize * 4;
        self.frame
            .data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(row, out)| {
                // Fragment coordinates have their origin at the bottom-left corner.
                let frag_y = h as f32 - row as f32 - 0.5;
                for (x, px) in out.chunks_exact_mut(4).enumerate() {
                    let frag = [x as f32 + 0.5, frag_y];
                    let c = shade(source, uniforms, &deform, frag);
                    px[0] = unorm8(c[0]);
                    px[1] = unorm8(c[1]);
                    px[2] = unorm8(c[2]);
                    px[3] = 255;
                }
            });
        &self.frame
    }

    /// Last composited frame.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Drop the output buffer.
    pub fn release(&mut self) {
        self.frame = FrameRGBA::default();
    }
}

/// Color of the fragment at `frag` (bottom-left origin, pixel centres at `.5`).
pub(crate) fn shade(
    source: &SourceSurface,
    u: &FrameUniforms,
    deform: &DeformParams,
    frag: [f32; 2],
) -> Vec3 {
    let uv = [frag[0] / u.width as f32, 1.0 - frag[1] / u.height as f32];

    let Some(st) = deform_uv(deform, uv) else {
        return if u.heat_map_active() {
            rotate_hue(heat_map(uv[1]), u.hue)
        } else {
            u.background_color
        };
    };

    let base = source.sample(st);
    if base[0] + base[1] + base[2] < 0.01 {
        return u.background_color;
    }

    let blurred = if u.blur_active() {
        directional_blur(source, u, st).unwrap_or(base)
    } else {
        base
    };

    let color = if u.heat_map_active() {
        rotate_hue(heat_map(dot3(blurred, LUMA)), u.hue)
    } else if u.preserve_image_color {
        blurred
    } else {
        scale3(rotate_hue(u.text_color, u.hue), dot3(blurred, LUMA))
    };

    if u.grain > 0.01 {
        apply_grain(color, u, frag)
    } else {
        color
    }
}

/// Gaussian-weighted leftward blur; `None` when the weights vanish.
fn directional_blur(source: &SourceSurface, u: &FrameUniforms, st: [f32; 2]) -> Option<Vec3> {
    let amount = u.motion_blur / u.width as f32;
    let samples = (u.motion_blur * 2.5).min(MAX_BLUR_SAMPLES as f32);
    let denom = if samples > 1.0 { samples - 1.0 } else { 1.0 };

    let mut total = 0.0;
    let mut acc = [0.0; 3];
    for i in 0..MAX_BLUR_SAMPLES {
        if i as f32 >= samples {
            continue;
        }
        let t = i as f32 / denom;
        let tap = [
            (st[0] - amount * t).clamp(0.0, 1.0),
            st[1].clamp(0.0, 1.0),
        ];
        let weight = (-t * t * 4.0).exp();
        acc = add3(acc, scale3(source.sample(tap), weight));
        total += weight;
    }

    (total > 0.001).then(|| scale3(acc, 1.0 / total))
}

fn apply_grain(color: Vec3, u: &FrameUniforms, frag: [f32; 2]) -> Vec3 {
    let intensity = u.grain / 100.0;
    let g = grain_noise(frag) * intensity * 0.3;
    let grained = add3(color, [g, g, g]);
    let flicker = noise([
        frag[0] * 0.02 + u.time * 0.1,
        frag[1] * 0.02 + u.time * 0.1,
    ]) * intensity
        * 0.2;
    scale3(grained, 1.0 + flicker)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/compositor.rs"]
mod tests;
