//! Inverse line deformation.
//!
//! Lines are laid out in normalised screen space exactly as the rasterizer lays them out in
//! pixels. For a screen position the search walks a fixed number of candidate lines, displaces
//! each by the waveform, and keeps the line that contains (or lies closest to) the position.

use crate::foundation::math::{PI_APPROX, TAU_APPROX};
use crate::scene::params::MAX_CURVES;
use crate::wave::{WaveType, wave};

/// Uniforms the deformation search depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformParams {
    pub time: f32,
    pub resolution_y: f32,
    pub num_curves: f32,
    pub spacing: f32,
    pub frequency: f32,
    pub amplitude: f32,
    pub vertical_offset: f32,
    pub phase: f32,
    pub rotation: f32,
    pub time_stagger: f32,
    pub wave_type: WaveType,
}

/// Vertical band `[top, bottom]` of line `index` after displacement at screen position `uv`.
pub fn displaced_band(p: &DeformParams, uv: [f32; 2], index: u32) -> (f32, f32) {
    let line_height = (1.0 / p.num_curves) * p.spacing;
    let start = -(p.spacing - 1.0) / 2.0;
    let i = index as f32;
    let top = start + i * line_height;
    let bottom = start + (i + 1.0) * line_height;

    let phase_rad = p.phase / 360.0 * 2.0 * PI_APPROX;
    let stagger = i * p.time_stagger;
    let rot = p.rotation / 360.0 * 2.0 * PI_APPROX;
    let (sin_r, cos_r) = rot.sin_cos();
    let cx = uv[0] - 0.5;
    let cy = uv[1] - 0.5;
    let rotated_x = cx * cos_r - cy * sin_r;

    let angle = (rotated_x + 0.5) * p.frequency * TAU_APPROX + p.time * 0.5 + phase_rad + stagger;
    let offset = wave(angle, p.wave_type) * (p.amplitude / p.resolution_y);
    let shift = offset + p.vertical_offset / p.resolution_y;
    (top + shift, bottom + shift)
}

/// Map a screen position to a source-surface coordinate, or `None` when no line is near enough.
pub fn deform_uv(p: &DeformParams, uv: [f32; 2]) -> Option<[f32; 2]> {
    let line_height = (1.0 / p.num_curves) * p.spacing;
    let start = -(p.spacing - 1.0) / 2.0;

    let mut best_dist = 9999.0_f32;
    let mut best_line = 0u32;
    let mut best_local = 0.5_f32;

    for index in 0..MAX_CURVES {
        if index as f32 >= p.num_curves {
            continue;
        }
        let (top, bottom) = displaced_band(p, uv, index);

        if uv[1] >= top && uv[1] <= bottom {
            let diff = bottom - top;
            let denom = if diff > 0.001 { diff } else { 0.001 };
            best_line = index;
            best_local = (uv[1] - top) / denom;
            best_dist = 0.0;
        }

        let dist = (uv[1] - top).abs().min((uv[1] - bottom).abs());
        if dist < best_dist {
            best_dist = dist;
            best_line = index;
            if bottom > top {
                best_local = ((uv[1] - top) / (bottom - top)).clamp(0.0, 1.0);
            }
        }
    }

    if best_dist > line_height * 2.5 {
        return None;
    }

    let top = start + best_line as f32 * line_height;
    let bottom = start + (best_line as f32 + 1.0) * line_height;
    let original_y = top + best_local * (bottom - top);
    Some([uv[0], original_y.clamp(0.0, 1.0)])
}

#[cfg(test)]
#[path = "../../tests/unit/shader/deform.rs"]
mod tests;
