//! Shader-language numeric helpers.
//!
//! These mirror the GLSL built-ins the compositor formulas are written with.

/// The truncated π the waveforms and rotations are defined with.
pub(crate) const PI_APPROX: f32 = 3.14159;

/// `2 * PI_APPROX`, the waveform period.
pub(crate) const TAU_APPROX: f32 = 2.0 * PI_APPROX;

/// RGB triple used throughout the compositor.
pub(crate) type Vec3 = [f32; 3];

/// GLSL `mod`: result has the sign of `y`.
pub(crate) fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// GLSL `fract`.
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mix`.
pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

pub(crate) fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [mix(a[0], b[0], t), mix(a[1], b[1], t), mix(a[2], b[2], t)]
}

/// GLSL `smoothstep`.
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub(crate) fn dot3(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn scale3(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub(crate) fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Perceptual luminance weights (Rec. 601).
pub(crate) const LUMA: Vec3 = [0.299, 0.587, 0.114];

/// Quantise a `0..=1` channel to a byte the way a UNORM8 render target does.
pub(crate) fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
