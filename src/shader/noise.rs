use crate::foundation::math::{fract, mix};

/// Hash of a 2D lattice point into `0..1`.
pub(crate) fn random(st: [f32; 2]) -> f32 {
    fract((st[0] * 12.9898 + st[1] * 78.233).sin() * 43_758.547)
}

/// Smooth value noise in `0..1`.
pub(crate) fn noise(st: [f32; 2]) -> f32 {
    let i = [st[0].floor(), st[1].floor()];
    let f = [fract(st[0]), fract(st[1])];

    let a = random(i);
    let b = random([i[0] + 1.0, i[1]]);
    let c = random([i[0], i[1] + 1.0]);
    let d = random([i[0] + 1.0, i[1] + 1.0]);

    let u = [
        f[0] * f[0] * (3.0 - 2.0 * f[0]),
        f[1] * f[1] * (3.0 - 2.0 * f[1]),
    ];
    mix(a, b, u[0]) + (c - a) * u[1] * (1.0 - u[0]) + (d - b) * u[0] * u[1]
}

/// Four octaves of value noise at `frag * 0.01`, remapped around zero.
pub(crate) fn grain_noise(frag: [f32; 2]) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for _ in 0..4 {
        sum += noise([frag[0] * frequency * 0.01, frag[1] * frequency * 0.01]) * amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    sum * 2.0 - 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/shader/noise.rs"]
mod tests;
