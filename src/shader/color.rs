use crate::foundation::math::{Vec3, fract, glsl_mod, mix, mix3};

const BLACK: Vec3 = [0.0, 0.0, 0.0];
const BLUE: Vec3 = [0.0, 0.0, 1.0];
const GREEN: Vec3 = [0.0, 1.0, 0.0];
const YELLOW: Vec3 = [1.0, 1.0, 0.0];
const RED: Vec3 = [1.0, 0.0, 0.0];
const WHITE: Vec3 = [1.0, 1.0, 1.0];

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// Branch-free RGB to HSV, all channels in `0..=1`.
pub(crate) fn rgb_to_hsv(c: Vec3) -> Vec3 {
    let [r, g, b] = c;
    let k = [0.0, -1.0 / 3.0, 2.0 / 3.0, -1.0];
    let s = step(b, g);
    let p = [
        mix(b, g, s),
        mix(g, b, s),
        mix(k[3], k[0], s),
        mix(k[2], k[1], s),
    ];
    let s = step(p[0], r);
    let q = [
        mix(p[0], r, s),
        mix(p[1], p[1], s),
        mix(p[3], p[2], s),
        mix(r, p[0], s),
    ];
    let d = q[0] - q[3].min(q[1]);
    let e = 1.0e-10;
    [
        (q[2] + (q[3] - q[1]) / (6.0 * d + e)).abs(),
        d / (q[0] + e),
        q[0],
    ]
}

/// HSV to RGB, all channels in `0..=1`.
pub(crate) fn hsv_to_rgb(c: Vec3) -> Vec3 {
    let [h, s, v] = c;
    let k = [1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0];
    let channel = |offset: f32| -> f32 {
        let p = (fract(h + offset) * 6.0 - k[3]).abs();
        v * mix(k[0], (p - k[0]).clamp(0.0, 1.0), s)
    };
    [channel(k[0]), channel(k[1]), channel(k[2])]
}

/// Rotate the hue of `c` by `degrees`.
pub(crate) fn rotate_hue(c: Vec3, degrees: f32) -> Vec3 {
    let mut hsv = rgb_to_hsv(c);
    hsv[0] = glsl_mod(hsv[0] + degrees / 360.0, 1.0);
    hsv_to_rgb(hsv)
}

/// Five-band heat palette (black, blue, green, yellow, red, white) with a 20% saturation boost.
pub(crate) fn heat_map(intensity: f32) -> Vec3 {
    let color = if intensity < 0.2 {
        mix3(BLACK, BLUE, intensity / 0.2)
    } else if intensity < 0.4 {
        mix3(BLUE, GREEN, (intensity - 0.2) / 0.2)
    } else if intensity < 0.6 {
        mix3(GREEN, YELLOW, (intensity - 0.4) / 0.2)
    } else if intensity < 0.8 {
        mix3(YELLOW, RED, (intensity - 0.6) / 0.2)
    } else {
        mix3(RED, WHITE, (intensity - 0.8) / 0.2)
    };
    let mut hsv = rgb_to_hsv(color);
    hsv[1] = (hsv[1] * 1.2).min(1.0);
    hsv_to_rgb(hsv)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/color.rs"]
mod tests;
