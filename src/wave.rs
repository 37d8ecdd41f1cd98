//! Line displacement waveforms.
//!
//! Every waveform maps an unbounded phase (radians) to a displacement. Phases are normalised over
//! one period of `2 * 3.14159` with GLSL `mod` semantics before shape-specific branching, so the
//! same phase always yields the same displacement bit for bit.

use crate::foundation::math::{PI_APPROX, TAU_APPROX, glsl_mod, smoothstep};

/// Waveform selector, in the order of the numeric `wave_type` parameter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WaveType {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
    InverseSawtooth,
    SmoothStep,
    Pulse,
    Bell,
    Bounce,
    Elastic,
    EaseInOut,
    DoubleSine,
    Stairs,
    Spike,
    Heartbeat,
    Tent,
    Chaotic,
    Spiral,
    WavePacket,
    Kink,
    Modulated,
    Fractal,
    Beats,
}

impl WaveType {
    /// All waveforms in index order.
    pub const ALL: [WaveType; 23] = [
        Self::Sine,
        Self::Triangle,
        Self::Square,
        Self::Sawtooth,
        Self::InverseSawtooth,
        Self::SmoothStep,
        Self::Pulse,
        Self::Bell,
        Self::Bounce,
        Self::Elastic,
        Self::EaseInOut,
        Self::DoubleSine,
        Self::Stairs,
        Self::Spike,
        Self::Heartbeat,
        Self::Tent,
        Self::Chaotic,
        Self::Spiral,
        Self::WavePacket,
        Self::Kink,
        Self::Modulated,
        Self::Fractal,
        Self::Beats,
    ];

    /// Map a numeric selector to a waveform. Anything outside `0..=22` selects [`WaveType::Beats`].
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::Beats)
    }

    /// Numeric selector of this waveform.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Closed output range `(min, max)` of the waveform's formula.
    ///
    /// Most shapes stay in `[-1, 1]`. The summed and enveloped shapes are bounded by the
    /// coefficients of their formulas instead.
    pub fn bounds(self) -> (f32, f32) {
        match self {
            Self::Chaotic => (-1.5, 1.5),
            Self::Fractal => (-0.9375, 0.9375),
            Self::WavePacket | Self::Modulated => (-3.0, 1.0),
            _ => (-1.0, 1.0),
        }
    }
}

/// Displacement of `kind` at phase `t`.
pub fn wave(t: f32, kind: WaveType) -> f32 {
    let nt = glsl_mod(t, TAU_APPROX) / TAU_APPROX;
    let cycle = nt * 2.0 - 1.0;

    match kind {
        WaveType::Sine => t.sin(),
        WaveType::Triangle | WaveType::Tent => triangle(nt),
        WaveType::Square => {
            if t.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        WaveType::Sawtooth => nt * 2.0 - 1.0,
        WaveType::InverseSawtooth => 1.0 - nt * 2.0,
        WaveType::SmoothStep => smoothstep(0.0, 1.0, nt) * 2.0 - 1.0,
        WaveType::Pulse => (-cycle.abs() * 4.0).exp() * 2.0 - 1.0,
        WaveType::Bell => {
            let b = cycle * 2.0;
            (-b * b * 2.0).exp() * 2.0 - 1.0
        }
        WaveType::Bounce => {
            if nt < 0.5 {
                (nt * 4.0 * PI_APPROX).sin().abs() * 2.0 - 1.0
            } else {
                -((nt - 0.5) * 4.0 * PI_APPROX).sin().abs() * 2.0 + 1.0
            }
        }
        WaveType::Elastic => {
            let e = nt * 2.0 - 1.0;
            (e * PI_APPROX * 3.0).sin() * (-e.abs() * 2.0).exp()
        }
        WaveType::EaseInOut => {
            let eased = if nt < 0.5 {
                (nt * 2.0).powi(2)
            } else {
                1.0 - ((1.0 - nt) * 2.0).powi(2)
            };
            eased * 2.0 - 1.0
        }
        WaveType::DoubleSine => (t * 2.0).sin() * 0.7 + t.sin() * 0.3,
        WaveType::Stairs => (nt * 8.0).floor() / 8.0 * 2.0 - 1.0,
        WaveType::Spike => {
            let s = glsl_mod(nt * 4.0, 1.0);
            if s < 0.1 {
                s * 20.0 - 1.0
            } else {
                1.0 - (s - 0.1) * 2.0
            }
        }
        WaveType::Heartbeat => heartbeat(glsl_mod(nt * 2.0, 1.0)),
        WaveType::Chaotic => {
            (t * 2.3).sin() * 0.5
                + (t * 3.7).sin() * 0.3
                + (t * 5.1).sin() * 0.2
                + (t * 1.9).cos() * 0.3
                + (t * 4.3).cos() * 0.2
        }
        WaveType::Spiral => (t * 2.0 + nt * PI_APPROX * 4.0).sin() * 0.7 + (t * 1.5).cos() * 0.3,
        WaveType::WavePacket => {
            let envelope = (-(nt - 0.5).abs() * 4.0).exp();
            (t * 8.0).sin() * envelope * 2.0 - 1.0
        }
        WaveType::Kink => {
            if nt < 0.5 {
                nt * 4.0 - 1.0
            } else {
                1.0 - (nt - 0.5) * 4.0
            }
        }
        WaveType::Modulated => (t * 2.0).sin() * ((t * 0.5).sin() * 0.5 + 0.5) * 2.0 - 1.0,
        WaveType::Fractal => {
            let mut sum = 0.0;
            let mut freq = 1.0;
            let mut amp = 1.0;
            for _ in 0..4 {
                sum += (t * freq).sin() * amp;
                freq *= 2.0;
                amp *= 0.5;
            }
            sum * 0.5
        }
        WaveType::Beats => ((t * 2.0).sin() + (t * 2.1).sin()) * 0.5,
    }
}

fn triangle(nt: f32) -> f32 {
    if nt < 0.5 {
        nt * 4.0 - 1.0
    } else {
        3.0 - nt * 4.0
    }
}

fn heartbeat(b: f32) -> f32 {
    if b < 0.3 {
        smoothstep(0.0, 0.3, b) * 1.5 - 0.5
    } else if b < 0.4 {
        1.0 - smoothstep(0.3, 0.4, b) * 2.0
    } else if b < 0.5 {
        smoothstep(0.4, 0.5, b) * 0.6 - 0.3
    } else {
        -0.3 - smoothstep(0.5, 1.0, b) * 0.7
    }
}

#[cfg(test)]
#[path = "../tests/unit/wave.rs"]
mod tests;
