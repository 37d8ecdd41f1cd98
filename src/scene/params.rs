use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb;
use crate::foundation::error::{SinusError, SinusResult};
use crate::wave::WaveType;

/// Upper bound on the number of lines the compositor searches per pixel.
pub const MAX_CURVES: u32 = 20;

/// Every knob that shapes a rendered frame.
///
/// The set is a plain value: render calls borrow it and never write back into it. `time` is the
/// live loop's clock; exporters pass their own timestamps alongside instead of overwriting it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Number of text lines (1..=20 are searched by the compositor).
    pub num_curves: u32,
    /// Peak line displacement in pixels.
    pub amplitude: f32,
    /// Wave cycles across the canvas width.
    pub frequency: f32,
    /// Horizontal scroll speed multiplier.
    pub speed: f32,
    /// Line pitch multiplier; `1.0` packs lines edge to edge.
    pub spacing: f32,
    /// Animation clock in seconds.
    pub time: f64,
    /// Color shown where no line content maps.
    pub background_color: Rgb,
    /// Hue rotation in degrees.
    pub hue: f32,
    /// Leftward blur intensity; `0` disables the blur pass.
    pub motion_blur: f32,
    /// Wave phase offset in degrees.
    pub phase: f32,
    /// Displacement waveform.
    #[serde(deserialize_with = "wave_type_from_repr")]
    pub wave_type: WaveType,
    /// Rotation of the wave's x axis in degrees.
    pub rotation: f32,
    /// Constant vertical line offset in pixels.
    pub vertical_offset: f32,
    /// Per-line phase offset.
    pub time_stagger: f32,
    /// Luminance heat-map recolor (only applied while motion blur is active).
    pub heat_map_enabled: bool,
    /// Grain strength, `0..=100`.
    pub grain: f32,
    /// Tint for text content.
    pub text_color: Rgb,
    /// Keep source colors instead of tinting; only honoured in image mode.
    pub preserve_image_color: bool,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            num_curves: 5,
            amplitude: 50.0,
            frequency: 2.0,
            speed: 2.0,
            spacing: 0.8,
            time: 0.0,
            background_color: Rgb::BLACK,
            hue: 0.0,
            motion_blur: 0.0,
            phase: 0.0,
            wave_type: WaveType::Sine,
            rotation: 0.0,
            vertical_offset: 0.0,
            time_stagger: 0.0,
            heat_map_enabled: true,
            grain: 0.0,
            text_color: Rgb::WHITE,
            preserve_image_color: false,
        }
    }
}

impl ParameterSet {
    /// Restore every parameter to its default value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Line count used for geometry: never below one.
    pub fn line_count(&self) -> u32 {
        self.num_curves.max(1)
    }

    /// Spacing used for geometry: never zero or negative.
    pub fn effective_spacing(&self) -> f32 {
        self.spacing.max(1e-3)
    }

    pub fn validate(&self) -> SinusResult<()> {
        if self.num_curves == 0 {
            return Err(SinusError::validation("num_curves must be >= 1"));
        }
        let finite = [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("speed", self.speed),
            ("spacing", self.spacing),
            ("hue", self.hue),
            ("motion_blur", self.motion_blur),
            ("phase", self.phase),
            ("rotation", self.rotation),
            ("vertical_offset", self.vertical_offset),
            ("time_stagger", self.time_stagger),
            ("grain", self.grain),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(SinusError::validation(format!("{name} must be finite")));
            }
        }
        if !self.time.is_finite() {
            return Err(SinusError::validation("time must be finite"));
        }
        if self.spacing <= 0.0 {
            return Err(SinusError::validation("spacing must be > 0"));
        }
        if self.motion_blur < 0.0 {
            return Err(SinusError::validation("motion_blur must be >= 0"));
        }
        if !(0.0..=100.0).contains(&self.grain) {
            return Err(SinusError::validation("grain must be in 0..=100"));
        }
        Ok(())
    }
}

fn wave_type_from_repr<'de, D>(deserializer: D) -> Result<WaveType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Index(i64),
        Name(WaveType),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Index(i) => Ok(WaveType::from_index(i)),
        Repr::Name(w) => Ok(w),
    }
}
