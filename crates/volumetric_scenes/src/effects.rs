//! # Global Effects
//!
//! Engine-wide post-processing applied to every scene after its generator
//! ran:
//!
//! ```text
//! 1. ROTATE   resample the frame through a rotation about the center
//! 2. STROBE   blank the whole frame on alternate half-periods
//! 3. PULSE    scale every voxel by 0.65 + 0.35·sin(2π·rate·t)
//! 4. INVERT   voxels above the dark floor become (max − value)
//! ```
//!
//! Every stage reads only the frame in front of it, so an output frame is
//! still a pure function of (time, parameters). Time is scaled by
//! `animation_speed`, the same as in the generators.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use volumetric_core::VoxelBuffer;

use crate::geometry::{center, voxel, Vec3};
use crate::params::{choice_enum, scene_record, FieldUpdate, GlobalParams, ParamField, ParamValue};

/// Voxels at or below this stay dark when inverting.
const INVERT_FLOOR: f32 = 10.0 / 255.0;

/// Pulse brightness at the zero crossing.
const PULSE_BASE: f64 = 0.65;

/// Pulse swing either side of the base.
const PULSE_SWING: f64 = 0.35;

/// Phase spread of the Y spin per unit of `rotation_offset`.
const OFFSET_Y: f64 = 0.5;

/// Phase spread of the Z spin per unit of `rotation_offset`.
const OFFSET_Z: f64 = 1.0;

choice_enum! {
    /// Strobe rate.
    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    Strobe {
        /// No strobe.
        #[default]
        Off => "off",
        /// 2 Hz.
        Slow => "slow",
        /// 5 Hz.
        Medium => "medium",
        /// 10 Hz.
        Fast => "fast",
    }
}

impl Strobe {
    /// Flashes per second, 0 when off.
    #[must_use]
    pub const fn rate(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Slow => 2.0,
            Self::Medium => 5.0,
            Self::Fast => 10.0,
        }
    }
}

choice_enum! {
    /// Pulse rate.
    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    Pulse {
        /// No pulse.
        #[default]
        Off => "off",
        /// 0.5 Hz.
        Slow => "slow",
        /// 1 Hz.
        Medium => "medium",
        /// 2 Hz.
        Fast => "fast",
    }
}

impl Pulse {
    /// Breaths per second, 0 when off.
    #[must_use]
    pub const fn rate(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Slow => 0.5,
            Self::Medium => 1.0,
            Self::Fast => 2.0,
        }
    }
}

scene_record! {
    /// Engine-wide effect settings. Shared by every scene and never saved
    /// per scene.
    #[derive(Serialize, Deserialize)]
    #[serde(default)]
    EffectParams {
        /// Blank the frame on alternate half-periods.
        strobe: Strobe = Strobe::Off,
        /// Breathing brightness.
        pulse: Pulse = Pulse::Off,
        /// Invert lit voxels against the frame maximum.
        invert: bool = false,
        /// Base rotation about X, in half turns.
        rotation_x: f64 = 0.0,
        /// Base rotation about Y, in half turns.
        rotation_y: f64 = 0.0,
        /// Base rotation about Z, in half turns.
        rotation_z: f64 = 0.0,
        /// Spin in rad/s added on every axis. Zero or less holds the base rotation.
        rotation_speed: f64 = 0.0,
        /// Spreads the spin rates of Y and Z away from X.
        rotation_offset: f64 = 0.0,
    }
}

impl EffectParams {
    /// True when [`apply`] leaves every frame unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.strobe == Strobe::Off
            && self.pulse == Pulse::Off
            && !self.invert
            && self.rotation_x == 0.0
            && self.rotation_y == 0.0
            && self.rotation_z == 0.0
            && self.rotation_speed <= 0.0
    }

    /// Rotation angles about X, Y and Z in radians at scaled time `t`.
    #[must_use]
    pub fn rotation_angles(&self, t: f64) -> Vec3 {
        let base = Vec3::new(self.rotation_x, self.rotation_y, self.rotation_z) * PI;
        if self.rotation_speed <= 0.0 {
            return base;
        }
        let spin = t * self.rotation_speed;
        let offset = self.rotation_offset;
        base + Vec3::new(spin, spin * (1.0 + OFFSET_Y * offset), spin * (1.0 + OFFSET_Z * offset))
    }
}

/// Applies the effects to a generated frame.
///
/// `scratch` holds a copy of the frame while rotating; it is resized to
/// the frame's dimensions if needed.
pub fn apply(
    buffer: &mut VoxelBuffer,
    scratch: &mut VoxelBuffer,
    time: f64,
    globals: &GlobalParams,
    effects: &EffectParams,
) {
    if effects.is_identity() {
        return;
    }
    let t = globals.scaled_time(time);

    rotate(buffer, scratch, effects.rotation_angles(t));
    strobe(buffer, effects.strobe, t);
    pulse(buffer, effects.pulse, t);
    if effects.invert {
        invert(buffer);
    }
}

/// Resamples the frame so that voxel `p` shows what the generator drew at
/// `R·(p − c) + c`, where `R` rotates about X, then Y, then Z.
fn rotate(buffer: &mut VoxelBuffer, scratch: &mut VoxelBuffer, angles: Vec3) {
    if angles == Vec3::default() || !(angles.x.is_finite() && angles.y.is_finite() && angles.z.is_finite()) {
        return;
    }
    if scratch.dims() != buffer.dims() {
        *scratch = VoxelBuffer::new(buffer.dims());
    }
    scratch.copy_from(buffer);

    // R is linear, so rotating the basis once is enough.
    let turn = |v: Vec3| v.rotate_x(angles.x).rotate_y(angles.y).rotate_z(angles.z);
    let (ex, ey, ez) = (
        turn(Vec3::new(1.0, 0.0, 0.0)),
        turn(Vec3::new(0.0, 1.0, 0.0)),
        turn(Vec3::new(0.0, 0.0, 1.0)),
    );
    let c = center(buffer);
    let dims = buffer.dims();

    for z in 0..dims.z() as i32 {
        for y in 0..dims.y() as i32 {
            for x in 0..dims.x() as i32 {
                let p = Vec3::new(f64::from(x), f64::from(y), f64::from(z)) - c;
                let q = ex * p.x + ey * p.y + ez * p.z + c;
                let value = match (voxel(q.x), voxel(q.y), voxel(q.z)) {
                    (Some(sx), Some(sy), Some(sz)) => scratch.get(sx, sy, sz),
                    _ => 0.0,
                };
                buffer.write(x, y, z, value);
            }
        }
    }
}

fn strobe(buffer: &mut VoxelBuffer, strobe: Strobe, t: f64) {
    let half_periods = (t * strobe.rate() * 2.0).floor();
    if strobe != Strobe::Off && half_periods.is_finite() && half_periods.rem_euclid(2.0) == 1.0 {
        buffer.fill(0.0);
    }
}

fn pulse(buffer: &mut VoxelBuffer, pulse: Pulse, t: f64) {
    if pulse == Pulse::Off {
        return;
    }
    let factor = PULSE_BASE + PULSE_SWING * (TAU * pulse.rate() * t).sin();
    if !factor.is_finite() {
        return;
    }
    let factor = factor as f32;
    for v in buffer.as_mut_slice() {
        *v *= factor;
    }
}

fn invert(buffer: &mut VoxelBuffer) {
    let max = buffer.max_value();
    if max <= 0.0 {
        return;
    }
    for v in buffer.as_mut_slice() {
        if *v > INVERT_FLOOR {
            *v = max - *v;
        }
    }
}
