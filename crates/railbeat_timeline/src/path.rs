// SPDX-License-Identifier: MIT OR Apache-2.0
//! Beat paths and the frame that places them in the world.

use serde::{Deserialize, Serialize};

/// 3D vector as stored in level data
pub type Vec3 = [f32; 3];

/// Interpolation and vector utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Component-wise sum
    pub fn add(a: Vec3, b: Vec3) -> Vec3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Scale a vector
    pub fn scale(v: Vec3, s: f32) -> Vec3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }
}

/// A keyed point on a beat path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatKey {
    /// Beat number within the track
    pub beat: f32,
    /// Track-local offset at this beat (right, up, forward)
    pub offset: Vec3,
}

impl BeatKey {
    /// Create a new beat key
    pub fn new(beat: f32, offset: Vec3) -> Self {
        Self { beat, offset }
    }
}

/// Mapping from a beat number to a track-local offset.
///
/// Offsets are relative to the track's start, so a track always begins at
/// `[0, 0, 0]` and the tracklist chains tracks end to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BeatPath {
    /// Straight run along the forward axis
    Straight {
        /// Forward distance covered per beat
        units_per_beat: f32,
    },
    /// Piecewise-linear path through keyed beats
    Keyed(Vec<BeatKey>),
}

impl Default for BeatPath {
    fn default() -> Self {
        Self::Straight { units_per_beat: 1.0 }
    }
}

impl BeatPath {
    /// Evaluate the local offset at a beat
    pub fn offset_at(&self, beat: f32) -> Vec3 {
        match self {
            Self::Straight { units_per_beat } => [0.0, 0.0, beat * units_per_beat],
            Self::Keyed(keys) => evaluate_keys(keys, beat),
        }
    }

    /// Check the path is usable, returning a reason when it is not
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Straight { units_per_beat } => {
                if !units_per_beat.is_finite() || *units_per_beat < 0.0 {
                    return Err(format!("units_per_beat must be finite and non-negative, got {units_per_beat}"));
                }
                Ok(())
            }
            Self::Keyed(keys) => {
                let Some(first) = keys.first() else {
                    return Err("keyed path has no keys".to_string());
                };
                if first.beat != 0.0 || first.offset != [0.0; 3] {
                    return Err("first key must sit at beat 0 with a zero offset".to_string());
                }
                if keys.iter().any(|k| !k.beat.is_finite() || k.offset.iter().any(|c| !c.is_finite())) {
                    return Err("keys must be finite".to_string());
                }
                if keys.windows(2).any(|w| w[1].beat < w[0].beat) {
                    return Err("keys must be sorted by beat".to_string());
                }
                Ok(())
            }
        }
    }
}

fn evaluate_keys(keys: &[BeatKey], beat: f32) -> Vec3 {
    let next_idx = keys.iter().position(|k| k.beat >= beat);

    match next_idx {
        None => keys.last().map(|k| k.offset).unwrap_or_default(),
        Some(0) => keys[0].offset,
        Some(idx) => {
            let a = &keys[idx - 1];
            let b = &keys[idx];
            if (b.beat - a.beat).abs() < 0.0001 {
                return b.offset;
            }
            let t = (beat - a.beat) / (b.beat - a.beat);
            Interpolation::lerp_vec3(a.offset, b.offset, t)
        }
    }
}

/// Start point and orientation of the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathFrame {
    /// World position of the tracklist start
    pub origin: Vec3,
    /// World direction of the local x axis
    pub right: Vec3,
    /// World direction of the local y axis
    pub up: Vec3,
    /// World direction of the local z axis (direction of travel)
    pub forward: Vec3,
}

impl Default for PathFrame {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            right: [1.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            forward: [0.0, 0.0, 1.0],
        }
    }
}

impl PathFrame {
    /// Axis-aligned frame starting at `origin`
    pub fn at(origin: Vec3) -> Self {
        Self { origin, ..Self::default() }
    }

    /// Map a local offset into world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        let x = Interpolation::scale(self.right, local[0]);
        let y = Interpolation::scale(self.up, local[1]);
        let z = Interpolation::scale(self.forward, local[2]);
        Interpolation::add(self.origin, Interpolation::add(x, Interpolation::add(y, z)))
    }
}
