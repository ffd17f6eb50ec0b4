use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the explicit validation entry points.
///
/// The playback core in `effect-core` never fails at runtime: malformed
/// descriptions degrade to defined default outputs there. Validation is a
/// separate service for the editing layer, which wants to surface authoring
/// mistakes before a description is saved.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("frame array `{array}` has {len} entries, expected {expected}")]
    FrameArrayMismatch {
        array: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("particle count {0} is outside 1..=100")]
    ParticleCountOutOfRange(u32),
    #[error("particle life must be positive, got {0}")]
    NonPositiveLife(f32),
    #[error("emission step must be positive, got {0}")]
    NonPositiveStep(f32),
    #[error("cycle time `{field}` must not be negative, got {value}")]
    NegativeCycleTime { field: &'static str, value: f32 },
}

/// One keyframed visual layer (sprite/mesh) within an authored effect.
///
/// The pose arrays (`frame_times`/`frame_sizes`/`frame_angles`/
/// `frame_positions`/`frame_colors`) are parallel: indices correspond 1:1
/// and each has `frame_count` entries. Three periodic sub-systems advance on
/// independent clocks derived from the same elapsed time: the pose
/// keyframes, the flipbook texture cycle (`frame_tex_names` ×
/// `frame_tex_time`), and the per-vertex UV cycle (`coord_list` ×
/// `coord_frame_time`). They are not synchronized with each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubEffect {
    pub name: String,
    pub frame_count: usize,
    pub frame_times: Vec<f32>,
    pub frame_sizes: Vec<[f32; 3]>,
    pub frame_angles: Vec<[f32; 3]>,
    pub frame_positions: Vec<[f32; 3]>,
    pub frame_colors: Vec<[f32; 4]>,
    /// Base texture, used when the flipbook list is empty.
    pub tex_name: String,
    pub frame_tex_names: Vec<String>,
    pub frame_tex_time: f32,
    /// Per-frame array of per-vertex (u, v) pairs.
    pub coord_list: Vec<Vec<[f32; 2]>>,
    pub coord_frame_time: f32,
    pub tex_list: Vec<Vec<[f32; 2]>>,
    pub tex_frame_time: f32,
}

impl SubEffect {
    /// Check the parallel-array invariant and cycle times.
    pub fn validate(&self) -> Result<(), ModelError> {
        let expected = self.frame_count;
        // frame_times may be empty (all durations default) or parallel.
        if !self.frame_times.is_empty() && self.frame_times.len() != expected {
            return Err(ModelError::FrameArrayMismatch {
                array: "frameTimes",
                len: self.frame_times.len(),
                expected,
            });
        }
        for (array, len) in [
            ("frameSizes", self.frame_sizes.len()),
            ("frameAngles", self.frame_angles.len()),
            ("framePositions", self.frame_positions.len()),
            ("frameColors", self.frame_colors.len()),
        ] {
            if len != expected {
                return Err(ModelError::FrameArrayMismatch {
                    array,
                    len,
                    expected,
                });
            }
        }
        for (field, value) in [
            ("frameTexTime", self.frame_tex_time),
            ("coordFrameTime", self.coord_frame_time),
            ("texFrameTime", self.tex_frame_time),
        ] {
            if value < 0.0 {
                return Err(ModelError::NegativeCycleTime { field, value });
            }
        }
        Ok(())
    }
}

/// One of the 18 built-in particle behavior patterns.
///
/// Stored as an integer tag in the editor's JSON. Unknown tags fall back to
/// `Normal`, which uses the default initial-velocity rule, so future
/// archetypes degrade gracefully instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ParticleArchetype {
    #[default]
    Normal,
    Fire,
    Smoke,
    Blast,
    Blast2,
    Blast3,
    Snow,
    Round,
    LineSingle,
    Spark,
    Ring,
    Fountain,
    Rain,
    Fog,
    Spiral,
    Flash,
    Shock,
    Trail,
}

impl ParticleArchetype {
    pub const COUNT: usize = 18;

    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Self::Normal,
            1 => Self::Fire,
            2 => Self::Smoke,
            3 => Self::Blast,
            4 => Self::Blast2,
            5 => Self::Blast3,
            6 => Self::Snow,
            7 => Self::Round,
            8 => Self::LineSingle,
            9 => Self::Spark,
            10 => Self::Ring,
            11 => Self::Fountain,
            12 => Self::Rain,
            13 => Self::Fog,
            14 => Self::Spiral,
            15 => Self::Flash,
            16 => Self::Shock,
            17 => Self::Trail,
            _ => Self::Normal,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Fire => 1,
            Self::Smoke => 2,
            Self::Blast => 3,
            Self::Blast2 => 4,
            Self::Blast3 => 5,
            Self::Snow => 6,
            Self::Round => 7,
            Self::LineSingle => 8,
            Self::Spark => 9,
            Self::Ring => 10,
            Self::Fountain => 11,
            Self::Rain => 12,
            Self::Fog => 13,
            Self::Spiral => 14,
            Self::Flash => 15,
            Self::Shock => 16,
            Self::Trail => 17,
        }
    }
}

impl From<i32> for ParticleArchetype {
    fn from(index: i32) -> Self {
        Self::from_index(index)
    }
}

impl From<ParticleArchetype> for i32 {
    fn from(archetype: ParticleArchetype) -> Self {
        archetype.index()
    }
}

/// One procedural emitter configuration.
///
/// Unlike `SubEffect`, the keyframe arrays here are sampled by lifetime
/// fraction (age / lifetime) rather than wall-clock time: each particle
/// replays the full ramp over its own life.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleSystem {
    #[serde(rename = "type")]
    pub archetype: ParticleArchetype,
    /// Capacity of this system, 1..=100.
    pub particle_count: u32,
    /// Lifetime of each spawned particle, in seconds.
    pub life: f32,
    /// Initial speed scale.
    pub velocity: f32,
    pub direction: [f32; 3],
    pub acceleration: [f32; 3],
    /// Spawn-position jitter box: each axis is offset by uniform(-range, +range).
    pub range: [f32; 3],
    pub offset: [f32; 3],
    /// Emission interval, in seconds per particle.
    pub step: f32,
    /// Emission does not begin until this much time has elapsed.
    pub delay_time: f32,
    /// When positive, emission stops `play_time` seconds after the delay ends.
    pub play_time: f32,
    pub frame_sizes: Vec<[f32; 3]>,
    pub frame_angles: Vec<[f32; 3]>,
    pub frame_colors: Vec<[f32; 4]>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            archetype: ParticleArchetype::Normal,
            particle_count: 10,
            life: 1.0,
            velocity: 1.0,
            direction: [0.0, 1.0, 0.0],
            acceleration: [0.0, 0.0, 0.0],
            range: [0.0, 0.0, 0.0],
            offset: [0.0, 0.0, 0.0],
            step: 0.1,
            delay_time: 0.0,
            play_time: 0.0,
            frame_sizes: Vec::new(),
            frame_angles: Vec::new(),
            frame_colors: Vec::new(),
        }
    }
}

impl ParticleSystem {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.particle_count < 1 || self.particle_count > 100 {
            return Err(ModelError::ParticleCountOutOfRange(self.particle_count));
        }
        if self.life <= 0.0 {
            return Err(ModelError::NonPositiveLife(self.life));
        }
        if self.step <= 0.0 {
            return Err(ModelError::NonPositiveStep(self.step));
        }
        Ok(())
    }
}

/// A loaded effect description: the set of keyframed layers plus the
/// whole-effect header (spin axis, path flag) the player consumes.
///
/// File persistence lives in the surrounding editor; this is only the shape
/// it hands across.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Effect {
    pub name: String,
    pub sub_effects: Vec<SubEffect>,
    pub rotating: bool,
    pub rota_vec: [f32; 3],
    pub rota_vel: f32,
    pub use_path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn particle_system_from_editor_json() {
        let value = json!({
            "type": 6,
            "particleCount": 40,
            "life": 2.5,
            "velocity": 1.2,
            "direction": [0.0, 1.0, 0.0],
            "range": [0.5, 0.0, 0.5],
            "step": 0.05,
            "frameColors": [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 0.0]]
        });

        let sys: ParticleSystem = serde_json::from_value(value).expect("parse particle system");
        assert_eq!(sys.archetype, ParticleArchetype::Snow);
        assert_eq!(sys.particle_count, 40);
        assert_eq!(sys.frame_colors.len(), 2);
        // Unspecified fields take defaults.
        assert_eq!(sys.delay_time, 0.0);
        assert!(sys.validate().is_ok());
    }

    #[test]
    fn archetype_roundtrip_and_fallback() {
        for index in 0..ParticleArchetype::COUNT as i32 {
            assert_eq!(ParticleArchetype::from_index(index).index(), index);
        }
        // Unknown tags degrade to Normal rather than failing to parse.
        assert_eq!(
            ParticleArchetype::from_index(99),
            ParticleArchetype::Normal
        );
        let sys: ParticleSystem = serde_json::from_value(json!({ "type": -3 })).unwrap();
        assert_eq!(sys.archetype, ParticleArchetype::Normal);
    }

    #[test]
    fn sub_effect_validation_catches_mismatched_arrays() {
        let sub = SubEffect {
            frame_count: 2,
            frame_times: vec![0.1, 0.2],
            frame_sizes: vec![[1.0, 1.0, 1.0]; 2],
            frame_angles: vec![[0.0; 3]; 2],
            frame_positions: vec![[0.0; 3]; 2],
            frame_colors: vec![[1.0; 4]; 3],
            ..Default::default()
        };
        let err = sub.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::FrameArrayMismatch {
                array: "frameColors",
                ..
            }
        ));
    }

    #[test]
    fn sub_effect_allows_empty_frame_times() {
        let sub = SubEffect {
            frame_count: 2,
            frame_sizes: vec![[1.0; 3]; 2],
            frame_angles: vec![[0.0; 3]; 2],
            frame_positions: vec![[0.0; 3]; 2],
            frame_colors: vec![[1.0; 4]; 2],
            ..Default::default()
        };
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn particle_system_validation_bounds() {
        let mut sys = ParticleSystem {
            particle_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            sys.validate(),
            Err(ModelError::ParticleCountOutOfRange(0))
        ));

        sys.particle_count = 101;
        assert!(sys.validate().is_err());

        sys.particle_count = 100;
        sys.life = 0.0;
        assert!(matches!(sys.validate(), Err(ModelError::NonPositiveLife(_))));

        sys.life = 1.0;
        sys.step = -0.1;
        assert!(matches!(sys.validate(), Err(ModelError::NonPositiveStep(_))));

        sys.step = 0.1;
        assert!(sys.validate().is_ok());
    }

    #[test]
    fn effect_serde_roundtrip() {
        let effect = Effect {
            name: "wind01".into(),
            rotating: true,
            rota_vec: [0.0, 1.0, 0.0],
            rota_vel: 2.0,
            sub_effects: vec![SubEffect {
                name: "layer0".into(),
                frame_count: 1,
                frame_times: vec![0.5],
                frame_sizes: vec![[2.0, 2.0, 1.0]],
                frame_angles: vec![[0.0; 3]],
                frame_positions: vec![[0.0; 3]],
                frame_colors: vec![[1.0, 0.5, 0.25, 1.0]],
                ..Default::default()
            }],
            ..Default::default()
        };

        let text = serde_json::to_string(&effect).unwrap();
        assert!(text.contains("subEffects"), "camelCase keys expected: {text}");
        let back: Effect = serde_json::from_str(&text).unwrap();
        assert_eq!(back.sub_effects.len(), 1);
        assert_eq!(back.sub_effects[0].frame_colors[0], [1.0, 0.5, 0.25, 1.0]);
        assert!(back.rotating);
    }
}
