//! Real-time playback engine for authored visual effects.
//!
//! [`effect_data`] holds the serialized effect model, [`effect_core`] the
//! pure sampling and simulation routines, and this crate ties them into a
//! stateful [`EffectPlayer`] that a renderer drives once per frame.

pub mod player;

pub use effect_core::{
    build_ribbon, path_position, sample_frame, sample_uv_frame, tex_list_frame_index,
    FrameSample, ParticlePool, PolylineMeasure, RibbonMesh, UvSample, MAX_PARTICLES,
};
pub use effect_data::{Effect, ModelError, ParticleArchetype, ParticleSystem, SubEffect};
pub use player::EffectPlayer;
