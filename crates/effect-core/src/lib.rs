//! Sampling and simulation core for effect playback.
//!
//! Everything here is driven by a host render loop that supplies elapsed
//! time (for the stateless samplers) or a per-frame delta (for the particle
//! pool). The core never performs I/O and never raises fatal errors:
//! malformed or degenerate descriptions fall back to defined default
//! outputs, because numeric validation of user-authored values belongs to
//! the editing layer (see `effect_data::model`).

pub mod keyframe;
pub mod particles;
pub mod path;
pub mod ribbon;

pub use keyframe::{sample_frame, sample_uv_frame, tex_list_frame_index, FrameSample, UvSample};
pub use particles::{ParticlePool, MAX_PARTICLES};
pub use path::{path_position, PolylineMeasure};
pub use ribbon::{build_ribbon, RibbonMesh};
