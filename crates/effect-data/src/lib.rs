pub mod model;

pub use model::{Effect, ModelError, ParticleArchetype, ParticleSystem, SubEffect};
