//! Stateful playback wrapper around the pure sampling core.

use effect_core::{path_position, sample_frame, FrameSample, ParticlePool};
use effect_data::{Effect, ParticleSystem};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Drives one loaded [`Effect`] through time.
///
/// The player owns the playback clock, the whole-effect spin, and one
/// particle pool per attached particle system. A renderer calls
/// [`advance`](Self::advance) once per frame and then reads samples and
/// pool state to build draw data.
pub struct EffectPlayer {
    effect: Effect,
    emitters: Vec<(ParticleSystem, ParticlePool)>,
    elapsed: f32,
    spin: f32,
    rng: StdRng,
}

impl EffectPlayer {
    pub fn new(effect: Effect) -> Self {
        Self::with_seed(effect, rand::random())
    }

    /// Seeded constructor for reproducible playback.
    pub fn with_seed(effect: Effect, seed: u64) -> Self {
        Self {
            effect,
            emitters: Vec::new(),
            elapsed: 0.0,
            spin: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Seconds of playback since construction or the last reset.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Replace the attached particle systems, resetting their pools.
    pub fn set_particle_systems(&mut self, systems: Vec<ParticleSystem>) {
        self.emitters = systems
            .into_iter()
            .map(|system| {
                let mut pool = ParticlePool::new();
                pool.reset();
                (system, pool)
            })
            .collect();
    }

    /// Advance playback by `delta` seconds. Returns the total number of
    /// particles spawned across all emitters this frame.
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.elapsed += delta;
        if self.effect.rotating {
            self.spin += self.effect.rota_vel * delta;
        }

        let mut spawned = 0;
        for (system, pool) in &mut self.emitters {
            spawned += pool.tick(system, delta, &mut self.rng);
        }
        spawned
    }

    /// Whole-effect rotation accumulated so far.
    ///
    /// Identity while the effect is not rotating or its axis is zero.
    pub fn rotation(&self) -> Quat {
        if !self.effect.rotating {
            return Quat::IDENTITY;
        }
        let Some(axis) = Vec3::from_array(self.effect.rota_vec).try_normalize() else {
            return Quat::IDENTITY;
        };
        Quat::from_axis_angle(axis, self.spin)
    }

    /// Sample one keyframed layer at the current clock.
    pub fn sample_layer(&self, index: usize, looping: bool) -> Option<FrameSample> {
        let sub = self.effect.sub_effects.get(index)?;
        Some(sample_frame(sub, self.elapsed, looping))
    }

    /// Sample every layer at the current clock.
    pub fn sample_layers(&self, looping: bool) -> Vec<FrameSample> {
        self.effect
            .sub_effects
            .iter()
            .map(|sub| sample_frame(sub, self.elapsed, looping))
            .collect()
    }

    /// Position along an attached motion path at the current clock, or the
    /// origin when the effect does not follow a path.
    pub fn path_offset(&self, points: &[Vec3], velocity: f32, looping: bool) -> Vec3 {
        if !self.effect.use_path {
            return Vec3::ZERO;
        }
        path_position(points, self.elapsed, velocity, looping)
    }

    /// Attached particle systems and their pool state.
    pub fn pools(&self) -> impl Iterator<Item = (&ParticleSystem, &ParticlePool)> {
        self.emitters.iter().map(|(system, pool)| (system, pool))
    }

    /// Rewind the clock and kill every particle.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.spin = 0.0;
        for (_, pool) in &mut self.emitters {
            pool.reset();
        }
    }
}
