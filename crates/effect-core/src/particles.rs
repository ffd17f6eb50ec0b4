//! Fixed-capacity particle pool with scheduled emission.
//!
//! The pool is structure-of-arrays over a hard cap of [`MAX_PARTICLES`]
//! slots. Emission is driven by a time accumulator so spawn cadence is
//! independent of the host's frame rate, and dead slots are recycled by a
//! linear scan. Randomness is injected so hosts (and tests) control the
//! seed.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use effect_data::{ParticleArchetype, ParticleSystem};
use glam::{Vec3, Vec4};
use rand::Rng;

/// Hard cap on live particles per emitter.
pub const MAX_PARTICLES: usize = 100;

/// Lateral spread factor for fire-style emitters.
const FIRE_SPREAD: f32 = 0.3;

/// Warn once per offending count, not once per frame.
fn warn_capacity_once(requested: u32) {
    static WARNED: OnceLock<Mutex<HashSet<u32>>> = OnceLock::new();
    let warned = WARNED.get_or_init(|| Mutex::new(HashSet::new()));
    if let Ok(mut seen) = warned.lock() {
        if seen.insert(requested) {
            eprintln!(
                "[effect-core] particle count {requested} exceeds pool capacity {MAX_PARTICLES}, clamping"
            );
        }
    }
}

/// Uniform jitter in `[-extent, extent]`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * extent
}

/// Sample a per-lifetime keyframe track at fraction `t` in `[0, 1]`.
fn sample_vec3(frames: &[[f32; 3]], t: f32) -> Vec3 {
    match frames.len() {
        0 => Vec3::ONE,
        1 => Vec3::from_array(frames[0]),
        len => {
            let raw = t.clamp(0.0, 1.0) * (len - 1) as f32;
            let index = (raw as usize).min(len - 2);
            let frac = raw - index as f32;
            Vec3::from_array(frames[index]).lerp(Vec3::from_array(frames[index + 1]), frac)
        }
    }
}

fn sample_color(frames: &[[f32; 4]], t: f32) -> Vec4 {
    match frames.len() {
        0 => Vec4::ONE,
        1 => Vec4::from_array(frames[0]),
        len => {
            let raw = t.clamp(0.0, 1.0) * (len - 1) as f32;
            let index = (raw as usize).min(len - 2);
            let frac = raw - index as f32;
            Vec4::from_array(frames[index]).lerp(Vec4::from_array(frames[index + 1]), frac)
        }
    }
}

/// Structure-of-arrays particle state for one emitter.
///
/// All arrays are allocated at full capacity up front; `alive` marks which
/// slots hold a live particle. Hosts read the arrays directly when building
/// draw data.
#[derive(Debug)]
pub struct ParticlePool {
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    pub color: Vec<Vec4>,
    pub size: Vec<Vec3>,
    pub alpha: Vec<f32>,
    pub age: Vec<f32>,
    pub lifetime: Vec<f32>,
    pub seed: Vec<f32>,
    pub alive: Vec<bool>,
    count: usize,
    emit_accum: f32,
    elapsed: f32,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticlePool {
    pub fn new() -> Self {
        Self {
            position: vec![Vec3::ZERO; MAX_PARTICLES],
            velocity: vec![Vec3::ZERO; MAX_PARTICLES],
            color: vec![Vec4::ZERO; MAX_PARTICLES],
            size: vec![Vec3::ZERO; MAX_PARTICLES],
            alpha: vec![0.0; MAX_PARTICLES],
            age: vec![0.0; MAX_PARTICLES],
            lifetime: vec![0.0; MAX_PARTICLES],
            seed: vec![0.0; MAX_PARTICLES],
            alive: vec![false; MAX_PARTICLES],
            count: 0,
            emit_accum: 0.0,
            elapsed: 0.0,
        }
    }

    /// Kill every particle and rewind the emission clock. Colors reset to
    /// opaque white so a restarted emitter never flashes stale tint.
    pub fn reset(&mut self) {
        for i in 0..MAX_PARTICLES {
            self.position[i] = Vec3::ZERO;
            self.velocity[i] = Vec3::ZERO;
            self.color[i] = Vec4::ONE;
            self.size[i] = Vec3::ZERO;
            self.alpha[i] = 0.0;
            self.age[i] = 0.0;
            self.lifetime[i] = 0.0;
            self.seed[i] = 0.0;
            self.alive[i] = false;
        }
        self.count = 0;
        self.emit_accum = 0.0;
        self.elapsed = 0.0;
    }

    /// Number of live particles.
    pub fn count_alive(&self) -> usize {
        self.count
    }

    /// Time this pool has been ticked since the last reset.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Spawn one particle into the first dead slot, if any.
    ///
    /// Initial velocity depends on the system's archetype; everything else
    /// comes straight from the config plus positional jitter over `range`.
    pub fn spawn_particle<R: Rng + ?Sized>(
        &mut self,
        system: &ParticleSystem,
        rng: &mut R,
    ) -> bool {
        let Some(slot) = self.alive.iter().position(|&a| !a) else {
            return false;
        };

        let direction = Vec3::from_array(system.direction);
        let range = Vec3::from_array(system.range);
        let offset = Vec3::from_array(system.offset);
        let v = system.velocity;

        let mut position = offset
            + Vec3::new(
                jitter(rng, range.x),
                jitter(rng, range.y),
                jitter(rng, range.z),
            );

        let velocity = match system.archetype {
            ParticleArchetype::Fire => Vec3::new(
                direction.x * v + (rng.gen::<f32>() - 0.5) * FIRE_SPREAD * v,
                direction.y * v + rng.gen::<f32>() * 0.2 * v,
                direction.z * v + (rng.gen::<f32>() - 0.5) * FIRE_SPREAD * v,
            ),
            ParticleArchetype::Blast | ParticleArchetype::Blast2 | ParticleArchetype::Blast3 => {
                // Uniform direction over the sphere.
                let theta = rng.gen::<f32>() * std::f32::consts::TAU;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
                Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ) * v
            }
            ParticleArchetype::Snow => {
                Vec3::new(jitter(rng, 0.1), -v, jitter(rng, 0.1))
            }
            ParticleArchetype::Round => {
                let angle = rng.gen::<f32>() * std::f32::consts::TAU;
                let radius = 0.5 + rng.gen::<f32>() * 0.5;
                position += Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
                Vec3::new(-angle.sin() * v, direction.y * v * 0.1, angle.cos() * v)
            }
            ParticleArchetype::LineSingle => direction * v,
            _ => {
                direction * v
                    + Vec3::new(jitter(rng, 0.1), jitter(rng, 0.1), jitter(rng, 0.1))
            }
        };

        self.position[slot] = position;
        self.velocity[slot] = velocity;
        self.color[slot] = sample_color(&system.frame_colors, 0.0);
        self.size[slot] = sample_vec3(&system.frame_sizes, 0.0);
        self.alpha[slot] = self.color[slot].w;
        self.age[slot] = 0.0;
        self.lifetime[slot] = system.life;
        self.seed[slot] = rng.gen::<f32>();
        self.alive[slot] = true;
        self.count += 1;
        true
    }

    /// Age, integrate, and retire live particles over `delta` seconds.
    pub fn step_particles(&mut self, system: &ParticleSystem, delta: f32) {
        let acceleration = Vec3::from_array(system.acceleration);
        for i in 0..MAX_PARTICLES {
            if !self.alive[i] {
                continue;
            }

            self.age[i] += delta;
            if self.age[i] >= self.lifetime[i] {
                self.alive[i] = false;
                self.size[i] = Vec3::ZERO;
                self.alpha[i] = 0.0;
                self.count -= 1;
                continue;
            }

            self.velocity[i] += acceleration * delta;
            if system.archetype == ParticleArchetype::Snow {
                // Per-particle phase keeps flakes from swaying in lockstep.
                self.position[i].x +=
                    (self.age[i] * 3.0 + self.seed[i] * 10.0).sin() * 0.01;
            }
            self.position[i] += self.velocity[i] * delta;

            let t = self.age[i] / self.lifetime[i];
            self.color[i] = sample_color(&system.frame_colors, t);
            self.size[i] = sample_vec3(&system.frame_sizes, t);
            self.alpha[i] = self.color[i].w;
        }
    }

    /// Advance the emitter by `delta` seconds: emit on schedule, then step
    /// every live particle. Returns the number of particles spawned.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        system: &ParticleSystem,
        delta: f32,
        rng: &mut R,
    ) -> u32 {
        self.elapsed += delta;

        let capacity = (system.particle_count as usize).min(MAX_PARTICLES);
        if system.particle_count as usize > MAX_PARTICLES {
            warn_capacity_once(system.particle_count);
        }

        let past_delay = self.elapsed >= system.delay_time;
        let within_window =
            system.play_time <= 0.0 || self.elapsed <= system.delay_time + system.play_time;

        let mut spawned = 0;
        if past_delay && within_window && system.step > 0.0 {
            self.emit_accum += delta;
            while self.emit_accum >= system.step && self.count < capacity {
                if !self.spawn_particle(system, rng) {
                    break;
                }
                self.emit_accum -= system.step;
                spawned += 1;
            }
            // Cap the backlog so a long stall cannot flush out as a burst.
            self.emit_accum = self.emit_accum.min(system.step);
        }

        self.step_particles(system, delta);
        spawned
    }
}
