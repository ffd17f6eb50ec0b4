//! Keyframe interpolation for authored sub-effect layers.
//!
//! A layer carries up to three periodic sub-systems, each on its own clock
//! derived from the same elapsed time: the pose keyframes (size, rotation,
//! position, color), the flipbook texture cycle, and the per-vertex UV
//! cycle. Their cycle lengths are unrelated, so none of them stay in phase
//! with the others.

use effect_data::model::SubEffect;
use glam::{Vec3, Vec4};

/// Floor applied to every pose keyframe duration. Authored zero or negative
/// frame times collapse to one frame at 30 fps instead of producing a
/// zero-length cycle.
pub const MIN_FRAME_TIME: f32 = 1.0 / 30.0;

/// Interpolated pose of a keyframed layer at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    pub size: Vec3,
    pub angle: Vec3,
    pub position: Vec3,
    pub color: Vec4,
    pub frame_index: usize,
    pub next_frame_index: usize,
    /// Interpolation fraction between the two frames, in [0, 1).
    pub lerp: f32,
    /// Current flipbook frame, 0 when the layer has no flipbook cycle.
    pub tex_frame_index: usize,
}

impl FrameSample {
    /// Neutral pose returned for degenerate layers (no frames or a
    /// non-positive total duration).
    pub fn identity() -> Self {
        Self {
            size: Vec3::ONE,
            angle: Vec3::ZERO,
            position: Vec3::ZERO,
            color: Vec4::ONE,
            frame_index: 0,
            next_frame_index: 0,
            lerp: 0.0,
            tex_frame_index: 0,
        }
    }
}

/// Interpolated per-vertex UV set for layers with animated coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct UvSample {
    pub frame_index: usize,
    pub next_frame_index: usize,
    pub lerp: f32,
    /// One (u, v) pair per vertex, already interpolated.
    pub coords: Vec<[f32; 2]>,
}

fn frame_duration(sub: &SubEffect, index: usize) -> f32 {
    if sub.frame_times.is_empty() {
        return MIN_FRAME_TIME;
    }
    sub.frame_times
        .get(index)
        .copied()
        .unwrap_or(MIN_FRAME_TIME)
        .max(MIN_FRAME_TIME)
}

/// Normalize elapsed time against one cycle: wrap (always non-negative)
/// when looping, clamp to [0, total] otherwise.
fn wrap_time(elapsed: f32, total: f32, looping: bool) -> f32 {
    if looping {
        ((elapsed % total) + total) % total
    } else {
        elapsed.clamp(0.0, total)
    }
}

fn lerp_vec3(frames: &[[f32; 3]], a: usize, b: usize, t: f32, default: Vec3) -> Vec3 {
    let va = frames.get(a).map(|v| Vec3::from(*v)).unwrap_or(default);
    let vb = frames.get(b).map(|v| Vec3::from(*v)).unwrap_or(va);
    va.lerp(vb, t)
}

fn lerp_vec4(frames: &[[f32; 4]], a: usize, b: usize, t: f32, default: Vec4) -> Vec4 {
    let va = frames.get(a).map(|v| Vec4::from(*v)).unwrap_or(default);
    let vb = frames.get(b).map(|v| Vec4::from(*v)).unwrap_or(va);
    va.lerp(vb, t)
}

/// Compute the interpolated pose of `sub` at `elapsed` seconds.
///
/// Looping wraps elapsed time over the layer's total duration; otherwise it
/// clamps, holding the last keyframe forever. Degenerate layers return
/// [`FrameSample::identity`].
pub fn sample_frame(sub: &SubEffect, elapsed: f32, looping: bool) -> FrameSample {
    let count = sub.frame_count;
    if count == 0 {
        return FrameSample::identity();
    }
    let total: f32 = (0..count).map(|i| frame_duration(sub, i)).sum();
    if total <= 0.0 {
        return FrameSample::identity();
    }

    let t = wrap_time(elapsed, total, looping);

    // Walk cumulative durations for the frame containing `t`. When `t`
    // lands at or past the total (non-looping), hold the last frame.
    let mut frame_index = count - 1;
    let mut lerp = 0.0;
    let mut cumulative = 0.0;
    for i in 0..count {
        let duration = frame_duration(sub, i);
        if t < cumulative + duration {
            frame_index = i;
            lerp = if duration > 0.0 {
                (t - cumulative) / duration
            } else {
                0.0
            };
            break;
        }
        cumulative += duration;
    }

    let next_frame_index = if looping {
        (frame_index + 1) % count
    } else {
        (frame_index + 1).min(count - 1)
    };

    FrameSample {
        size: lerp_vec3(&sub.frame_sizes, frame_index, next_frame_index, lerp, Vec3::ONE),
        angle: lerp_vec3(&sub.frame_angles, frame_index, next_frame_index, lerp, Vec3::ZERO),
        position: lerp_vec3(
            &sub.frame_positions,
            frame_index,
            next_frame_index,
            lerp,
            Vec3::ZERO,
        ),
        color: lerp_vec4(&sub.frame_colors, frame_index, next_frame_index, lerp, Vec4::ONE),
        frame_index,
        next_frame_index,
        lerp,
        tex_frame_index: flipbook_index(sub, elapsed, looping),
    }
}

/// Current flipbook frame. Runs on its own cycle of
/// `frame_tex_time * frame_tex_names.len()`, unrelated to the pose clock.
fn flipbook_index(sub: &SubEffect, elapsed: f32, looping: bool) -> usize {
    let count = sub.frame_tex_names.len();
    if count <= 1 || sub.frame_tex_time <= 0.0 {
        return 0;
    }
    let cycle = sub.frame_tex_time * count as f32;
    let t = wrap_time(elapsed, cycle, looping);
    ((t / sub.frame_tex_time) as usize).min(count - 1)
}

/// Interpolate the animated per-vertex UV coordinates of `sub` at `elapsed`.
///
/// Only applicable when the layer has at least one coordinate frame and a
/// positive `coord_frame_time`; returns `None` otherwise, and also when the
/// current or next frame data is missing.
pub fn sample_uv_frame(sub: &SubEffect, elapsed: f32, looping: bool) -> Option<UvSample> {
    let count = sub.coord_list.len();
    if count == 0 || sub.coord_frame_time <= 0.0 {
        return None;
    }

    let cycle = sub.coord_frame_time * count as f32;
    let t = wrap_time(elapsed, cycle, looping);
    let raw = t / sub.coord_frame_time;
    let frame_index = (raw as usize).min(count - 1);
    let lerp = raw - raw.floor();
    let next_frame_index = if looping {
        (frame_index + 1) % count
    } else {
        (frame_index + 1).min(count - 1)
    };

    let current = sub.coord_list.get(frame_index)?;
    let next = sub.coord_list.get(next_frame_index)?;

    let coords = current
        .iter()
        .zip(next.iter())
        .map(|(a, b)| [a[0] + (b[0] - a[0]) * lerp, a[1] + (b[1] - a[1]) * lerp])
        .collect();

    Some(UvSample {
        frame_index,
        next_frame_index,
        lerp,
        coords,
    })
}

/// Current frame of the texture-coordinate list cycle. Snaps by floor
/// division, no interpolation. `None` when the layer has no such cycle.
pub fn tex_list_frame_index(sub: &SubEffect, elapsed: f32, looping: bool) -> Option<usize> {
    let count = sub.tex_list.len();
    if count == 0 || sub.tex_frame_time <= 0.0 {
        return None;
    }
    let cycle = sub.tex_frame_time * count as f32;
    let t = wrap_time(elapsed, cycle, looping);
    Some(((t / sub.tex_frame_time) as usize).min(count - 1))
}
