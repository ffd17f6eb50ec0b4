//! Constant-velocity traversal of authored motion paths.
//!
//! Effect paths are plain polylines loaded by the surrounding editor. The
//! sampler walks them at constant world-space speed, wrapping or clamping
//! at the end the same way the keyframe clock does.

use glam::Vec3;

/// Precomputed per-segment lengths for one polyline.
///
/// Hosts that sample the same path every frame can keep one of these around
/// instead of re-measuring through [`path_position`].
#[derive(Debug, Clone)]
pub struct PolylineMeasure {
    points: Vec<Vec3>,
    lengths: Vec<f32>,
    total: f32,
}

impl PolylineMeasure {
    pub fn new(points: &[Vec3]) -> Self {
        let lengths: Vec<f32> = points.windows(2).map(|w| w[0].distance(w[1])).collect();
        let total = lengths.iter().sum();
        Self {
            points: points.to_vec(),
            lengths,
            total,
        }
    }

    /// Total path length.
    pub fn length(&self) -> f32 {
        self.total
    }

    /// Position at `distance` along the path.
    ///
    /// Degenerate paths return their first point (or the origin when
    /// empty); a distance past the end returns the last point.
    pub fn position_at(&self, distance: f32) -> Vec3 {
        let Some(&first) = self.points.first() else {
            return Vec3::ZERO;
        };
        if self.points.len() < 2 || self.total <= 0.0 {
            return first;
        }

        let mut walked = 0.0;
        for (i, &length) in self.lengths.iter().enumerate() {
            if distance <= walked + length {
                let t = if length > 0.0 {
                    (distance - walked) / length
                } else {
                    0.0
                };
                return self.points[i].lerp(self.points[i + 1], t);
            }
            walked += length;
        }

        // Float rounding can push the walk past every segment.
        self.points[self.points.len() - 1]
    }

    /// Position after traveling at `velocity` for `elapsed` seconds,
    /// wrapping over the path when looping and clamping at the end
    /// otherwise.
    pub fn position_at_time(&self, elapsed: f32, velocity: f32, looping: bool) -> Vec3 {
        let Some(&first) = self.points.first() else {
            return Vec3::ZERO;
        };
        if self.points.len() < 2 || velocity <= 0.0 || self.total <= 0.0 {
            return first;
        }

        let distance = elapsed * velocity;
        let distance = if looping {
            ((distance % self.total) + self.total) % self.total
        } else {
            distance.clamp(0.0, self.total)
        };
        self.position_at(distance)
    }
}

/// One-shot convenience over [`PolylineMeasure`] for hosts that do not keep
/// the measurement cached.
pub fn path_position(points: &[Vec3], elapsed: f32, velocity: f32, looping: bool) -> Vec3 {
    if points.len() < 2 || velocity <= 0.0 {
        return points.first().copied().unwrap_or(Vec3::ZERO);
    }
    PolylineMeasure::new(points).position_at_time(elapsed, velocity, looping)
}
