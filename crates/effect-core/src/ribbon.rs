//! Quad-strip ribbon geometry stretched between two anchor points.
//!
//! Ribbons render as a flat strip whose width is the distance between the
//! anchors and whose length extends backwards from their midpoint. The
//! host owns texturing and transforms; this module only emits positions
//! and triangle indices.

use glam::Vec3;

/// The strip extends along this axis from the anchor midpoint.
const BACK_AXIS: Vec3 = Vec3::NEG_Z;

/// Side direction used when the two anchors coincide.
const SIDE_FALLBACK: Vec3 = Vec3::X;

/// Triangle-list mesh for one ribbon.
#[derive(Debug, Clone, Default)]
pub struct RibbonMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub vertex_count: usize,
}

/// Build a ribbon between anchors `a` and `b`, reaching `max_len` units
/// back from their midpoint.
///
/// The strip is split into one ring per unit of length (at least two), so
/// hosts can bend or fade it per ring later.
pub fn build_ribbon(a: Vec3, b: Vec3, max_len: f32) -> RibbonMesh {
    let segments = (max_len.round() as i32).max(2) as usize;
    let width = a.distance(b);
    let mid = (a + b) * 0.5;
    let side = (b - a).try_normalize().unwrap_or(SIDE_FALLBACK);
    let half = side * (width * 0.5);

    let mut positions = Vec::with_capacity((segments + 1) * 2);
    for ring in 0..=segments {
        let along = max_len * ring as f32 / segments as f32;
        let center = mid + BACK_AXIS * along;
        positions.push(center - half);
        positions.push(center + half);
    }

    let mut indices = Vec::with_capacity(segments * 6);
    for ring in 0..segments {
        let base = (ring * 2) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }

    let vertex_count = positions.len();
    RibbonMesh {
        positions,
        indices,
        vertex_count,
    }
}
