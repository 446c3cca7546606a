//! CPU tessellation for the vector primitives.
//!
//! wgpu has no triangle-fan topology, so every fan here is a list of points
//! (anchor first) that [`fan_indices`] turns into a triangle list.

use glam::{Mat4, Vec3};
use lot_core::canvas::ImageQuad;

pub const CIRCLE_SEGMENTS: u32 = 360;
pub const TIMER_SEGMENTS: u32 = 1000;
pub const TIMER_GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const TIMER_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

const START_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

/// Triangles `(0, i, i + 1)` for a fan of `vertex_count` points starting at
/// `base`. Fewer than three points produce no triangles.
pub fn fan_indices(base: u32, vertex_count: u32) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [base, base + i, base + i + 1])
        .collect()
}

pub fn rectangle_fan(x: f32, y: f32, width: f32, height: f32) -> [[f32; 2]; 4] {
    [
        [x, y],
        [x + width, y],
        [x + width, y + height],
        [x, y + height],
    ]
}

fn rim_point(cx: f32, cy: f32, radius: f32, step: u32, segments: u32) -> [f32; 2] {
    let angle = START_ANGLE + step as f32 * std::f32::consts::TAU / segments as f32;
    [cx + angle.cos() * radius, cy + angle.sin() * radius]
}

/// Centre plus `CIRCLE_SEGMENTS + 1` rim points, starting at the top.
pub fn circle_fan(cx: f32, cy: f32, radius: f32) -> Vec<[f32; 2]> {
    std::iter::once([cx, cy])
        .chain((0..=CIRCLE_SEGMENTS).map(|i| rim_point(cx, cy, radius, i, CIRCLE_SEGMENTS)))
        .collect()
}

/// Rim step where the green (remaining) arc hands over to the red one.
pub fn timer_split(elapsed_fraction: f32) -> u32 {
    let remaining = 1.0 - elapsed_fraction.clamp(0.0, 1.0);
    ((TIMER_SEGMENTS as f32 * remaining).floor() as u32).min(TIMER_SEGMENTS)
}

/// The (green, red) fans of the timer pie. Both are anchored at the centre
/// and share the split spoke, so together they tile the full circle.
pub fn timer_fans(
    cx: f32,
    cy: f32,
    radius: f32,
    elapsed_fraction: f32,
) -> (Vec<[f32; 2]>, Vec<[f32; 2]>) {
    let split = timer_split(elapsed_fraction);
    let arc = |steps: std::ops::RangeInclusive<u32>| -> Vec<[f32; 2]> {
        std::iter::once([cx, cy])
            .chain(steps.map(|i| rim_point(cx, cy, radius, i, TIMER_SEGMENTS)))
            .collect()
    };
    (arc(0..=split), arc(split..=TIMER_SEGMENTS))
}

/// Model matrix of a textured quad: the unit square scaled to the quad's
/// size, turned about the quad's centre, placed at its position.
pub fn image_model(quad: &ImageQuad) -> Mat4 {
    let half = Vec3::new(quad.width * 0.5, quad.height * 0.5, 0.0);
    Mat4::from_translation(Vec3::new(quad.x, quad.y, 0.0) + half)
        * Mat4::from_rotation_z(quad.rotation_deg.to_radians())
        * Mat4::from_translation(-half)
        * Mat4::from_scale(Vec3::new(quad.width, quad.height, 1.0))
}

/// Corners of the transformed unit square in fan order: (0,0), (1,0),
/// (1,1), (0,1).
pub fn image_quad_corners(quad: &ImageQuad) -> [[f32; 2]; 4] {
    let model = image_model(quad);
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]].map(|[u, v]| {
        let p = model.transform_point3(Vec3::new(u, v, 0.0));
        [p.x, p.y]
    })
}
