//! Vertex probes that keep an object from growing into the geometry around it.
//!
//! Every face of the object's bounding cube sends four short rays outward from
//! its corners. A face is blocked when any of its rays hits static geometry.
//! Growth is vetoed only when two opposite faces are blocked at once, so an
//! object resting against one wall may still grow away from it.

use crate::beam::world::{ColliderAccess, RayCaster, TraceChannel};
use fyrox::{
    core::{algebra::Vector3, pool::Handle},
    scene::node::Node,
};

/// Probe ray length relative to the cube half extent.
const PROBE_LENGTH_FACTOR: f32 = 0.25;

/// Outward probe direction of every face, opposite faces are adjacent.
const FACES: [(usize, f32); 6] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

/// Blocked flags in `+X, -X, +Y, -Y, +Z, -Z` order.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FaceProbes {
    pub blocked: [bool; 6],
}

impl FaceProbes {
    pub fn is_squeezed(&self) -> bool {
        self.blocked
            .chunks_exact(2)
            .any(|pair| pair[0] && pair[1])
    }
}

/// Corners of the cube face with outward normal `sign * e[axis]`.
fn face_corners(axis: usize, sign: f32, half_extent: f32) -> [Vector3<f32>; 4] {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)].map(|(su, sv)| {
        let mut corner = Vector3::zeros();
        corner[axis] = sign * half_extent;
        corner[u] = su * half_extent;
        corner[v] = sv * half_extent;
        corner
    })
}

/// Runs all 24 probes around `target`. Returns `None` if the target is gone.
pub fn probe_faces<W>(world: &W, target: Handle<Node>) -> Option<FaceProbes>
where
    W: RayCaster + ColliderAccess + ?Sized,
{
    let center = world.world_location(target)?;
    let rotation = world.world_rotation(target)?;
    // The cube is inscribed in the bounding sphere.
    let half_extent = world.bounding_sphere_radius(target)? / 3.0f32.sqrt();
    let probe_length = half_extent * PROBE_LENGTH_FACTOR;
    let ignore = [target];

    let mut probes = FaceProbes::default();
    for (blocked, &(axis, sign)) in probes.blocked.iter_mut().zip(FACES.iter()) {
        let mut normal = Vector3::zeros();
        normal[axis] = sign;
        let direction = rotation * normal;

        // Every corner is probed even after a hit, the probe count stays fixed.
        for corner in face_corners(axis, sign, half_extent) {
            let begin = center + rotation * corner;
            let end = begin + direction.scale(probe_length);
            if world
                .trace(begin, end, TraceChannel::WorldStatic, &ignore)
                .is_some()
            {
                *blocked = true;
            }
        }
    }

    Some(probes)
}

/// `true` if growing `target` would push it into the surrounding geometry.
pub fn would_collide_on_scale_up<W>(world: &W, target: Handle<Node>) -> bool
where
    W: RayCaster + ColliderAccess + ?Sized,
{
    probe_faces(world, target).is_some_and(|probes| probes.is_squeezed())
}
