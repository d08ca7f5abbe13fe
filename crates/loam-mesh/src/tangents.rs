//! Smooth per-vertex normals and tangents for indexed triangle meshes.
//!
//! Face normals are accumulated unnormalised, so larger triangles weigh more,
//! then normalised per vertex. Tangents follow the UV gradient of each
//! triangle and are Gram-Schmidt orthogonalised against the final normal.
//!
//! Front faces wind clockwise when viewed from +Z, which is the order the
//! grid pattern in [`crate::indices`] emits. Flat terrain therefore gets
//! `+Z` normals and `+X` tangents.

use glam::{Vec2, Vec3, Vec4};

/// Reusable output and scratch storage for normal/tangent derivation.
#[derive(Debug, Default, Clone)]
pub struct TangentBuffers {
    /// One unit normal per vertex.
    pub normals: Vec<Vec3>,
    /// One unit tangent per vertex; `w` is the bitangent sign (±1).
    pub tangents: Vec<Vec4>,
    tangent_sums: Vec<Vec3>,
    bitangent_sums: Vec<Vec3>,
}

impl TangentBuffers {
    /// Allocate buffers for meshes of up to `vertex_count` vertices.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            normals: Vec::with_capacity(vertex_count),
            tangents: Vec::with_capacity(vertex_count),
            tangent_sums: Vec::with_capacity(vertex_count),
            bitangent_sums: Vec::with_capacity(vertex_count),
        }
    }

    fn reset(&mut self, vertex_count: usize) {
        for buf in [
            &mut self.normals,
            &mut self.tangent_sums,
            &mut self.bitangent_sums,
        ] {
            buf.clear();
            buf.resize(vertex_count, Vec3::ZERO);
        }
        self.tangents.clear();
        self.tangents.resize(vertex_count, Vec4::ZERO);
    }
}

/// Derive smooth normals and tangents into `out`.
///
/// `positions` and `uvs` must have the same length and every index must
/// address a vertex in them.
pub fn compute_normals_and_tangents(
    positions: &[Vec3],
    indices: &[u32],
    uvs: &[Vec2],
    out: &mut TangentBuffers,
) {
    debug_assert_eq!(positions.len(), uvs.len());
    out.reset(positions.len());

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);

        let face_normal = (p2 - p0).cross(p1 - p0);
        for i in [i0, i1, i2] {
            out.normals[i] += face_normal;
        }

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let d1 = uvs[i1] - uvs[i0];
        let d2 = uvs[i2] - uvs[i0];
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = det.recip();
        let tangent = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent = (e2 * d1.x - e1 * d2.x) * r;
        for i in [i0, i1, i2] {
            out.tangent_sums[i] += tangent;
            out.bitangent_sums[i] += bitangent;
        }
    }

    for i in 0..positions.len() {
        let normal = out.normals[i].try_normalize().unwrap_or(Vec3::Z);
        out.normals[i] = normal;

        let t = out.tangent_sums[i];
        let tangent = (t - normal * normal.dot(t))
            .try_normalize()
            .unwrap_or_else(|| normal.any_orthonormal_vector());
        let handedness = if normal.cross(tangent).dot(out.bitangent_sums[i]) < 0.0 {
            -1.0
        } else {
            1.0
        };
        out.tangents[i] = tangent.extend(handedness);
    }
}
