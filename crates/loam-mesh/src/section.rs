//! Borrowed view of a finished chunk mesh, as submitted to a mesh sink.

use glam::{Vec2, Vec3, Vec4};

/// Reasons a [`MeshSection`] cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// Per-vertex buffers disagree on the vertex count.
    #[error("per-vertex buffers disagree: {positions} positions, {normals} normals, {uvs} uvs, {tangents} tangents")]
    MismatchedAttributes {
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
        /// Number of UVs.
        uvs: usize,
        /// Number of tangents.
        tangents: usize,
    },
    /// The index buffer is not a whole number of triangles.
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    /// An index addresses a vertex past the end of the vertex buffer.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value.
        index: u32,
        /// Number of vertices in the section.
        vertex_count: usize,
    },
}

/// Vertex, index, normal, UV and tangent buffers for one mesh section.
///
/// The slices borrow the generator's scratch buffers; a sink that needs the
/// data beyond the call must copy it.
#[derive(Debug, Clone, Copy)]
pub struct MeshSection<'a> {
    /// Chunk-local vertex positions.
    pub positions: &'a [Vec3],
    /// Triangle list indices.
    pub indices: &'a [u32],
    /// Unit normals, one per vertex.
    pub normals: &'a [Vec3],
    /// Texture coordinates, one per vertex.
    pub uvs: &'a [Vec2],
    /// Tangents with bitangent sign in `w`, one per vertex.
    pub tangents: &'a [Vec4],
}

impl MeshSection<'_> {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check buffer lengths and index bounds.
    pub fn validate(&self) -> Result<(), SectionError> {
        let positions = self.positions.len();
        if self.normals.len() != positions
            || self.uvs.len() != positions
            || self.tangents.len() != positions
        {
            return Err(SectionError::MismatchedAttributes {
                positions,
                normals: self.normals.len(),
                uvs: self.uvs.len(),
                tangents: self.tangents.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(SectionError::PartialTriangle(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= positions) {
            return Err(SectionError::IndexOutOfRange {
                index,
                vertex_count: positions,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> (Vec<Vec3>, Vec<Vec3>, Vec<Vec2>, Vec<Vec4>) {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
        let normals = vec![Vec3::Z; 4];
        let uvs = vec![Vec2::ZERO; 4];
        let tangents = vec![Vec4::X; 4];
        (positions, normals, uvs, tangents)
    }

    #[test]
    fn test_valid_section() {
        let (p, n, uv, t) = quad();
        let indices = [0, 2, 1, 1, 2, 3];
        let section = MeshSection {
            positions: &p,
            indices: &indices,
            normals: &n,
            uvs: &uv,
            tangents: &t,
        };
        assert_eq!(section.validate(), Ok(()));
        assert_eq!(section.vertex_count(), 4);
        assert_eq!(section.triangle_count(), 2);
    }

    #[test]
    fn test_index_out_of_range() {
        let (p, n, uv, t) = quad();
        let indices = [0, 2, 4];
        let section = MeshSection {
            positions: &p,
            indices: &indices,
            normals: &n,
            uvs: &uv,
            tangents: &t,
        };
        assert_eq!(
            section.validate(),
            Err(SectionError::IndexOutOfRange {
                index: 4,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn test_mismatched_attributes() {
        let (p, n, _, t) = quad();
        let uvs = vec![Vec2::ZERO; 3];
        let section = MeshSection {
            positions: &p,
            indices: &[],
            normals: &n,
            uvs: &uvs,
            tangents: &t,
        };
        assert!(matches!(
            section.validate(),
            Err(SectionError::MismatchedAttributes { uvs: 3, .. })
        ));
    }

    #[test]
    fn test_partial_triangle() {
        let (p, n, uv, t) = quad();
        let section = MeshSection {
            positions: &p,
            indices: &[0, 1],
            normals: &n,
            uvs: &uv,
            tangents: &t,
        };
        assert_eq!(section.validate(), Err(SectionError::PartialTriangle(2)));
    }
}
