//! Interleaved vertex format for uploading a [`MeshSection`] in one buffer.

use crate::section::MeshSection;

/// One interleaved terrain vertex, laid out for direct GPU upload.
///
/// Layout (48 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]`
///   - `[24..32]` uv `[f32; 2]`
///   - `[32..48]` tangent `[f32; 4]`, `w` = bitangent sign
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    /// Chunk-local position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Tangent and handedness.
    pub tangent: [f32; 4],
}

static_assertions::assert_eq_size!(TerrainVertex, [u8; 48]);

/// Interleave the section's attribute streams into `out`, reusing its allocation.
///
/// The section is expected to have passed [`MeshSection::validate`].
pub fn interleave(section: &MeshSection<'_>, out: &mut Vec<TerrainVertex>) {
    out.clear();
    out.reserve(section.vertex_count());
    out.extend(
        section
            .positions
            .iter()
            .zip(section.normals)
            .zip(section.uvs)
            .zip(section.tangents)
            .map(|(((p, n), uv), t)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
                tangent: t.to_array(),
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3, Vec4};

    #[test]
    fn test_interleave_preserves_attributes() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        let normals = [Vec3::Z, Vec3::Y];
        let uvs = [Vec2::new(0.5, 0.25), Vec2::ONE];
        let tangents = [Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 1.0, -1.0)];
        let section = MeshSection {
            positions: &positions,
            indices: &[],
            normals: &normals,
            uvs: &uvs,
            tangents: &tangents,
        };

        let mut out = Vec::new();
        interleave(&section, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(out[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(out[0].uv, [0.5, 0.25]);
        assert_eq!(out[1].tangent[3], -1.0);
    }

    #[test]
    fn test_byte_view_length() {
        let vertices = vec![<TerrainVertex as bytemuck::Zeroable>::zeroed(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 3 * 48);
    }
}
