//! Mesh sink seam: where finished chunk meshes go, and how they are destroyed.
//!
//! The registry never holds render objects, only the opaque [`MeshHandle`]
//! a sink returns. [`MemorySink`] is the in-process implementation used by
//! the headless driver and tests; it copies each section into an interleaved
//! buffer and can enforce a byte budget.

use std::fmt;
use std::sync::Arc;

use loam_mesh::{MeshSection, SectionError, TerrainVertex, interleave};
use rustc_hash::FxHashMap;

/// Opaque handle to a mesh resource owned by a sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Name of the material a sink should bind to a mesh.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialRef(Arc<str>);

impl MaterialRef {
    /// Creates a material reference from its name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The material name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for MaterialRef {
    fn default() -> Self {
        Self::new("M_Terrain")
    }
}

/// Reasons a sink refuses to create a mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The submitted buffers are inconsistent.
    #[error("invalid mesh section: {0}")]
    InvalidSection(#[from] SectionError),
    /// Creating the mesh would exceed the sink's memory budget.
    #[error("mesh needs {requested} bytes but only {available} remain in budget")]
    BudgetExceeded {
        /// Bytes the mesh would occupy.
        requested: usize,
        /// Bytes still available.
        available: usize,
    },
    /// The backing renderer could not allocate the resource.
    #[error("mesh backend unavailable: {0}")]
    Backend(String),
}

/// Destination for finished chunk meshes.
pub trait MeshSink {
    /// Create a mesh resource from `section` bound to `material`.
    ///
    /// The section borrows generator scratch memory; copy what must outlive
    /// the call.
    fn create(
        &mut self,
        section: &MeshSection<'_>,
        material: &MaterialRef,
    ) -> Result<MeshHandle, SinkError>;

    /// Release a mesh resource. Returns false if the handle was unknown.
    fn destroy(&mut self, handle: MeshHandle) -> bool;
}

/// Lifetime counters for a [`MemorySink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Meshes successfully created.
    pub created: u64,
    /// Meshes destroyed.
    pub destroyed: u64,
    /// Create calls that failed.
    pub rejected: u64,
}

/// A mesh held by a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct StoredMesh {
    /// Material the mesh was created with.
    pub material: MaterialRef,
    /// Interleaved vertices.
    pub vertices: Vec<TerrainVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl StoredMesh {
    /// Approximate memory footprint of the vertex and index buffers.
    pub fn byte_size(&self) -> usize {
        section_bytes(self.vertices.len(), self.indices.len())
    }
}

fn section_bytes(vertices: usize, indices: usize) -> usize {
    vertices * size_of::<TerrainVertex>() + indices * size_of::<u32>()
}

/// In-memory mesh sink with optional byte budget.
#[derive(Debug, Default)]
pub struct MemorySink {
    meshes: FxHashMap<MeshHandle, StoredMesh>,
    next_id: u64,
    byte_budget: Option<usize>,
    bytes_in_use: usize,
    stats: SinkStats,
}

impl MemorySink {
    /// Creates a sink without a memory limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects meshes once `bytes` are in use.
    pub fn with_budget(bytes: usize) -> Self {
        Self {
            byte_budget: Some(bytes),
            ..Self::default()
        }
    }

    /// Number of live meshes.
    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }

    /// Bytes held by live meshes.
    pub fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    /// Lifetime counters.
    pub fn stats(&self) -> SinkStats {
        self.stats
    }

    /// Look up a live mesh.
    pub fn mesh(&self, handle: MeshHandle) -> Option<&StoredMesh> {
        self.meshes.get(&handle)
    }

    /// Returns true if `handle` refers to a live mesh.
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    fn try_create(
        &mut self,
        section: &MeshSection<'_>,
        material: &MaterialRef,
    ) -> Result<MeshHandle, SinkError> {
        section.validate()?;

        let requested = section_bytes(section.vertex_count(), section.indices.len());
        if let Some(budget) = self.byte_budget {
            let available = budget.saturating_sub(self.bytes_in_use);
            if requested > available {
                return Err(SinkError::BudgetExceeded {
                    requested,
                    available,
                });
            }
        }

        let mut vertices = Vec::new();
        interleave(section, &mut vertices);
        let mesh = StoredMesh {
            material: material.clone(),
            vertices,
            indices: section.indices.to_vec(),
        };

        let handle = MeshHandle(self.next_id);
        self.next_id += 1;
        self.bytes_in_use += mesh.byte_size();
        self.meshes.insert(handle, mesh);
        Ok(handle)
    }
}

impl MeshSink for MemorySink {
    fn create(
        &mut self,
        section: &MeshSection<'_>,
        material: &MaterialRef,
    ) -> Result<MeshHandle, SinkError> {
        let result = self.try_create(section, material);
        match result {
            Ok(_) => self.stats.created += 1,
            Err(_) => self.stats.rejected += 1,
        }
        result
    }

    fn destroy(&mut self, handle: MeshHandle) -> bool {
        let Some(mesh) = self.meshes.remove(&handle) else {
            return false;
        };
        self.bytes_in_use -= mesh.byte_size();
        self.stats.destroyed += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3, Vec4};

    struct Buffers {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        tangents: Vec<Vec4>,
        indices: Vec<u32>,
    }

    impl Buffers {
        fn quad() -> Self {
            Self {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
                normals: vec![Vec3::Z; 4],
                uvs: vec![Vec2::ZERO; 4],
                tangents: vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 4],
                indices: vec![0, 2, 1, 1, 2, 3],
            }
        }

        fn section(&self) -> MeshSection<'_> {
            MeshSection {
                positions: &self.positions,
                indices: &self.indices,
                normals: &self.normals,
                uvs: &self.uvs,
                tangents: &self.tangents,
            }
        }
    }

    const QUAD_BYTES: usize = 4 * 48 + 6 * 4;

    #[test]
    fn test_create_then_destroy() {
        let buffers = Buffers::quad();
        let mut sink = MemorySink::new();
        let handle = sink
            .create(&buffers.section(), &MaterialRef::default())
            .unwrap();

        assert!(sink.contains(handle));
        assert_eq!(sink.live_count(), 1);
        assert_eq!(sink.bytes_in_use(), QUAD_BYTES);
        let mesh = sink.mesh(handle).unwrap();
        assert_eq!(mesh.material.name(), "M_Terrain");
        assert_eq!(mesh.indices, buffers.indices);

        assert!(sink.destroy(handle));
        assert_eq!(sink.live_count(), 0);
        assert_eq!(sink.bytes_in_use(), 0);
    }

    #[test]
    fn test_destroy_unknown_handle_is_noop() {
        let mut sink = MemorySink::new();
        assert!(!sink.destroy(MeshHandle(42)));
        assert_eq!(sink.stats().destroyed, 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let buffers = Buffers::quad();
        let mut sink = MemorySink::new();
        let material = MaterialRef::new("rock");
        let a = sink.create(&buffers.section(), &material).unwrap();
        let b = sink.create(&buffers.section(), &material).unwrap();
        sink.destroy(a);
        let c = sink.create(&buffers.section(), &material).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_budget_rejects_overflow() {
        let buffers = Buffers::quad();
        let mut sink = MemorySink::with_budget(QUAD_BYTES + 10);
        let material = MaterialRef::default();

        let first = sink.create(&buffers.section(), &material).unwrap();
        let err = sink.create(&buffers.section(), &material).unwrap_err();
        assert_eq!(
            err,
            SinkError::BudgetExceeded {
                requested: QUAD_BYTES,
                available: 10
            }
        );
        assert_eq!(sink.stats().rejected, 1);

        sink.destroy(first);
        assert!(sink.create(&buffers.section(), &material).is_ok());
    }

    #[test]
    fn test_invalid_section_rejected() {
        let mut buffers = Buffers::quad();
        buffers.indices.push(9);
        buffers.indices.extend([0, 1]);
        let mut sink = MemorySink::new();
        let err = sink
            .create(&buffers.section(), &MaterialRef::default())
            .unwrap_err();
        assert!(matches!(err, SinkError::InvalidSection(_)));
        assert_eq!(sink.live_count(), 0);
    }
}
