//! Mesh loading seam.

use std::path::Path;

use crate::Geometry;

/// Mesh loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Supplies geometry for a file-system path.
///
/// Implemented outside the core by the mesh-file loader. The core treats a
/// load failure as "no primary handle materialized": the part stays in the
/// tree without a visual representation.
pub trait MeshSource {
    fn load(&self, path: &Path) -> Result<Geometry, MeshError>;
}
