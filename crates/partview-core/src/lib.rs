//! Part Viewer Core Data Structures
//!
//! This crate contains the core data structures for the part viewer:
//! - PartNode: a mesh part with appearance and per-context render handles
//! - PartTree: the hierarchy of parts backing the tree display
//! - RenderHandle: a pipeline-ready object bound to one rendering context
//! - MeshSource: the seam to the external mesh-file loader

pub mod appearance;
pub mod geometry;
pub mod handle;
pub mod part;
pub mod source;
pub mod tree;

pub use appearance::*;
pub use geometry::*;
pub use handle::*;
pub use part::*;
pub use source::*;
pub use tree::*;
