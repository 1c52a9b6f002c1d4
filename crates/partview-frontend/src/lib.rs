//! Part Viewer Frontend Glue
//!
//! Application-layer orchestration between the part tree, the on-screen
//! stage and the VR render engine. The 2D widgets themselves live outside
//! this crate; what lives here is everything they call into.

mod properties;
mod sync;

pub use properties::{PartProperties, apply_properties};
pub use sync::SceneSynchronizer;
