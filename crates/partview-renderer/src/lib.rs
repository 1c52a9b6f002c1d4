//! Part Viewer Renderer
//!
//! Rendering layer for the part viewer:
//!
//! - [`adapter::RenderContextAdapter`] - per-context render handle creation
//! - [`stage::PrimaryStage`] - the on-screen actor set and camera
//! - [`vr`] - the VR render engine: dedicated thread, command channel and
//!   render loop

pub mod adapter;
pub mod stage;
pub mod vr;

pub use adapter::RenderContextAdapter;
pub use stage::{PrimaryStage, StageCamera};
pub use vr::{
    CommandChannel, CommandSlots, DeviceSession, SessionError, SessionFactory, VrCommand, VrError,
    VrPlacement, VrRenderEngine, VrState,
};
