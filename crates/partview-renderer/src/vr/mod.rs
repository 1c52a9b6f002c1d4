//! VR render engine.
//!
//! The immersive view runs on its own OS thread so it never impacts UI
//! responsiveness. The GUI thread seeds the engine with a snapshot of
//! handles before start, then talks to the running thread only through the
//! mutex-guarded command channel.

mod commands;
mod engine;
mod session;

pub use commands::{CommandChannel, CommandSlots, VrCommand};
pub use engine::{VrError, VrPlacement, VrRenderEngine, VrState};
pub use session::{DeviceSession, SessionError, SessionFactory};
