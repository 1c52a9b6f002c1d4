//! Device session seam for the immersive-display runtime.

use partview_core::RenderHandle;

/// Errors from the immersive-display runtime.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    /// No VR runtime or headset is available. Fatal to entering the
    /// running state; the engine shuts down cleanly instead of panicking.
    #[error("VR runtime unavailable: {0}")]
    Unavailable(String),
    /// A single frame failed to submit. Non-fatal; the render loop
    /// continues with the next frame.
    #[error("frame submit failed: {0}")]
    Frame(String),
}

/// One live immersive session: device window, renderer, interactor and
/// camera.
///
/// Owned exclusively by the VR render thread. Constructed on that thread
/// because immersive runtimes tie their resources to the calling thread,
/// and dropped on it before the thread exits so no device resource leaks
/// across sessions.
pub trait DeviceSession {
    /// Submits one frame showing `handles`. Blocks for at most one display
    /// refresh interval.
    fn submit_frame(&mut self, handles: &[RenderHandle]) -> Result<(), SessionError>;

    /// False once the runtime closed the session externally (for example
    /// the user removed the headset).
    fn is_live(&self) -> bool;
}

/// Constructs the device session on the render thread.
pub trait SessionFactory: Send + 'static {
    type Session: DeviceSession;

    fn create(&self) -> Result<Self::Session, SessionError>;
}
