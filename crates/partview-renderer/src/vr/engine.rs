//! The VR render engine: lifecycle, seeding and the render loop.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::Vec3;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use partview_core::RenderHandle;

use super::{CommandChannel, DeviceSession, SessionFactory, VrCommand};

/// Lifecycle of the VR render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrState {
    /// No render loop active. A thread that wound down on its own is
    /// reaped by the next lifecycle call.
    Idle,
    /// Thread spawned, device session initializing.
    Starting,
    /// Render loop active.
    Running,
    /// Termination observed, loop exiting and releasing resources.
    Stopping,
}

/// Engine lifecycle errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VrError {
    #[error("VR render thread is already running")]
    AlreadyRunning,
    #[error("failed to spawn VR render thread: {0}")]
    Spawn(String),
}

/// Initial placement applied to every handle seeded into the VR scene,
/// compensating for the default mesh origin.
///
/// The defaults are tuned for meshes modelled Z-up around the scene origin;
/// datasets with a different coordinate convention configure their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VrPlacement {
    /// Rotation around the X axis, in degrees, bringing the mesh upright.
    pub upright_rotation_deg: f32,
    /// Offset from the mesh center to the standard viewing position.
    pub viewing_offset: Vec3,
}

impl Default for VrPlacement {
    fn default() -> Self {
        Self {
            upright_rotation_deg: -90.0,
            viewing_offset: Vec3::new(0.0, -100.0, -200.0),
        }
    }
}

/// Owns the immersive device session and drives its render loop on a
/// dedicated thread.
///
/// Discipline: seed fully with [`add_actor_offline`](Self::add_actor_offline),
/// then [`start`](Self::start); once running, the only sanctioned
/// interaction is [`issue_command`](Self::issue_command). The engine's
/// session state (device, renderer, camera, live handle collection) is
/// owned exclusively by the render thread and released there before the
/// thread exits.
pub struct VrRenderEngine {
    pending: Vec<RenderHandle>,
    channel: Arc<CommandChannel>,
    state: Arc<Mutex<VrState>>,
    thread: Option<JoinHandle<()>>,
    placement: VrPlacement,
    frame_budget: Duration,
}

impl VrRenderEngine {
    pub fn new() -> Self {
        Self::with_placement(VrPlacement::default())
    }

    pub fn with_placement(placement: VrPlacement) -> Self {
        Self {
            pending: Vec::new(),
            channel: Arc::new(CommandChannel::new()),
            state: Arc::new(Mutex::new(VrState::Idle)),
            thread: None,
            placement,
            // Roughly one 90 Hz headset refresh; only relevant when the
            // session submit does not itself block at display refresh.
            frame_budget: Duration::from_millis(11),
        }
    }

    /// Upper bound on one loop iteration when the session does not pace
    /// frames itself. Commands wake the loop early.
    pub fn set_frame_budget(&mut self, budget: Duration) {
        self.frame_budget = budget;
    }

    pub fn state(&self) -> VrState {
        *self.state.lock()
    }

    /// True while the render thread is alive and has not yet wound down.
    /// Shortly after a failed start attempt this reports false.
    pub fn is_running(&self) -> bool {
        self.thread.is_some() && self.state() != VrState::Idle
    }

    /// Queues a handle for the VR scene, applying the initial placement
    /// transform. Legal only while the render thread is not running; a call
    /// while running is skipped with a warning. Returns whether the handle
    /// was accepted.
    pub fn add_actor_offline(&mut self, mut handle: RenderHandle) -> bool {
        self.reap_finished();
        if self.thread.is_some() {
            warn!("add_actor_offline ignored while VR render thread is alive");
            return false;
        }
        let center = handle.geometry().bounds().center();
        handle.rotate_x(self.placement.upright_rotation_deg);
        handle.translate(self.placement.viewing_offset - center);
        self.pending.push(handle);
        true
    }

    /// Handles seeded so far and not yet consumed by a start.
    pub fn pending_handles(&self) -> &[RenderHandle] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Writes into the shared command slots. Thread-safe from any thread,
    /// fire-and-forget; last write wins per slot, and the running loop
    /// observes the value within one frame.
    pub fn issue_command(&self, command: VrCommand) {
        self.channel.issue(command);
    }

    /// Spawns the render thread with the pending handle snapshot.
    ///
    /// Session construction failure is not an error here: the thread winds
    /// down cleanly and [`is_running`](Self::is_running) reports false
    /// shortly after. A previous thread that terminated on its own — via
    /// `EndRender`, a closed session, or a failed session construction —
    /// is joined here, so restarting needs no intervening
    /// [`stop`](Self::stop).
    pub fn start<F: SessionFactory>(&mut self, factory: F) -> Result<(), VrError> {
        self.reap_finished();
        if self.thread.is_some() {
            return Err(VrError::AlreadyRunning);
        }

        self.channel.reset();
        *self.state.lock() = VrState::Starting;

        let handles = std::mem::take(&mut self.pending);
        let channel = Arc::clone(&self.channel);
        let state = Arc::clone(&self.state);
        let frame_budget = self.frame_budget;

        let thread = std::thread::Builder::new()
            .name("vr-render".into())
            .spawn(move || run_render_loop(factory, handles, channel, state, frame_budget))
            .map_err(|e| {
                *self.state.lock() = VrState::Idle;
                VrError::Spawn(e.to_string())
            })?;
        self.thread = Some(thread);
        Ok(())
    }

    /// Requests termination and joins the render thread. Idempotent: safe
    /// to call repeatedly or after the thread already stopped on its own.
    pub fn stop(&mut self) {
        self.channel.issue(VrCommand::EndRender);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("VR render thread panicked");
        }
        *self.state.lock() = VrState::Idle;
    }

    /// Joins a render thread whose loop already exited, so a self-terminated
    /// session does not block the next start. The loop sets the state to
    /// `Idle` as its final action, so the join returns promptly.
    fn reap_finished(&mut self) {
        if self.state() == VrState::Idle
            && let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("VR render thread panicked");
        }
    }
}

impl Default for VrRenderEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VrRenderEngine {
    /// No VR graphics resource outlives the engine: termination is flagged
    /// and the thread joined, bounded by the loop observing the flag within
    /// one frame interval.
    fn drop(&mut self) {
        self.stop();
    }
}

/// Render thread entry.
fn run_render_loop<F: SessionFactory>(
    factory: F,
    mut handles: Vec<RenderHandle>,
    channel: Arc<CommandChannel>,
    state: Arc<Mutex<VrState>>,
    frame_budget: Duration,
) {
    let mut session = match factory.create() {
        Ok(session) => session,
        Err(error) => {
            warn!(%error, "VR session unavailable, render thread exiting");
            *state.lock() = VrState::Idle;
            return;
        }
    };

    info!(actors = handles.len(), "VR session started");
    *state.lock() = VrState::Running;

    let mut t_last = Instant::now();
    loop {
        let frame_start = Instant::now();

        // Rendering is best-effort; a dropped frame must not end the
        // session.
        if let Err(error) = session.submit_frame(&handles) {
            debug!(%error, "frame submit failed");
        }

        let remaining = frame_budget.saturating_sub(frame_start.elapsed());
        let slots = if remaining.is_zero() {
            channel.read()
        } else {
            channel.read_timeout(remaining)
        };

        let now = Instant::now();
        let dt = (now - t_last).as_secs_f32();
        t_last = now;

        if slots.rotate != Vec3::ZERO {
            for handle in &mut handles {
                handle.rotate_x(slots.rotate.x * dt);
                handle.rotate_y(slots.rotate.y * dt);
                handle.rotate_z(slots.rotate.z * dt);
            }
        }

        if slots.end_render || !session.is_live() {
            break;
        }
    }

    *state.lock() = VrState::Stopping;
    info!("VR session shutting down");
    // The session and its handle snapshot are released on this thread,
    // before it exits.
    drop(session);
    drop(handles);
    *state.lock() = VrState::Idle;
}
