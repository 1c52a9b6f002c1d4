//! Command channel between the GUI thread and the VR render thread.

use std::time::Duration;

use glam::Vec3;
use parking_lot::{Condvar, Mutex};

/// Discrete command for the VR render thread.
///
/// Rotation values are in degrees per second and keep applying every frame
/// until overwritten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VrCommand {
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    /// Terminate the render loop.
    EndRender,
}

/// The shared command slots: three rotation deltas and one termination
/// flag. This struct is the entire mutable surface shared between the two
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommandSlots {
    /// Degrees per second around each axis.
    pub rotate: Vec3,
    /// Latched once set; cleared only by `CommandChannel::reset`.
    pub end_render: bool,
}

/// Mutex-guarded slots plus a condvar so the render thread can pick up a
/// command without waiting out a full frame interval.
#[derive(Debug, Default)]
pub struct CommandChannel {
    slots: Mutex<CommandSlots>,
    wakeup: Condvar,
}

impl CommandChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a command into its slot and returns immediately.
    ///
    /// Fire-and-forget, last write wins per slot: rapid repeated commands
    /// on the same axis overwrite rather than queue, and no acknowledgment
    /// is returned. `EndRender` is idempotent.
    pub fn issue(&self, command: VrCommand) {
        {
            let mut slots = self.slots.lock();
            match command {
                VrCommand::RotateX(value) => slots.rotate.x = value,
                VrCommand::RotateY(value) => slots.rotate.y = value,
                VrCommand::RotateZ(value) => slots.rotate.z = value,
                VrCommand::EndRender => slots.end_render = true,
            }
        }
        self.wakeup.notify_one();
    }

    /// Snapshot of the current slots.
    pub fn read(&self) -> CommandSlots {
        *self.slots.lock()
    }

    /// Waits until a command arrives or `timeout` elapses, then snapshots.
    /// Returns without waiting once termination is latched.
    pub fn read_timeout(&self, timeout: Duration) -> CommandSlots {
        let mut slots = self.slots.lock();
        if !slots.end_render {
            let _ = self.wakeup.wait_for(&mut slots, timeout);
        }
        *slots
    }

    /// Clears every slot. Called before a new session starts so a latched
    /// termination from the previous session cannot stop the next one.
    pub fn reset(&self) {
        *self.slots.lock() = CommandSlots::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_per_slot() {
        let channel = CommandChannel::new();
        channel.issue(VrCommand::RotateX(5.0));
        channel.issue(VrCommand::RotateX(12.0));
        let slots = channel.read();
        assert_eq!(slots.rotate.x, 12.0);
    }

    #[test]
    fn test_slots_are_independent() {
        let channel = CommandChannel::new();
        channel.issue(VrCommand::RotateX(1.0));
        channel.issue(VrCommand::RotateY(2.0));
        channel.issue(VrCommand::RotateZ(3.0));
        let slots = channel.read();
        assert_eq!(slots.rotate, Vec3::new(1.0, 2.0, 3.0));
        assert!(!slots.end_render);
    }

    #[test]
    fn test_end_render_is_latched_and_idempotent() {
        let channel = CommandChannel::new();
        channel.issue(VrCommand::EndRender);
        channel.issue(VrCommand::EndRender);
        assert!(channel.read().end_render);
        // Latched: a later rotate does not clear it.
        channel.issue(VrCommand::RotateX(1.0));
        assert!(channel.read().end_render);
    }

    #[test]
    fn test_reset_clears_all_slots() {
        let channel = CommandChannel::new();
        channel.issue(VrCommand::RotateZ(9.0));
        channel.issue(VrCommand::EndRender);
        channel.reset();
        assert_eq!(channel.read(), CommandSlots::default());
    }

    #[test]
    fn test_read_timeout_returns_immediately_after_end_render() {
        let channel = CommandChannel::new();
        channel.issue(VrCommand::EndRender);
        let start = std::time::Instant::now();
        let slots = channel.read_timeout(Duration::from_secs(5));
        assert!(slots.end_render);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
