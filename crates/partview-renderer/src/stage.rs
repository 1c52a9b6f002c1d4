//! On-screen stage: the actor set shown in the 2D viewport.

use glam::Vec3;

use partview_core::{BoundingBox, PartId, RenderHandle};

/// Camera state for the primary viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageCamera {
    pub position: Vec3,
    pub target: Vec3,
}

impl StageCamera {
    /// Re-frames the camera on the given bounds, backing off far enough to
    /// contain them.
    pub fn reset(&mut self, bounds: &BoundingBox) {
        let distance = bounds.size().length().max(1.0) * 1.5;
        self.target = bounds.center();
        self.position = self.target + Vec3::new(0.0, -distance, distance * 0.5);
    }
}

impl Default for StageCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -10.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

/// The primary renderer's actor set.
///
/// Owned and mutated exclusively by the orchestration thread. Holds clones
/// of the primary handles currently on screen; the part tree stays the
/// source of truth and the stage is rebuilt from it on every refresh.
#[derive(Debug, Default)]
pub struct PrimaryStage {
    actors: Vec<(PartId, RenderHandle)>,
    camera: StageCamera,
    redraws: u64,
}

impl PrimaryStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every actor from the stage.
    pub fn clear_actors(&mut self) {
        self.actors.clear();
    }

    /// Adds an actor for the given part.
    pub fn add_actor(&mut self, part: PartId, handle: RenderHandle) {
        self.actors.push((part, handle));
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn contains_part(&self, part: PartId) -> bool {
        self.actors.iter().any(|(id, _)| *id == part)
    }

    pub fn actors(&self) -> impl Iterator<Item = &(PartId, RenderHandle)> {
        self.actors.iter()
    }

    pub fn camera(&self) -> &StageCamera {
        &self.camera
    }

    /// Re-frames the camera on the union of all actor bounds. No-op when
    /// the stage is empty.
    pub fn reset_camera(&mut self) {
        let mut bounds: Option<BoundingBox> = None;
        for (_, handle) in &self.actors {
            let world = handle.world_bounds();
            bounds = Some(match bounds {
                Some(current) => current.union(&world),
                None => world,
            });
        }
        if let Some(bounds) = bounds {
            self.camera.reset(&bounds);
        }
    }

    /// Requests a redraw of the viewport. Counted so callers (and tests)
    /// can observe that a refresh happened even with zero actors.
    pub fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}
