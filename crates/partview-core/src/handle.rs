//! Per-context render handles.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use uuid::Uuid;

use crate::{BoundingBox, Geometry, Rgb, SharedAppearance};

/// Rendering context a handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderContextKind {
    /// The on-screen 2D viewport.
    Primary,
    /// The immersive head-mounted display session.
    Vr,
}

/// A pipeline-ready object (geometry + mapping + material) bound to exactly
/// one rendering context.
///
/// Geometry and appearance are shared by reference with the owning part;
/// transform and the visibility flag are context-local. Cloning produces an
/// independent pipeline-side copy sharing geometry and appearance, which is
/// how the VR session takes its snapshot of a handle while the part keeps
/// its own bookkeeping copy. The two copies never share mutable pipeline
/// state, so they are safe to drive from different threads.
#[derive(Debug, Clone)]
pub struct RenderHandle {
    id: Uuid,
    context: RenderContextKind,
    geometry: Arc<Geometry>,
    appearance: SharedAppearance,
    transform: Mat4,
    visible: bool,
}

impl RenderHandle {
    /// Creates a handle for the given context, sharing the part's geometry
    /// and appearance. Starts visible with an identity transform.
    pub fn new(
        context: RenderContextKind,
        geometry: Arc<Geometry>,
        appearance: SharedAppearance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            geometry,
            appearance,
            transform: Mat4::IDENTITY,
            visible: true,
        }
    }

    /// Stable identity, preserved across clones of the same handle.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> RenderContextKind {
        self.context
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn appearance(&self) -> &SharedAppearance {
        &self.appearance
    }

    /// Material color as it would be submitted this frame.
    pub fn color(&self) -> Rgb {
        self.appearance.color()
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Context-local render visibility.
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Incremental rotation around the world X axis, in degrees.
    pub fn rotate_x(&mut self, degrees: f32) {
        self.transform = Mat4::from_rotation_x(degrees.to_radians()) * self.transform;
    }

    /// Incremental rotation around the world Y axis, in degrees.
    pub fn rotate_y(&mut self, degrees: f32) {
        self.transform = Mat4::from_rotation_y(degrees.to_radians()) * self.transform;
    }

    /// Incremental rotation around the world Z axis, in degrees.
    pub fn rotate_z(&mut self, degrees: f32) {
        self.transform = Mat4::from_rotation_z(degrees.to_radians()) * self.transform;
    }

    /// Incremental translation in world space.
    pub fn translate(&mut self, offset: Vec3) {
        self.transform = Mat4::from_translation(offset) * self.transform;
    }

    /// World-space bounding box under the current transform.
    pub fn world_bounds(&self) -> BoundingBox {
        self.geometry.bounds().transform(&self.transform)
    }
}
