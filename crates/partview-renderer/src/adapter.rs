//! Per-context render handle creation.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use partview_core::{MeshSource, PartNode, RenderContextKind, RenderHandle};

/// Builds and refreshes render handles bound to a specific rendering
/// context, sharing the part's appearance so edits propagate to both
/// contexts.
pub struct RenderContextAdapter;

impl RenderContextAdapter {
    /// Loads geometry from `source` and binds a primary handle to the part.
    ///
    /// Fails silently: on a load error the part is left without a handle
    /// (and a warning is logged); callers check handle presence before use.
    /// A part that already has a primary handle is left untouched.
    pub fn materialize_primary(node: &mut PartNode, source: &dyn MeshSource, path: &Path) {
        if node.primary_handle().is_some() {
            return;
        }

        match source.load(path) {
            Ok(geometry) => {
                let geometry = Arc::new(geometry);
                node.attach_geometry(geometry.clone());
                let handle = RenderHandle::new(
                    RenderContextKind::Primary,
                    geometry,
                    node.appearance().clone(),
                );
                node.set_primary_handle(handle);
            }
            Err(error) => {
                warn!(
                    part = node.name(),
                    path = %path.display(),
                    %error,
                    "mesh load failed, part left without a primary handle"
                );
            }
        }
    }

    /// Derives an independent VR-context handle from the part's geometry.
    ///
    /// Requires a primary handle to already exist; returns `None` otherwise.
    /// The new handle shares the part's appearance (so later color edits
    /// affect both contexts) but constructs independent pipeline state, and
    /// visibility is deliberately not copied: the VR handle starts at the
    /// context default. One copy is stored on the part, another is returned
    /// for the VR session to own.
    pub fn derive_secondary(node: &mut PartNode) -> Option<RenderHandle> {
        node.primary_handle()?;
        let geometry = node.geometry()?.clone();
        let handle = RenderHandle::new(RenderContextKind::Vr, geometry, node.appearance().clone());
        node.set_secondary_handle(handle.clone());
        Some(handle)
    }
}
