//! Scene synchronization between the part tree and both rendering contexts.

use std::path::Path;

use tracing::{debug, info, warn};

use partview_core::{MeshSource, PartId, PartNode, PartTree};
use partview_renderer::{PrimaryStage, RenderContextAdapter, VrRenderEngine};

/// Orchestrates the part tree against the on-screen stage and the VR
/// engine. Runs entirely on the UI/orchestration thread; the tree and the
/// primary handles are never touched from anywhere else.
pub struct SceneSynchronizer;

impl SceneSynchronizer {
    /// Imports one mesh file as a child of `parent`, named after the file
    /// stem.
    ///
    /// A load failure leaves the part in the tree without a visual
    /// representation rather than aborting the whole import. Returns `None`
    /// only for an unknown parent.
    pub fn import_part(
        tree: &mut PartTree,
        parent: PartId,
        source: &dyn MeshSource,
        path: &Path,
    ) -> Option<PartId> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        let id = tree.append_child(parent, PartNode::new(name))?;
        if let Some(node) = tree.get_mut(id) {
            RenderContextAdapter::materialize_primary(node, source, path);
        }
        Some(id)
    }

    /// Rebuilds the on-screen actor set from the tree.
    ///
    /// Clears the stage, walks the tree depth-first, adds the primary
    /// handle of every visible part, re-frames the camera when anything was
    /// added, and always requests a redraw so an emptied scene visibly
    /// clears.
    pub fn refresh_primary_view(tree: &PartTree, stage: &mut PrimaryStage) {
        stage.clear_actors();
        for id in tree.depth_first() {
            let Some(node) = tree.get(id) else { continue };
            if node.visible()
                && let Some(handle) = node.primary_handle()
            {
                stage.add_actor(id, handle.clone());
            }
        }
        if stage.actor_count() > 0 {
            stage.reset_camera();
        }
        stage.request_redraw();
        debug!(actors = stage.actor_count(), "primary view refreshed");
    }

    /// Seeds the VR engine with a one-shot snapshot of the visible parts.
    ///
    /// Walks the tree exactly once, deriving a VR handle for each visible
    /// part (reusing one derived earlier) and handing it to the engine;
    /// parts without a primary handle are skipped. Only valid before the
    /// engine starts. Parts added or toggled visible after the session
    /// starts are not reflected until it is stopped and re-seeded; this is
    /// a documented limitation of the one-shot seed, not an oversight.
    ///
    /// Returns the number of handles seeded.
    pub fn seed_vr_session(tree: &mut PartTree, engine: &mut VrRenderEngine) -> usize {
        if engine.is_running() {
            warn!("seed_vr_session ignored while the VR render thread is alive");
            return 0;
        }
        let mut seeded = 0;
        for id in tree.depth_first() {
            let Some(node) = tree.get_mut(id) else {
                continue;
            };
            if !node.visible() {
                continue;
            }
            let handle = match node.secondary_handle() {
                Some(handle) => Some(handle.clone()),
                None => RenderContextAdapter::derive_secondary(node),
            };
            if let Some(handle) = handle
                && engine.add_actor_offline(handle)
            {
                seeded += 1;
            }
        }
        info!(actors = seeded, "VR session seeded");
        seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use partview_core::{Geometry, MeshError, RenderContextKind, RenderHandle};
    use partview_renderer::{DeviceSession, SessionError, SessionFactory, VrCommand};

    struct FakeMeshSource;

    impl MeshSource for FakeMeshSource {
        fn load(&self, path: &Path) -> Result<Geometry, MeshError> {
            if path.extension().and_then(|e| e.to_str()) != Some("stl") {
                return Err(MeshError::Parse("unsupported format".into()));
            }
            Ok(Geometry::new(
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                vec![[0.0, 0.0, 1.0]],
                vec![0, 1, 2],
            ))
        }
    }

    fn import(tree: &mut PartTree, name: &str) -> PartId {
        let root = tree.root();
        SceneSynchronizer::import_part(tree, root, &FakeMeshSource, Path::new(name)).unwrap()
    }

    #[test]
    fn test_import_names_part_after_file_stem() {
        let mut tree = PartTree::default();
        let id = import(&mut tree, "chassis.stl");
        let node = tree.get(id).unwrap();
        assert_eq!(node.name(), "chassis");
        assert!(node.primary_handle().is_some());
    }

    #[test]
    fn test_import_failure_keeps_part_in_tree() {
        let mut tree = PartTree::default();
        let id = import(&mut tree, "notes.txt");
        let node = tree.get(id).unwrap();
        assert_eq!(node.name(), "notes");
        assert!(node.primary_handle().is_none());
    }

    #[test]
    fn test_refresh_adds_only_visible_parts_with_handles() {
        let mut tree = PartTree::default();
        let a = import(&mut tree, "a.stl");
        let b = import(&mut tree, "b.stl");
        let c = import(&mut tree, "c.txt"); // no handle
        tree.set_visible(b, false);

        let mut stage = PrimaryStage::new();
        SceneSynchronizer::refresh_primary_view(&tree, &mut stage);

        assert_eq!(stage.actor_count(), 1);
        assert!(stage.contains_part(a));
        assert!(!stage.contains_part(b));
        assert!(!stage.contains_part(c));
        assert_eq!(stage.redraws(), 1);
    }

    #[test]
    fn test_refresh_of_empty_tree_still_redraws() {
        let tree = PartTree::default();
        let mut stage = PrimaryStage::new();
        let camera_before = *stage.camera();

        SceneSynchronizer::refresh_primary_view(&tree, &mut stage);

        assert_eq!(stage.actor_count(), 0);
        assert_eq!(stage.redraws(), 1);
        // No actors were added, so the camera stays put.
        assert_eq!(*stage.camera(), camera_before);
    }

    #[test]
    fn test_refresh_clears_previous_actors() {
        let mut tree = PartTree::default();
        let a = import(&mut tree, "a.stl");
        let mut stage = PrimaryStage::new();
        SceneSynchronizer::refresh_primary_view(&tree, &mut stage);
        assert_eq!(stage.actor_count(), 1);

        tree.set_visible(a, false);
        SceneSynchronizer::refresh_primary_view(&tree, &mut stage);
        assert_eq!(stage.actor_count(), 0);
        assert_eq!(stage.redraws(), 2);
    }

    #[test]
    fn test_seed_skips_invisible_and_handleless_parts() {
        let mut tree = PartTree::default();
        let a = import(&mut tree, "a.stl");
        let b = import(&mut tree, "b.stl");
        import(&mut tree, "c.txt");
        tree.set_visible(b, false);

        let mut engine = VrRenderEngine::new();
        let seeded = SceneSynchronizer::seed_vr_session(&mut tree, &mut engine);

        assert_eq!(seeded, 1);
        assert_eq!(engine.pending_count(), 1);
        // The seeded part now also carries its VR bookkeeping handle.
        assert!(tree.get(a).unwrap().secondary_handle().is_some());
        assert!(tree.get(b).unwrap().secondary_handle().is_none());
    }

    #[test]
    fn test_seeded_handles_share_appearance_with_tree() {
        let mut tree = PartTree::default();
        let a = import(&mut tree, "a.stl");
        let mut engine = VrRenderEngine::new();
        SceneSynchronizer::seed_vr_session(&mut tree, &mut engine);

        let seeded = &engine.pending_handles()[0];
        assert_eq!(seeded.context(), RenderContextKind::Vr);
        assert!(
            seeded
                .appearance()
                .shares_with(tree.get(a).unwrap().appearance())
        );
    }

    // --- live-session regression guard -----------------------------------

    #[derive(Default)]
    struct SessionProbe {
        frames: AtomicUsize,
        actor_count: AtomicUsize,
        live: AtomicBool,
    }

    struct FakeSession {
        probe: Arc<SessionProbe>,
    }

    impl DeviceSession for FakeSession {
        fn submit_frame(&mut self, handles: &[RenderHandle]) -> Result<(), SessionError> {
            self.probe.frames.fetch_add(1, Ordering::SeqCst);
            self.probe
                .actor_count
                .store(handles.len(), Ordering::SeqCst);
            Ok(())
        }

        fn is_live(&self) -> bool {
            self.probe.live.load(Ordering::SeqCst)
        }
    }

    struct FakeFactory {
        probe: Arc<SessionProbe>,
    }

    impl SessionFactory for FakeFactory {
        type Session = FakeSession;

        fn create(&self) -> Result<FakeSession, SessionError> {
            Ok(FakeSession {
                probe: Arc::clone(&self.probe),
            })
        }
    }

    fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if check() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        check()
    }

    #[test]
    fn test_parts_added_after_seed_do_not_reach_live_session() {
        let mut tree = PartTree::default();
        import(&mut tree, "a.stl");

        let mut engine = VrRenderEngine::new();
        engine.set_frame_budget(Duration::from_millis(1));
        assert_eq!(SceneSynchronizer::seed_vr_session(&mut tree, &mut engine), 1);

        let probe = Arc::new(SessionProbe::default());
        probe.live.store(true, Ordering::SeqCst);
        engine
            .start(FakeFactory {
                probe: Arc::clone(&probe),
            })
            .unwrap();
        assert!(wait_until(Duration::from_secs(2), || {
            probe.frames.load(Ordering::SeqCst) > 0
        }));
        assert_eq!(probe.actor_count.load(Ordering::SeqCst), 1);

        // New visible part after the session started: the one-shot seed
        // means it must not appear in the live actor collection.
        import(&mut tree, "late.stl");
        let reseeded = SceneSynchronizer::seed_vr_session(&mut tree, &mut engine);
        assert_eq!(reseeded, 0);
        assert_eq!(engine.pending_count(), 0);

        let frames = probe.frames.load(Ordering::SeqCst);
        assert!(wait_until(Duration::from_secs(2), || {
            probe.frames.load(Ordering::SeqCst) > frames + 10
        }));
        assert_eq!(probe.actor_count.load(Ordering::SeqCst), 1);

        engine.stop();
    }

    #[test]
    fn test_reseed_after_session_ends_on_its_own() {
        let mut tree = PartTree::default();
        import(&mut tree, "a.stl");

        let mut engine = VrRenderEngine::new();
        engine.set_frame_budget(Duration::from_millis(1));
        assert_eq!(SceneSynchronizer::seed_vr_session(&mut tree, &mut engine), 1);

        let probe = Arc::new(SessionProbe::default());
        probe.live.store(true, Ordering::SeqCst);
        engine
            .start(FakeFactory {
                probe: Arc::clone(&probe),
            })
            .unwrap();
        assert!(wait_until(Duration::from_secs(2), || {
            probe.frames.load(Ordering::SeqCst) > 0
        }));

        engine.issue_command(VrCommand::EndRender);
        assert!(wait_until(Duration::from_secs(2), || !engine.is_running()));

        // The session ended on its own; re-seeding and restarting work with
        // no explicit stop() in between, and the count reflects handles the
        // engine actually accepted.
        import(&mut tree, "b.stl");
        let reseeded = SceneSynchronizer::seed_vr_session(&mut tree, &mut engine);
        assert_eq!(reseeded, 2);
        assert_eq!(engine.pending_count(), 2);

        engine
            .start(FakeFactory {
                probe: Arc::clone(&probe),
            })
            .unwrap();
        assert!(wait_until(Duration::from_secs(2), || {
            probe.actor_count.load(Ordering::SeqCst) == 2
        }));
        engine.stop();
    }
}
