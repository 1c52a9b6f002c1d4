//! Property-edit exchange with the external editor dialog.

use partview_core::{NAME_COLUMN, ColumnValue, PartId, PartTree, Rgb};

/// The {name, color, visibility} triple shown in and returned by the
/// property editor.
#[derive(Debug, Clone, PartialEq)]
pub struct PartProperties {
    pub name: String,
    pub color: Rgb,
    pub visible: bool,
}

impl PartProperties {
    /// Snapshot of a part's editable properties, `None` for an unknown id.
    pub fn of(tree: &PartTree, part: PartId) -> Option<Self> {
        let node = tree.get(part)?;
        Some(Self {
            name: node.name().to_string(),
            color: node.color(),
            visible: node.visible(),
        })
    }
}

/// Applies a confirmed edit: name, then color, then visibility, in that
/// order. Returns false for an unknown id, leaving the tree untouched.
pub fn apply_properties(tree: &mut PartTree, part: PartId, properties: &PartProperties) -> bool {
    let Some(node) = tree.get_mut(part) else {
        return false;
    };
    node.set_data(NAME_COLUMN, ColumnValue::text(properties.name.clone()));
    node.set_color(properties.color);
    node.set_visible(properties.visible);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use partview_core::{Geometry, PartNode, RenderContextKind, RenderHandle};

    fn tree_with_part() -> (PartTree, PartId) {
        let mut tree = PartTree::default();
        let id = tree
            .append_child(tree.root(), PartNode::new("wheel"))
            .unwrap();
        let node = tree.get_mut(id).unwrap();
        let geometry = Arc::new(Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0]],
            vec![0, 1, 2],
        ));
        node.attach_geometry(geometry.clone());
        let handle = RenderHandle::new(
            RenderContextKind::Primary,
            geometry,
            node.appearance().clone(),
        );
        node.set_primary_handle(handle);
        (tree, id)
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (tree, id) = tree_with_part();
        let props = PartProperties::of(&tree, id).unwrap();
        assert_eq!(props.name, "wheel");
        assert_eq!(props.color, Rgb::WHITE);
        assert!(props.visible);
    }

    #[test]
    fn test_apply_updates_tree_and_primary_handle() {
        let (mut tree, id) = tree_with_part();
        let applied = apply_properties(
            &mut tree,
            id,
            &PartProperties {
                name: "front wheel".into(),
                color: Rgb::new(255, 0, 0),
                visible: false,
            },
        );
        assert!(applied);

        let node = tree.get(id).unwrap();
        assert_eq!(node.name(), "front wheel");
        assert_eq!(node.color(), Rgb::new(255, 0, 0));
        assert!(!node.visible());

        let handle = node.primary_handle().unwrap();
        assert_eq!(handle.color(), Rgb::new(255, 0, 0));
        assert!(!handle.visible());
    }

    #[test]
    fn test_apply_to_unknown_id_is_rejected() {
        let (mut tree, _) = tree_with_part();
        let mut other = PartTree::default();
        let foreign = other.append_child(other.root(), PartNode::new("x")).unwrap();
        assert!(!apply_properties(
            &mut tree,
            foreign,
            &PartProperties {
                name: "y".into(),
                color: Rgb::WHITE,
                visible: true,
            },
        ));
    }
}
