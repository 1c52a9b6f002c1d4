//! Part hierarchy backing the tree display.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{ColumnValue, NAME_COLUMN, PartNode, Rgb};

/// Typed handle to a node in a `PartTree`.
///
/// Validated by the tree on every access; a stale id simply misses instead
/// of dereferencing into framework internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId(Uuid);

impl PartId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// The owning container of all part nodes.
///
/// The tree is the single source of truth for scene content, visibility and
/// appearance. A synthetic root holds the column headers and anchors the
/// forest of top-level parts; it carries no geometry and is never rendered.
#[derive(Debug)]
pub struct PartTree {
    nodes: HashMap<PartId, PartNode>,
    root: PartId,
}

impl PartTree {
    /// Creates a tree whose synthetic root holds the given column headers.
    pub fn new(headers: Vec<ColumnValue>) -> Self {
        let root = PartNode::with_columns(headers);
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
        }
    }

    pub fn root(&self) -> PartId {
        self.root
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: PartId) -> Option<&PartNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: PartId) -> Option<&mut PartNode> {
        self.nodes.get_mut(&id)
    }

    /// Appends a freshly created node under `parent`, assigning its parent
    /// link and display row. Returns `None` when the parent is unknown.
    ///
    /// Nodes can only enter the tree through this method and only once, so
    /// cycles cannot be expressed through the API.
    pub fn append_child(&mut self, parent: PartId, mut node: PartNode) -> Option<PartId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = node.id();
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    /// Child at the given display row, `None` when out of range.
    pub fn child(&self, parent: PartId, row: usize) -> Option<PartId> {
        self.nodes.get(&parent)?.children.get(row).copied()
    }

    pub fn child_count(&self, id: PartId) -> usize {
        self.nodes.get(&id).map_or(0, PartNode::child_count)
    }

    pub fn column_count(&self, id: PartId) -> usize {
        self.nodes.get(&id).map_or(0, PartNode::column_count)
    }

    pub fn parent_of(&self, id: PartId) -> Option<PartId> {
        self.nodes.get(&id)?.parent()
    }

    /// The node's index within its parent's child sequence. The root (and
    /// any unknown id) reports 0; this is a defined edge case, not an error.
    pub fn row_of(&self, id: PartId) -> usize {
        let Some(parent) = self.nodes.get(&id).and_then(PartNode::parent) else {
            return 0;
        };
        self.nodes
            .get(&parent)
            .and_then(|node| node.children.iter().position(|child| *child == id))
            .unwrap_or(0)
    }

    pub fn data(&self, id: PartId, column: usize) -> Option<&ColumnValue> {
        self.nodes.get(&id)?.data(column)
    }

    pub fn set_data(&mut self, id: PartId, column: usize, value: ColumnValue) -> bool {
        self.nodes
            .get_mut(&id)
            .is_some_and(|node| node.set_data(column, value))
    }

    pub fn set_name(&mut self, id: PartId, name: impl Into<String>) -> bool {
        self.set_data(id, NAME_COLUMN, ColumnValue::text(name))
    }

    pub fn set_color(&mut self, id: PartId, color: Rgb) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_color(color);
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: PartId, visible: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Recursively destroys the entire subtree below `id`, releasing the
    /// render handles of every descendant. Used when reloading a new set of
    /// parts.
    pub fn remove_all_children(&mut self, id: PartId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let mut to_remove = std::mem::take(&mut node.children);

        // Breadth-first collect, then drop everything.
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(child) = self.nodes.get(&to_remove[i]) {
                to_remove.extend_from_slice(&child.children);
            }
            i += 1;
        }
        for child in to_remove {
            self.nodes.remove(&child);
        }
    }

    /// Removes every part, keeping the synthetic root and its headers.
    pub fn clear(&mut self) {
        self.remove_all_children(self.root);
    }

    /// Number of parts in the tree, excluding the synthetic root.
    pub fn part_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.part_count() == 0
    }

    /// Preorder depth-first walk over all parts, excluding the root.
    /// Sibling order matches display order.
    pub fn depth_first(&self) -> Vec<PartId> {
        let mut order = Vec::with_capacity(self.part_count());
        let mut stack: Vec<PartId> = self
            .nodes
            .get(&self.root)
            .map(|root| root.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }
}

impl Default for PartTree {
    fn default() -> Self {
        Self::new(vec![ColumnValue::text("Part"), ColumnValue::text("Visible?")])
    }
}
