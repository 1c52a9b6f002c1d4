//! Part node definition.

use std::sync::Arc;

use crate::{Geometry, PartId, RenderHandle, Rgb, SharedAppearance};

/// Column index of the display name.
pub const NAME_COLUMN: usize = 0;

/// Typed value stored in a part's data columns.
///
/// Column 0 holds the display name; further columns are reserved for
/// metadata the tree display may grow later.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Empty,
    Text(String),
    Number(f64),
    Flag(bool),
}

impl ColumnValue {
    /// Shorthand for a text value.
    pub fn text(value: impl Into<String>) -> Self {
        ColumnValue::Text(value.into())
    }

    /// The contained text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One element of the part hierarchy.
///
/// Carries identity, column data, appearance, visibility, an optional
/// geometry reference and at most one render handle per rendering context.
/// Structure links (parent, children) are managed by the owning `PartTree`.
#[derive(Debug)]
pub struct PartNode {
    id: PartId,
    pub(crate) parent: Option<PartId>,
    pub(crate) children: Vec<PartId>,
    columns: Vec<ColumnValue>,
    appearance: SharedAppearance,
    visible: bool,
    geometry: Option<Arc<Geometry>>,
    primary: Option<RenderHandle>,
    secondary: Option<RenderHandle>,
}

impl PartNode {
    /// Creates a part with the given display name, default white color and
    /// visible by default.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_columns(vec![ColumnValue::text(name)])
    }

    /// Creates a part with explicit column data (used for the synthetic
    /// root, whose columns are the header labels).
    pub fn with_columns(columns: Vec<ColumnValue>) -> Self {
        Self {
            id: PartId::new(),
            parent: None,
            children: Vec::new(),
            columns,
            appearance: SharedAppearance::default(),
            visible: true,
            geometry: None,
            primary: None,
            secondary: None,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn parent(&self) -> Option<PartId> {
        self.parent
    }

    pub fn children(&self) -> &[PartId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Display name (column 0), empty if the column holds no text.
    pub fn name(&self) -> &str {
        self.columns
            .first()
            .and_then(ColumnValue::as_text)
            .unwrap_or("")
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column value, `None` when the index is out of range. Tree views
    /// routinely probe past the end, so this is not an error.
    pub fn data(&self, column: usize) -> Option<&ColumnValue> {
        self.columns.get(column)
    }

    /// Replaces a column value. Returns false (and leaves the columns
    /// untouched) when the index is out of range.
    pub fn set_data(&mut self, column: usize, value: ColumnValue) -> bool {
        match self.columns.get_mut(column) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn appearance(&self) -> &SharedAppearance {
        &self.appearance
    }

    pub fn color(&self) -> Rgb {
        self.appearance.color()
    }

    /// Updates the stored color. The appearance is shared with every handle
    /// derived from this part, so an existing primary handle (and a derived
    /// VR handle) reflects the new color immediately. Never fails.
    pub fn set_color(&mut self, color: Rgb) {
        self.appearance.set_color(color);
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Updates the visibility flag and, when a primary handle exists,
    /// toggles its render visibility. A VR handle already derived keeps its
    /// own context-local flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(handle) = &mut self.primary {
            handle.set_visible(visible);
        }
    }

    pub fn geometry(&self) -> Option<&Arc<Geometry>> {
        self.geometry.as_ref()
    }

    pub fn attach_geometry(&mut self, geometry: Arc<Geometry>) {
        self.geometry = Some(geometry);
    }

    pub fn primary_handle(&self) -> Option<&RenderHandle> {
        self.primary.as_ref()
    }

    /// Stores the primary handle, syncing the part's current visibility
    /// into it.
    pub fn set_primary_handle(&mut self, mut handle: RenderHandle) {
        handle.set_visible(self.visible);
        self.primary = Some(handle);
    }

    pub fn secondary_handle(&self) -> Option<&RenderHandle> {
        self.secondary.as_ref()
    }

    /// Stores the derived VR handle. Visibility is deliberately not synced:
    /// the VR handle starts at whatever default its context ascribes.
    pub fn set_secondary_handle(&mut self, handle: RenderHandle) {
        self.secondary = Some(handle);
    }
}
