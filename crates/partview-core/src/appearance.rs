//! Shared appearance state.
//!
//! The appearance of a part is referenced by the part itself and by every
//! render handle derived from it, in both rendering contexts. It is the only
//! state touched by both the GUI thread (color writes) and the VR render
//! thread (reads during frame submit), so it stays small plain data behind
//! an `RwLock`.

use std::sync::Arc;

use parking_lot::RwLock;

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Opaque white, the default part color.
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Creates a color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for pipeline submission (alpha always 1).
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

/// Material appearance of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Appearance {
    pub color: Rgb,
}

/// Appearance shared between a part and every handle derived from it.
///
/// Cloning shares the underlying appearance, so a color edit on the part is
/// observed by handles in both rendering contexts without any re-propagation
/// step.
#[derive(Debug, Clone, Default)]
pub struct SharedAppearance(Arc<RwLock<Appearance>>);

impl SharedAppearance {
    /// Creates a new, unshared appearance.
    pub fn new(appearance: Appearance) -> Self {
        Self(Arc::new(RwLock::new(appearance)))
    }

    /// Snapshot of the current appearance.
    pub fn get(&self) -> Appearance {
        *self.0.read()
    }

    /// Current material color.
    pub fn color(&self) -> Rgb {
        self.0.read().color
    }

    /// Sets the material color, visible to every sharer.
    pub fn set_color(&self, color: Rgb) {
        self.0.write().color = color;
    }

    /// Returns true if both refer to the same underlying appearance.
    pub fn shares_with(&self, other: &SharedAppearance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
