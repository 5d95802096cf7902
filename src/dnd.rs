//! Palette-to-canvas drag and drop, independent of the toolkit's own protocol.

use egui::Pos2;

use crate::element::{ComponentId, ComponentKind};

/// Something the user can drag a component out of
pub trait DragSource {
    fn payload(&self) -> ComponentKind;
}

/// Something that accepts dropped components
pub trait DropTarget {
    /// `screen_point` is canvas-local, as reported at drop time
    fn accept(&mut self, payload: ComponentKind, screen_point: Pos2) -> ComponentId;
}

/// One entry of the component palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    kind: ComponentKind,
}

impl PaletteItem {
    pub fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }

    pub fn label(&self) -> &'static str {
        self.kind.display_name()
    }

    /// The full palette, one item per kind
    pub fn all() -> impl Iterator<Item = PaletteItem> {
        ComponentKind::ALL.into_iter().map(PaletteItem::new)
    }
}

impl DragSource for PaletteItem {
    fn payload(&self) -> ComponentKind {
        self.kind
    }
}
