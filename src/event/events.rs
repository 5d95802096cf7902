use egui::{Pos2, Rect, Vec2};
use std::path::PathBuf;

use crate::element::{ComponentId, ComponentKind};
use crate::layer::LayerKey;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ComponentChanged(ComponentEvent),
    SelectionChanged(SelectionEvent),
    LayerVisibilityChanged {
        layer: LayerKey,
        visible: bool,
    },
    ViewChanged {
        scale: f32,
        translation: Vec2,
    },
    AssetChanged(AssetEvent),
    DocumentChanged(DocumentEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    Added {
        id: ComponentId,
        kind: ComponentKind,
        position: Pos2,
    },
    Reordered {
        id: ComponentId,
        old_index: usize,
        new_index: usize,
    },
    Moved {
        id: ComponentId,
        position: Pos2,
    },
    Resized {
        id: ComponentId,
        rect: Rect,
    },
    Relabeled {
        id: ComponentId,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Selected(ComponentId),
    Cleared,
    EditStarted(ComponentId),
    EditCommitted(ComponentId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    Loaded { kind: ComponentKind, natural_size: Vec2 },
    Failed { kind: ComponentKind, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Saved { components: usize },
    Loaded { components: usize },
    NothingToLoad,
    Exported { path: PathBuf },
}
