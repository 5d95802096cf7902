use egui::{Pos2, Rect, Vec2};

use crate::document::Schematic;
use crate::element::{ComponentId, ComponentKind};
use crate::event::{ComponentEvent, EditorEvent, EventBus, SelectionEvent};
use crate::layer::{LayerKey, LayerVisibility};
use crate::viewport::{Viewport, ZoomLimits};

/// Mutations of the shared scene state. Views emit these; only the editor runs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a component on top; `None` uses the staggered default position
    AddComponent {
        kind: ComponentKind,
        position: Option<Pos2>,
    },
    Select(ComponentId),
    Deselect,
    BringForward,
    SendBackward,
    MoveComponent {
        id: ComponentId,
        position: Pos2,
    },
    ResizeComponent {
        id: ComponentId,
        rect: Rect,
    },
    SetLabel {
        id: ComponentId,
        label: String,
    },
    SetLayerVisible {
        layer: LayerKey,
        visible: bool,
    },
    /// Screen-space pan
    Pan(Vec2),
    /// Wheel zoom anchored at a canvas-local pointer
    ZoomAt {
        pointer: Pos2,
        direction: f32,
    },
}

/// Borrowed scene state a command runs against
pub struct CommandContext<'a> {
    pub schematic: &'a mut Schematic,
    pub viewport: &'a mut Viewport,
    pub layers: &'a mut LayerVisibility,
    pub zoom: &'a ZoomLimits,
    pub event_bus: &'a EventBus,
}

impl Command {
    /// Runs the command. Returns the id of an added component, if any.
    /// Commands that do not apply (no selection, unknown id, already on top)
    /// leave the state unchanged.
    pub fn execute(self, ctx: &mut CommandContext<'_>) -> Option<ComponentId> {
        match self {
            Command::AddComponent { kind, position } => {
                return Some(add_component(ctx, kind, position));
            }

            Command::Select(id) => {
                if ctx.schematic.selected() != Some(id) && ctx.schematic.select(id) {
                    ctx.event_bus
                        .emit(EditorEvent::SelectionChanged(SelectionEvent::Selected(id)));
                }
            }

            Command::Deselect => {
                if ctx.schematic.selected().is_some() {
                    ctx.schematic.deselect();
                    ctx.event_bus
                        .emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
                }
            }

            Command::BringForward => reorder(ctx, Schematic::bring_forward),

            Command::SendBackward => reorder(ctx, Schematic::send_backward),

            Command::MoveComponent { id, position } => {
                if ctx.schematic.move_to(id, position) {
                    ctx.event_bus.emit(EditorEvent::ComponentChanged(ComponentEvent::Moved {
                        id,
                        position,
                    }));
                }
            }

            Command::ResizeComponent { id, rect } => {
                if ctx.schematic.resize(id, rect) {
                    ctx.event_bus.emit(EditorEvent::ComponentChanged(ComponentEvent::Resized {
                        id,
                        rect,
                    }));
                }
            }

            Command::SetLabel { id, label } => {
                if ctx.schematic.set_label(id, label.clone()) {
                    ctx.event_bus.emit(EditorEvent::ComponentChanged(
                        ComponentEvent::Relabeled { id, label },
                    ));
                }
            }

            Command::SetLayerVisible { layer, visible } => {
                if ctx.layers.is_visible(layer) != visible {
                    ctx.layers.set_visible(layer, visible);
                    ctx.event_bus
                        .emit(EditorEvent::LayerVisibilityChanged { layer, visible });
                }
            }

            Command::Pan(delta) => {
                if delta != Vec2::ZERO {
                    ctx.viewport.pan(delta);
                    emit_view(ctx);
                }
            }

            Command::ZoomAt { pointer, direction } => {
                *ctx.viewport = ctx.viewport.zoom_at(pointer, direction, ctx.zoom);
                emit_view(ctx);
            }
        }
        None
    }
}

/// Appends a component on top and announces it
pub fn add_component(
    ctx: &mut CommandContext<'_>,
    kind: ComponentKind,
    position: Option<Pos2>,
) -> ComponentId {
    let id = ctx.schematic.add(kind, position);
    if let Some(comp) = ctx.schematic.get(id) {
        ctx.event_bus.emit(EditorEvent::ComponentChanged(ComponentEvent::Added {
            id,
            kind,
            position: comp.position(),
        }));
    }
    id
}

fn reorder(ctx: &mut CommandContext<'_>, swap: fn(&mut Schematic) -> bool) {
    let Some(id) = ctx.schematic.selected() else {
        return;
    };
    let Some(old_index) = ctx.schematic.index_of(id) else {
        return;
    };
    if swap(&mut *ctx.schematic) {
        if let Some(new_index) = ctx.schematic.index_of(id) {
            ctx.event_bus.emit(EditorEvent::ComponentChanged(ComponentEvent::Reordered {
                id,
                old_index,
                new_index,
            }));
        }
    }
}

fn emit_view(ctx: &CommandContext<'_>) {
    ctx.event_bus.emit(EditorEvent::ViewChanged {
        scale: ctx.viewport.scale,
        translation: ctx.viewport.offset,
    });
}
