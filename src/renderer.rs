// src/renderer.rs
use egui::{Align2, Color32, FontId, Id, Pos2, Rect, Sense, Stroke, TextEdit, Ui, Vec2};
use log::warn;

use crate::command::Command;
use crate::dnd::DropTarget;
use crate::element::{ComponentId, ComponentKind, PlacedComponent, LABEL_FONT_SIZE, LABEL_GAP};
use crate::state::Editor;
use crate::texture_manager::{raster_size, TextureGenerationError, TextureManager};
use crate::viewport::Viewport;
use crate::widgets::{Corner, ResizeHandle};

const SELECTION_OUTLINE: Color32 = Color32::from_rgb(0x00, 0xBC, 0xD4);
const PLACEHOLDER_FILL: Color32 = Color32::from_gray(220);
const PLACEHOLDER_STROKE: Color32 = Color32::from_gray(160);
const EDITOR_HEIGHT: f32 = 30.0;
const TEXTURE_CACHE_SIZE: usize = 64;

/// What the canvas asks the editor to do once the frame is drawn
#[derive(Debug, Clone, PartialEq)]
enum CanvasAction {
    Run(Command),
    BeginEdit(ComponentId),
    CommitEdit(ComponentId),
    Drop { kind: ComponentKind, at: Pos2 },
}

/// Draws the scene into the central panel and turns pointer input into editor calls
#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
    /// Node whose label editor already received focus
    focused_edit: Option<ComponentId>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
            focused_edit: None,
        }
    }

    /// Renders the current frame of the canvas
    pub fn render(&mut self, ui: &mut Ui, editor: &mut Editor) {
        self.textures.begin_frame();

        let (canvas, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let origin = canvas.rect.min.to_vec2();
        painter.rect_filled(canvas.rect, 0.0, Color32::WHITE);
        editor.set_canvas_size(canvas.rect.size());

        let viewport = *editor.viewport();
        let to_local = |screen: Pos2| screen - origin;
        let to_scene = |screen: Pos2| viewport.to_scene(screen - origin);

        let items: Vec<PlacedComponent> = editor
            .schematic()
            .filter_visible(editor.layers())
            .cloned()
            .collect();
        let selected = editor.schematic().selected();
        // Drags start past egui's threshold; gestures anchor where the button went down
        let press_origin = ui.input(|i| i.pointer.press_origin());

        let mut actions = Vec::new();
        let mut drawn_editor = None;

        for comp in &items {
            let id = comp.id();
            let screen_rect = viewport.rect_to_screen(comp.rect()).translate(origin);

            self.paint_graphic(ui, &painter, editor, comp, screen_rect);

            let editing = editor.node(id).is_some_and(|node| node.is_editing());
            if !editing {
                paint_label(&painter, comp, &viewport, origin);
            }

            let response = ui.interact(screen_rect, Id::new(("scene_node", id)), Sense::click_and_drag());

            if response.double_clicked() {
                actions.push(CanvasAction::BeginEdit(id));
            } else if response.clicked() {
                if let Some(node) = editor.node(id) {
                    actions.push(CanvasAction::Run(node.on_click()));
                }
            }

            if let (Some(pointer), Some(node)) = (response.interact_pointer_pos(), editor.node_mut(id)) {
                if response.drag_started() {
                    node.begin_drag(comp, to_scene(press_origin.unwrap_or(pointer)));
                }
                let pointer = to_scene(pointer);
                let command = if response.drag_stopped() {
                    node.end_gesture(pointer)
                } else if response.dragged() {
                    node.drag_to(pointer)
                } else {
                    None
                };
                actions.extend(command.map(CanvasAction::Run));
            }

            if selected == Some(id) {
                painter.rect_stroke(screen_rect, 0.0, Stroke::new(1.0, SELECTION_OUTLINE));
                actions.extend(resize_handles(ui, editor, comp, screen_rect, press_origin, &to_scene));
            }

            if editing {
                drawn_editor = Some(id);
                actions.extend(self.label_editor(ui, editor, id, screen_rect, viewport.scale));
            }
        }

        // A hidden editor loses egui focus; it is requested again once drawn
        if self.focused_edit.is_some() && self.focused_edit != drawn_editor {
            self.focused_edit = None;
        }

        if canvas.clicked() {
            actions.push(CanvasAction::Run(Command::Deselect));
        }
        if canvas.dragged() {
            actions.push(CanvasAction::Run(Command::Pan(canvas.drag_delta())));
        }

        // Components cover the canvas, so the pointer comes from input rather than `hover_pos`
        let (scroll, pointer) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.latest_pos()));
        let pointer = pointer.filter(|p| canvas.rect.contains(*p));

        if scroll != 0.0 {
            if let Some(pointer) = pointer {
                actions.push(CanvasAction::Run(Command::ZoomAt {
                    pointer: to_local(pointer),
                    direction: scroll,
                }));
            }
        }

        if canvas.dnd_hover_payload::<ComponentKind>().is_some() {
            painter.rect_stroke(canvas.rect.shrink(1.0), 0.0, Stroke::new(2.0, SELECTION_OUTLINE));
        }
        if let Some(kind) = canvas.dnd_release_payload::<ComponentKind>() {
            match pointer {
                Some(pointer) => actions.push(CanvasAction::Drop {
                    kind: *kind,
                    at: to_local(pointer),
                }),
                None => warn!("Dropped {} without a pointer position", kind),
            }
        }

        for action in actions {
            match action {
                CanvasAction::Run(command) => {
                    editor.execute(command);
                }
                CanvasAction::BeginEdit(id) => editor.begin_edit(id),
                CanvasAction::CommitEdit(id) => editor.commit_edit(id),
                CanvasAction::Drop { kind, at } => {
                    editor.accept(kind, at);
                }
            }
        }
    }

    fn paint_graphic(
        &mut self,
        ui: &Ui,
        painter: &egui::Painter,
        editor: &Editor,
        comp: &PlacedComponent,
        screen_rect: Rect,
    ) {
        let Some(graphic) = editor.assets().graphic(comp.kind()) else {
            painter.rect_filled(screen_rect, 0.0, PLACEHOLDER_FILL);
            painter.rect_stroke(screen_rect, 0.0, Stroke::new(1.0, PLACEHOLDER_STROKE));
            return;
        };

        let ppp = ui.ctx().pixels_per_point();
        let texture = raster_size(screen_rect.width() * ppp, screen_rect.height() * ppp).and_then(|size| {
            self.textures.get_or_create_texture(
                comp.kind(),
                size,
                || {
                    graphic
                        .rasterize(size)
                        .map_err(|err| TextureGenerationError::GenerationFailed(err.to_string()))
                },
                ui.ctx(),
            )
        });

        match texture {
            Ok(texture_id) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture_id, screen_rect, uv, Color32::WHITE);
            }
            // Zoomed far out or collapsed to nothing: nothing to show
            Err(TextureGenerationError::InvalidDimensions) => {}
            Err(err) => {
                warn!("Drawing {} as placeholder: {}", comp.id(), err);
                painter.rect_filled(screen_rect, 0.0, PLACEHOLDER_FILL);
            }
        }
    }

    /// The in-place label editor just below the graphic. Focus is taken once,
    /// and losing it (blur or Enter) commits the draft.
    fn label_editor(
        &mut self,
        ui: &mut Ui,
        editor: &mut Editor,
        id: ComponentId,
        screen_rect: Rect,
        scale: f32,
    ) -> Option<CanvasAction> {
        let draft = editor.node_mut(id)?.draft_mut()?;
        let rect = Rect::from_min_size(
            screen_rect.left_bottom() + Vec2::new(0.0, LABEL_GAP * scale),
            Vec2::new(screen_rect.width(), EDITOR_HEIGHT),
        );

        let response = ui.put(rect, TextEdit::singleline(draft).id(Id::new(("label_editor", id))));

        if self.focused_edit != Some(id) {
            response.request_focus();
            self.focused_edit = Some(id);
            return None;
        }
        if response.lost_focus() {
            self.focused_edit = None;
            return Some(CanvasAction::CommitEdit(id));
        }
        None
    }
}

fn paint_label(painter: &egui::Painter, comp: &PlacedComponent, viewport: &Viewport, origin: Vec2) {
    if comp.label().is_empty() {
        return;
    }
    painter.text(
        viewport.to_screen(comp.label_anchor()) + origin,
        Align2::LEFT_TOP,
        comp.label(),
        FontId::proportional(LABEL_FONT_SIZE * viewport.scale),
        Color32::BLACK,
    );
}

/// Corner anchors of the selected node; each drives a resize gesture
fn resize_handles(
    ui: &mut Ui,
    editor: &mut Editor,
    comp: &PlacedComponent,
    screen_rect: Rect,
    press_origin: Option<Pos2>,
    to_scene: &dyn Fn(Pos2) -> Pos2,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    for corner in Corner::ALL {
        let handle = ResizeHandle::new(comp.id(), corner, corner.of(screen_rect));
        let response = handle.show(ui);

        let (Some(pointer), Some(node)) = (response.interact_pointer_pos(), editor.node_mut(comp.id())) else {
            continue;
        };
        if response.drag_started() {
            node.begin_resize(comp, handle.corner(), to_scene(press_origin.unwrap_or(pointer)));
        }
        let pointer = to_scene(pointer);
        let command = if response.drag_stopped() {
            node.end_gesture(pointer)
        } else if response.dragged() {
            node.resize_to(pointer)
        } else {
            None
        };
        actions.extend(command.map(CanvasAction::Run));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    #[test]
    fn test_render_empty_and_populated_scene() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::new();
        let mut editor = Editor::new(EditorConfig::default());
        editor.activate_palette(ComponentKind::Rig);
        editor.activate_palette(ComponentKind::Seawater);
        editor.poll_assets();

        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    renderer.render(ui, &mut editor);
                });
            });
        }

        assert_eq!(editor.schematic().len(), 2);
    }
}
