use std::cell::RefCell;
use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};
use well_schematic::event::{ComponentEvent, EditorEvent, EventHandler, SelectionEvent};
use well_schematic::{Command, ComponentKind, Editor, LayerKey};

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventHandler for Recorder {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn recording_editor() -> (Editor, Rc<RefCell<Vec<EditorEvent>>>) {
    let editor = Editor::default();
    let events = Rc::new(RefCell::new(Vec::new()));
    editor.event_bus().subscribe(Box::new(Recorder { events: Rc::clone(&events) }));
    (editor, events)
}

#[test]
fn test_add_and_select_emit_events() {
    let (mut editor, events) = recording_editor();
    let id = editor
        .execute(Command::AddComponent { kind: ComponentKind::OpenHole, position: None })
        .unwrap();
    editor.execute(Command::Select(id));
    // Selecting the same component again changes nothing
    editor.execute(Command::Select(id));
    editor.execute(Command::Deselect);
    editor.execute(Command::Deselect);

    assert_eq!(
        *events.borrow(),
        vec![
            EditorEvent::ComponentChanged(ComponentEvent::Added {
                id,
                kind: ComponentKind::OpenHole,
                position: Pos2::new(100.0, 100.0),
            }),
            EditorEvent::SelectionChanged(SelectionEvent::Selected(id)),
            EditorEvent::SelectionChanged(SelectionEvent::Cleared),
        ]
    );
}

#[test]
fn test_reorder_without_selection_is_silent() {
    let (mut editor, events) = recording_editor();
    editor.activate_palette(ComponentKind::Rig);
    editor.activate_palette(ComponentKind::Seawater);
    events.borrow_mut().clear();

    editor.execute(Command::BringForward);
    editor.execute(Command::SendBackward);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_reorder_reports_indices() {
    let (mut editor, events) = recording_editor();
    let bottom = editor.activate_palette(ComponentKind::Rig);
    editor.activate_palette(ComponentKind::Seawater);
    editor.execute(Command::Select(bottom));
    events.borrow_mut().clear();

    editor.execute(Command::BringForward);
    assert_eq!(
        *events.borrow(),
        vec![EditorEvent::ComponentChanged(ComponentEvent::Reordered {
            id: bottom,
            old_index: 0,
            new_index: 1,
        })]
    );
}

#[test]
fn test_resize_below_minimum_is_rejected() {
    let (mut editor, events) = recording_editor();
    let id = editor.activate_palette(ComponentKind::Rig);
    events.borrow_mut().clear();

    let tiny = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(4.0, 4.0));
    editor.execute(Command::ResizeComponent { id, rect: tiny });

    assert!(events.borrow().is_empty());
    assert_ne!(editor.schematic().get(id).unwrap().size(), Vec2::new(4.0, 4.0));
}

#[test]
fn test_layer_toggle_only_changes_visibility() {
    let (mut editor, events) = recording_editor();
    editor.activate_palette(ComponentKind::SurfaceCasing);
    events.borrow_mut().clear();

    editor.execute(Command::SetLayerVisible { layer: LayerKey::Casing, visible: false });
    editor.execute(Command::SetLayerVisible { layer: LayerKey::Casing, visible: false });

    assert_eq!(
        *events.borrow(),
        vec![EditorEvent::LayerVisibilityChanged { layer: LayerKey::Casing, visible: false }]
    );
    assert_eq!(editor.schematic().len(), 1);
    assert_eq!(editor.schematic().filter_visible(editor.layers()).count(), 0);
}

#[test]
fn test_view_commands() {
    let (mut editor, events) = recording_editor();
    editor.execute(Command::Pan(Vec2::new(12.0, -3.0)));
    editor.execute(Command::ZoomAt { pointer: Pos2::new(0.0, 0.0), direction: -1.0 });

    let expected = Vec2::new(12.0, -3.0) / 1.05;
    assert!((editor.viewport().offset - expected).length() < 1e-4);
    assert_eq!(events.borrow().len(), 2);
}
