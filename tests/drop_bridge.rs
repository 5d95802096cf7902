use egui::{Pos2, Vec2};
use well_schematic::dnd::{DragSource, DropTarget, PaletteItem};
use well_schematic::{Command, ComponentKind, Editor};

#[test]
fn test_palette_lists_every_kind_once() {
    let kinds: Vec<ComponentKind> = PaletteItem::all().map(|item| item.payload()).collect();
    assert_eq!(kinds, ComponentKind::ALL.to_vec());
}

#[test]
fn test_drop_converts_to_scene_coordinates() {
    let mut editor = Editor::default();
    editor.execute(Command::Pan(Vec2::new(40.0, 20.0)));
    editor.execute(Command::ZoomAt { pointer: Pos2::new(40.0, 20.0), direction: 1.0 });

    let screen_point = Pos2::new(250.0, 125.0);
    let expected = editor.viewport().to_scene(screen_point);

    let id = editor.accept(ComponentKind::Rig, screen_point);
    let comp = editor.schematic().get(id).unwrap();
    assert_eq!(comp.position(), expected);
    assert_eq!(comp.kind(), ComponentKind::Rig);
    assert!(editor.node(id).is_some());
}

#[test]
fn test_drop_at_identity_view() {
    let mut editor = Editor::default();
    let id = editor.accept(ComponentKind::Seawater, Pos2::new(333.0, 44.0));
    assert_eq!(editor.schematic().get(id).unwrap().position(), Pos2::new(333.0, 44.0));
}

#[test]
fn test_palette_click_uses_stagger() {
    let mut editor = Editor::default();
    editor.accept(ComponentKind::Rig, Pos2::new(5.0, 5.0));
    let clicked = editor.activate_palette(PaletteItem::new(ComponentKind::SolidLine).payload());

    // One component already placed
    assert_eq!(editor.schematic().get(clicked).unwrap().position(), Pos2::new(120.0, 120.0));
    assert_eq!(editor.schematic().index_of(clicked), Some(1));
}
