use std::collections::HashSet;

use egui::Pos2;
use well_schematic::{ComponentId, ComponentKind, LayerKey, LayerVisibility, Schematic};

fn ids(schematic: &Schematic) -> Vec<ComponentId> {
    schematic.iter().map(|c| c.id()).collect()
}

#[test]
fn test_added_ids_are_distinct() {
    let mut schematic = Schematic::new();
    let mut seen = HashSet::new();
    for i in 0..50 {
        let kind = ComponentKind::ALL[i % ComponentKind::ALL.len()];
        assert!(seen.insert(schematic.add(kind, None)));
    }
    assert_eq!(schematic.len(), 50);
}

#[test]
fn test_default_positions_are_staggered() {
    let mut schematic = Schematic::new();
    let first = schematic.add(ComponentKind::Rig, None);
    let second = schematic.add(ComponentKind::Seawater, None);
    let dropped = schematic.add(ComponentKind::OpenHole, Some(Pos2::new(7.0, 9.0)));

    assert_eq!(schematic.get(first).unwrap().position(), Pos2::new(100.0, 100.0));
    assert_eq!(schematic.get(second).unwrap().position(), Pos2::new(120.0, 120.0));
    assert_eq!(schematic.get(dropped).unwrap().position(), Pos2::new(7.0, 9.0));
}

#[test]
fn test_new_components_have_defaults() {
    let mut schematic = Schematic::new();
    let id = schematic.add(ComponentKind::ProductionCasing, None);
    let comp = schematic.get(id).unwrap();
    assert_eq!(comp.label(), "Label");
    assert_eq!(comp.explicit_size(), None);
    assert_eq!(comp.layer(), LayerKey::Casing);
    assert_eq!(schematic.index_of(id), Some(0));
}

#[test]
fn test_forward_then_backward_restores_order() {
    let mut schematic = Schematic::new();
    let a = schematic.add(ComponentKind::Rig, None);
    let b = schematic.add(ComponentKind::Seawater, None);
    let c = schematic.add(ComponentKind::OpenHole, None);
    let original = ids(&schematic);

    schematic.select(b);
    assert!(schematic.bring_forward());
    assert_eq!(ids(&schematic), vec![a, c, b]);
    assert!(schematic.send_backward());
    assert_eq!(ids(&schematic), original);

    assert!(schematic.send_backward());
    assert_eq!(ids(&schematic), vec![b, a, c]);
    assert!(schematic.bring_forward());
    assert_eq!(ids(&schematic), original);
}

#[test]
fn test_reorder_at_boundaries_is_noop() {
    let mut schematic = Schematic::new();
    let bottom = schematic.add(ComponentKind::Rig, None);
    let top = schematic.add(ComponentKind::Seawater, None);
    let original = ids(&schematic);

    assert!(!schematic.bring_forward(), "nothing selected");

    schematic.select(top);
    assert!(!schematic.bring_forward());
    schematic.select(bottom);
    assert!(!schematic.send_backward());
    assert_eq!(ids(&schematic), original);
}

#[test]
fn test_selecting_unknown_id_is_noop() {
    let mut schematic = Schematic::new();
    let id = schematic.add(ComponentKind::Rig, None);
    schematic.select(id);

    assert!(!schematic.select(ComponentId::new()));
    assert_eq!(schematic.selected(), Some(id));

    schematic.deselect();
    assert_eq!(schematic.selected(), None);
}

#[test]
fn test_hidden_layer_filters_only_its_items() {
    let mut schematic = Schematic::new();
    for kind in [
        ComponentKind::ConductorCasing,
        ComponentKind::Rig,
        ComponentKind::SurfaceCasing,
        ComponentKind::Rig,
        ComponentKind::ProductionCasing,
    ] {
        schematic.add(kind, None);
    }

    let mut layers = LayerVisibility::default();
    assert_eq!(schematic.filter_visible(&layers).count(), 5);

    layers.set_visible(LayerKey::Casing, false);
    let visible: Vec<_> = schematic.filter_visible(&layers).collect();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|c| c.kind() == ComponentKind::Rig));
    assert_eq!(schematic.len(), 5);
}

#[test]
fn test_component_at_prefers_topmost_visible() {
    let mut schematic = Schematic::new();
    let below = schematic.add(ComponentKind::Rig, Some(Pos2::new(0.0, 0.0)));
    let above = schematic.add(ComponentKind::SurfaceCasing, Some(Pos2::new(50.0, 50.0)));
    let mut layers = LayerVisibility::default();

    let overlap = Pos2::new(75.0, 75.0);
    assert_eq!(schematic.component_at(overlap, &layers), Some(above));

    layers.set_visible(LayerKey::Casing, false);
    assert_eq!(schematic.component_at(overlap, &layers), Some(below));
    assert_eq!(schematic.component_at(Pos2::new(500.0, 500.0), &layers), None);
}
