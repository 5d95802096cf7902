use egui::{Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use super::common::{self, DEFAULT_LABEL, LABEL_FONT_SIZE, LABEL_GAP, PLACEHOLDER_SIZE};
use super::{ComponentId, ComponentKind};
use crate::layer::LayerKey;

/// A component placed on the schematic canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    id: ComponentId,
    #[serde(rename = "type")]
    kind: ComponentKind,
    position: Pos2,
    /// `None` until the graphic's natural size is known
    #[serde(default)]
    size: Option<Vec2>,
    label: String,
}

impl PlacedComponent {
    pub fn new(kind: ComponentKind, position: Pos2) -> Self {
        Self {
            id: ComponentId::new(),
            kind,
            position,
            size: None,
            label: DEFAULT_LABEL.to_owned(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn layer(&self) -> LayerKey {
        self.kind.layer()
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    /// Explicit size, if one has been set
    pub fn explicit_size(&self) -> Option<Vec2> {
        self.size
    }

    /// Size used for drawing, falling back to the placeholder
    pub fn size(&self) -> Vec2 {
        self.size.unwrap_or(PLACEHOLDER_SIZE)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bounding rectangle of the graphic in scene space
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    /// Where the label text sits, just below the graphic
    pub fn label_anchor(&self) -> Pos2 {
        Pos2::new(self.position.x, self.position.y + self.size().y + LABEL_GAP)
    }

    /// Graphic plus label line
    pub fn bounds_with_label(&self) -> Rect {
        let rect = self.rect();
        Rect::from_min_max(
            rect.min,
            Pos2::new(rect.max.x, rect.max.y + LABEL_GAP + LABEL_FONT_SIZE),
        )
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.bounds_with_label().contains(pos)
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Adopts the graphic's natural size unless a size is already set.
    /// Returns true if the size changed.
    pub fn apply_natural_size(&mut self, natural: Vec2) -> bool {
        if self.size.is_some() {
            return false;
        }
        self.size = Some(natural);
        true
    }

    /// Checks a component that came from outside the editor, such as a saved scene
    pub fn validate(&self) -> Result<(), String> {
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(format!("Position is not finite: {:?}", self.position));
        }
        match self.size {
            Some(_) => common::validate_rect(&self.rect()),
            None => Ok(()),
        }
    }

    /// Moves and resizes to the given rectangle
    pub fn resize(&mut self, new_rect: Rect) -> Result<(), String> {
        common::validate_rect(&new_rect)?;

        self.position = new_rect.min;
        self.size = Some(new_rect.size());

        debug!("Component {} resized: pos={:?}, size={:?}", self.id, self.position, new_rect.size());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_component_defaults() {
        let comp = PlacedComponent::new(ComponentKind::Rig, Pos2::new(10.0, 20.0));
        assert_eq!(comp.label(), "Label");
        assert_eq!(comp.explicit_size(), None);
        assert_eq!(comp.rect(), Rect::from_min_size(Pos2::new(10.0, 20.0), PLACEHOLDER_SIZE));
    }

    #[test]
    fn test_validate_rejects_undersized_and_non_finite() {
        let mut comp = PlacedComponent::new(ComponentKind::Rig, Pos2::ZERO);
        assert!(comp.validate().is_ok());

        comp.size = Some(Vec2::new(-50.0, -50.0));
        assert!(comp.validate().is_err());

        comp.size = Some(Vec2::new(40.0, f32::NAN));
        assert!(comp.validate().is_err());

        comp.size = None;
        comp.position = Pos2::new(f32::INFINITY, 0.0);
        assert!(comp.validate().is_err());
    }

    #[test]
    fn test_natural_size_only_applies_once() {
        let mut comp = PlacedComponent::new(ComponentKind::Rig, Pos2::ZERO);
        assert!(comp.apply_natural_size(Vec2::new(40.0, 60.0)));
        assert!(!comp.apply_natural_size(Vec2::new(1.0, 1.0)));
        assert_eq!(comp.size(), Vec2::new(40.0, 60.0));
    }

    #[test]
    fn test_resize_rejects_tiny_rect() {
        let mut comp = PlacedComponent::new(ComponentKind::Rig, Pos2::ZERO);
        let result = comp.resize(Rect::from_min_size(Pos2::ZERO, Vec2::new(2.0, 50.0)));
        assert!(result.unwrap_err().contains("too small"));
        assert_eq!(comp.explicit_size(), None);
    }

    #[test]
    fn test_label_is_part_of_hit_area() {
        let comp = PlacedComponent::new(ComponentKind::Rig, Pos2::ZERO);
        assert!(comp.hit_test(Pos2::new(5.0, 110.0)));
        assert!(!comp.hit_test(Pos2::new(5.0, 130.0)));
    }

    #[test]
    fn test_serialized_field_names() {
        let comp = PlacedComponent::new(ComponentKind::OpenHole, Pos2::new(1.0, 2.0));
        let value = serde_json::to_value(&comp).unwrap();
        assert_eq!(value["type"], "OpenHole");
        assert_eq!(value["label"], "Label");
    }
}
