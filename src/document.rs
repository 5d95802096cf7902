use egui::{Pos2, Rect, Vec2};
use log::{debug, warn};
use std::collections::HashSet;

use crate::element::{ComponentId, ComponentKind, PlacedComponent};
use crate::layer::LayerVisibility;

/// Where components added without a drop point are placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerRule {
    pub base: f32,
    pub step: f32,
}

impl Default for StaggerRule {
    fn default() -> Self {
        Self {
            base: 100.0,
            step: 20.0,
        }
    }
}

impl StaggerRule {
    /// Default position for the item added after `count` existing ones
    pub fn position_for(&self, count: usize) -> Pos2 {
        let offset = self.base + self.step * count as f32;
        Pos2::new(offset, offset)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchematicError {
    #[error("Duplicate component id {0}")]
    DuplicateId(ComponentId),

    #[error("Component {id} is invalid: {reason}")]
    InvalidComponent { id: ComponentId, reason: String },

    #[error("Viewport scale {scale} with offset {offset:?} is not usable")]
    InvalidViewport { scale: f32, offset: Vec2 },
}

/// The ordered collection of placed components.
///
/// Index in the sequence is the stacking order: later items draw on top.
#[derive(Debug, Clone, Default)]
pub struct Schematic {
    components: Vec<PlacedComponent>,
    selected: Option<ComponentId>,
    stagger: StaggerRule,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stagger(stagger: StaggerRule) -> Self {
        Self {
            stagger,
            ..Self::default()
        }
    }

    /// Appends a new component on top and returns its id.
    /// Without a position the staggered default placement is used.
    pub fn add(&mut self, kind: ComponentKind, position: Option<Pos2>) -> ComponentId {
        let position = position.unwrap_or_else(|| self.stagger.position_for(self.components.len()));
        let component = PlacedComponent::new(kind, position);
        let id = component.id();
        debug!("Adding {} at {:?} as {}", kind, position, id);
        self.components.push(component);
        id
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &PlacedComponent> {
        self.components.iter()
    }

    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    pub fn get(&self, id: ComponentId) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    fn get_mut(&mut self, id: ComponentId) -> Option<&mut PlacedComponent> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|c| c.id() == id)
    }

    pub fn selected(&self) -> Option<ComponentId> {
        self.selected
    }

    pub fn selected_component(&self) -> Option<&PlacedComponent> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Selects `id`; ids not in the collection are ignored
    pub fn select(&mut self, id: ComponentId) -> bool {
        if self.index_of(id).is_none() {
            warn!("Ignoring selection of unknown component {}", id);
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Swaps the selected component with the one above it
    pub fn bring_forward(&mut self) -> bool {
        let Some(index) = self.selected.and_then(|id| self.index_of(id)) else {
            return false;
        };
        if index + 1 >= self.components.len() {
            return false;
        }
        self.components.swap(index, index + 1);
        true
    }

    /// Swaps the selected component with the one below it
    pub fn send_backward(&mut self) -> bool {
        let Some(index) = self.selected.and_then(|id| self.index_of(id)) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.components.swap(index, index - 1);
        true
    }

    /// Components on visible layers, in stacking order
    pub fn filter_visible<'a>(
        &'a self,
        layers: &'a LayerVisibility,
    ) -> impl Iterator<Item = &'a PlacedComponent> + 'a {
        self.components
            .iter()
            .filter(move |c| layers.is_visible(c.layer()))
    }

    /// Topmost visible component under a scene point
    pub fn component_at(&self, pos: Pos2, layers: &LayerVisibility) -> Option<ComponentId> {
        self.components
            .iter()
            .rev()
            .filter(|c| layers.is_visible(c.layer()))
            .find(|c| c.hit_test(pos))
            .map(|c| c.id())
    }

    pub fn move_to(&mut self, id: ComponentId, position: Pos2) -> bool {
        match self.get_mut(id) {
            Some(comp) => {
                comp.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, id: ComponentId, rect: Rect) -> bool {
        match self.get_mut(id) {
            Some(comp) => match comp.resize(rect) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Rejected resize of {}: {}", id, err);
                    false
                }
            },
            None => false,
        }
    }

    pub fn set_label(&mut self, id: ComponentId, label: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(comp) => {
                comp.set_label(label);
                true
            }
            None => false,
        }
    }

    /// Gives every component of `kind` that has no size yet its natural size
    pub fn apply_natural_size(&mut self, kind: ComponentKind, natural: Vec2) -> usize {
        self.components
            .iter_mut()
            .filter(|c| c.kind() == kind)
            .map(|c| c.apply_natural_size(natural))
            .filter(|changed| *changed)
            .count()
    }

    /// Discards the current scene and rebuilds it from `components`.
    /// The scene is left untouched if the ids are not unique.
    pub fn replace_all(&mut self, components: Vec<PlacedComponent>) -> Result<(), SchematicError> {
        let mut seen = HashSet::with_capacity(components.len());
        for comp in &components {
            if !seen.insert(comp.id()) {
                return Err(SchematicError::DuplicateId(comp.id()));
            }
        }
        self.components = components;
        self.selected = None;
        Ok(())
    }
}
