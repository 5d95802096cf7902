use serde::{Deserialize, Serialize};
use std::fmt;

/// A named visibility group of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKey {
    Reservoir,
    Casing,
    Lines,
    Rig,
    Formation,
    OpenHole,
}

impl LayerKey {
    pub const ALL: [LayerKey; 6] = [
        LayerKey::Reservoir,
        LayerKey::Casing,
        LayerKey::Lines,
        LayerKey::Rig,
        LayerKey::Formation,
        LayerKey::OpenHole,
    ];

    /// Label shown next to the layer toggle
    pub fn display_name(self) -> &'static str {
        match self {
            LayerKey::Reservoir => "Reservoir",
            LayerKey::Casing => "Casing",
            LayerKey::Lines => "Lines",
            LayerKey::Rig => "Rig",
            LayerKey::Formation => "Formation",
            LayerKey::OpenHole => "Open Hole",
        }
    }

    fn index(self) -> usize {
        match self {
            LayerKey::Reservoir => 0,
            LayerKey::Casing => 1,
            LayerKey::Lines => 2,
            LayerKey::Rig => 3,
            LayerKey::Formation => 4,
            LayerKey::OpenHole => 5,
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which layers are currently drawn. Only affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    visible: [bool; 6],
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::all_visible()
    }
}

impl LayerVisibility {
    pub fn all_visible() -> Self {
        Self { visible: [true; 6] }
    }

    pub fn is_visible(&self, layer: LayerKey) -> bool {
        self.visible[layer.index()]
    }

    pub fn set_visible(&mut self, layer: LayerKey, visible: bool) {
        self.visible[layer.index()] = visible;
    }

    /// Flips one layer and returns its new visibility
    pub fn toggle(&mut self, layer: LayerKey) -> bool {
        let slot = &mut self.visible[layer.index()];
        *slot = !*slot;
        *slot
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerKey, bool)> + '_ {
        LayerKey::ALL.iter().map(|&key| (key, self.is_visible(key)))
    }
}
