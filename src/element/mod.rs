use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::layer::LayerKey;

// Re-export concrete implementations
mod common;
mod placed;

pub use common::{DEFAULT_LABEL, LABEL_FONT_SIZE, LABEL_GAP, MIN_ELEMENT_SIZE, PLACEHOLDER_SIZE};
pub use placed::PlacedComponent;

/// Stable identifier of a placed component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(Uuid);

impl ComponentId {
    /// Generates a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The fixed set of well components a user can place on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    ConductorCasing,
    FormationNormal,
    OpenHole,
    ProductionCasing,
    ReservoirLayer,
    Seawater,
    SurfaceCasing,
    Rig,
    DashedLine,
    SolidLine,
}

impl ComponentKind {
    /// Every kind, in palette order
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::ConductorCasing,
        ComponentKind::SurfaceCasing,
        ComponentKind::ProductionCasing,
        ComponentKind::FormationNormal,
        ComponentKind::OpenHole,
        ComponentKind::ReservoirLayer,
        ComponentKind::Seawater,
        ComponentKind::Rig,
        ComponentKind::DashedLine,
        ComponentKind::SolidLine,
    ];

    /// The visibility layer this kind belongs to
    pub fn layer(self) -> LayerKey {
        match self {
            ComponentKind::ConductorCasing
            | ComponentKind::ProductionCasing
            | ComponentKind::SurfaceCasing => LayerKey::Casing,
            ComponentKind::FormationNormal => LayerKey::Formation,
            ComponentKind::OpenHole => LayerKey::OpenHole,
            ComponentKind::ReservoirLayer => LayerKey::Reservoir,
            ComponentKind::Seawater | ComponentKind::DashedLine | ComponentKind::SolidLine => {
                LayerKey::Lines
            }
            ComponentKind::Rig => LayerKey::Rig,
        }
    }

    /// Type name, also the stem of the graphic file
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::ConductorCasing => "ConductorCasing",
            ComponentKind::FormationNormal => "FormationNormal",
            ComponentKind::OpenHole => "OpenHole",
            ComponentKind::ProductionCasing => "ProductionCasing",
            ComponentKind::ReservoirLayer => "ReservoirLayer",
            ComponentKind::Seawater => "Seawater",
            ComponentKind::SurfaceCasing => "SurfaceCasing",
            ComponentKind::Rig => "Rig",
            ComponentKind::DashedLine => "DashedLine",
            ComponentKind::SolidLine => "SolidLine",
        }
    }

    /// File name of the graphic, e.g. `Rig.svg`
    pub fn asset_file_name(self) -> String {
        format!("{}.svg", self.name())
    }

    /// Human readable name for the palette
    pub fn display_name(self) -> &'static str {
        match self {
            ComponentKind::ConductorCasing => "Conductor Casing",
            ComponentKind::FormationNormal => "Formation",
            ComponentKind::OpenHole => "Open Hole",
            ComponentKind::ProductionCasing => "Production Casing",
            ComponentKind::ReservoirLayer => "Reservoir Layer",
            ComponentKind::Seawater => "Seawater",
            ComponentKind::SurfaceCasing => "Surface Casing",
            ComponentKind::Rig => "Rig",
            ComponentKind::DashedLine => "Dashed Line",
            ComponentKind::SolidLine => "Solid Line",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_listed_once() {
        let unique: HashSet<_> = ComponentKind::ALL.iter().collect();
        assert_eq!(unique.len(), ComponentKind::ALL.len());
    }

    #[test]
    fn test_layer_mapping() {
        assert_eq!(ComponentKind::SurfaceCasing.layer(), LayerKey::Casing);
        assert_eq!(ComponentKind::Seawater.layer(), LayerKey::Lines);
        assert_eq!(ComponentKind::OpenHole.layer(), LayerKey::OpenHole);
        assert_eq!(ComponentKind::Rig.layer(), LayerKey::Rig);
    }

    #[test]
    fn test_kind_serializes_by_name() {
        let json = serde_json::to_string(&ComponentKind::ReservoirLayer).unwrap();
        assert_eq!(json, "\"ReservoirLayer\"");
        assert_eq!(ComponentKind::DashedLine.asset_file_name(), "DashedLine.svg");
    }
}
