/// The editor controller: the only owner of the scene.
///
/// Views get read-only access to the schematic, the viewport and the layer
/// visibility, and hand back [`Command`]s. The editor runs them, keeps one
/// [`SceneNode`] per placed component, and drives the asset loads those
/// nodes draw from.
use egui::{Pos2, Vec2};
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::{AssetCompletion, AssetLoader, AssetSource, BundledAssets, DirectoryAssets};
use crate::command::{self, Command, CommandContext};
use crate::config::EditorConfig;
use crate::dnd::DropTarget;
use crate::document::{Schematic, StaggerRule};
use crate::element::{ComponentId, ComponentKind};
use crate::event::{AssetEvent, DocumentEvent, EditorEvent, EventBus, SelectionEvent};
use crate::export::{self, ExportError, ExportSettings};
use crate::layer::LayerVisibility;
use crate::node::SceneNode;
use crate::viewport::{Viewport, ZoomLimits};

use super::persistence::{self, LoadOutcome, PersistenceResult, SceneSnapshot, SlotStorage};

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    schematic: Schematic,
    viewport: Viewport,
    layers: LayerVisibility,
    zoom: ZoomLimits,
    event_bus: EventBus,
    nodes: HashMap<ComponentId, SceneNode>,
    assets: AssetLoader,
    /// Size of the canvas as last drawn, in screen points
    canvas_size: Vec2,
}

impl Editor {
    /// Graphics come from `config.asset_dir` when set, otherwise from the binary
    pub fn new(config: EditorConfig) -> Self {
        match config.asset_dir.clone() {
            Some(dir) => Self::with_assets(config, DirectoryAssets::new(dir)),
            None => Self::with_assets(config, BundledAssets),
        }
    }

    pub fn with_assets(config: EditorConfig, source: impl AssetSource + 'static) -> Self {
        let stagger = StaggerRule {
            base: config.stagger_base,
            step: config.stagger_step,
        };
        Self {
            zoom: ZoomLimits::from(&config),
            schematic: Schematic::with_stagger(stagger),
            viewport: Viewport::default(),
            layers: LayerVisibility::default(),
            event_bus: EventBus::new(),
            nodes: HashMap::new(),
            assets: AssetLoader::new(source),
            canvas_size: config.canvas_size,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layers(&self) -> &LayerVisibility {
        &self.layers
    }

    /// Restores layer visibility kept by the app between runs
    pub fn restore_layers(&mut self, layers: LayerVisibility) {
        self.layers = layers;
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Records the on-screen canvas size so exports match what is shown
    pub fn set_canvas_size(&mut self, size: Vec2) {
        if size.x >= 1.0 && size.y >= 1.0 && size.is_finite() {
            self.canvas_size = size;
        }
    }

    /// Export of the canvas as currently shown, at the configured multiplier
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            canvas_size: self.canvas_size,
            ..ExportSettings::from(&self.config)
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    pub fn node(&self, id: ComponentId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: ComponentId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    fn context(&mut self) -> CommandContext<'_> {
        CommandContext {
            schematic: &mut self.schematic,
            viewport: &mut self.viewport,
            layers: &mut self.layers,
            zoom: &self.zoom,
            event_bus: &self.event_bus,
        }
    }

    /// Runs a command against the scene. Returns the id of an added component.
    pub fn execute(&mut self, command: Command) -> Option<ComponentId> {
        let added = command.execute(&mut self.context());
        if let Some(id) = added {
            self.track(id);
        }
        added
    }

    /// Adds a component and creates its node. `None` uses the staggered default position.
    pub fn add_component(&mut self, kind: ComponentKind, position: Option<Pos2>) -> ComponentId {
        let id = command::add_component(&mut self.context(), kind, position);
        self.track(id);
        id
    }

    /// A click on a palette entry
    pub fn activate_palette(&mut self, kind: ComponentKind) -> ComponentId {
        self.add_component(kind, None)
    }

    /// Creates the node for a new component and starts loading its graphic
    fn track(&mut self, id: ComponentId) {
        let Some(kind) = self.schematic.get(id).map(|c| c.kind()) else {
            return;
        };
        self.nodes.insert(id, SceneNode::new(id));
        self.assets.request(kind);
        // Graphic may already be known from an earlier component of this kind
        if let Some(graphic) = self.assets.graphic(kind) {
            let natural = graphic.natural_size();
            self.schematic.apply_natural_size(kind, natural);
        }
    }

    /// Double click on a node: selects it and opens the label editor
    pub fn begin_edit(&mut self, id: ComponentId) {
        let Some(component) = self.schematic.get(id) else {
            return;
        };
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let was_editing = node.is_editing();
        let select = node.on_double_click(component);
        self.execute(select);
        if !was_editing {
            self.event_bus
                .emit(EditorEvent::SelectionChanged(SelectionEvent::EditStarted(id)));
        }
    }

    /// Blur or Enter in the label editor
    pub fn commit_edit(&mut self, id: ComponentId) {
        let Some(set_label) = self.nodes.get_mut(&id).and_then(SceneNode::commit_edit) else {
            return;
        };
        self.execute(set_label);
        self.event_bus
            .emit(EditorEvent::SelectionChanged(SelectionEvent::EditCommitted(id)));
    }

    /// Drives pending graphic loads. Finished loads size every component of
    /// their kind that has no size yet.
    pub fn poll_assets(&mut self) {
        for completion in self.assets.poll() {
            match completion {
                AssetCompletion::Loaded { kind, natural_size } => {
                    let sized = self.schematic.apply_natural_size(kind, natural_size);
                    if sized > 0 {
                        info!("Sized {} {} component(s) from their graphic", sized, kind);
                    }
                    self.event_bus.emit(EditorEvent::AssetChanged(AssetEvent::Loaded {
                        kind,
                        natural_size,
                    }));
                }
                AssetCompletion::Failed { kind, reason } => {
                    self.event_bus
                        .emit(EditorEvent::AssetChanged(AssetEvent::Failed { kind, reason }));
                }
            }
        }
    }

    /// Writes the whole scene into the configured slot. Returns the component count.
    pub fn save(&self, storage: &mut (impl SlotStorage + ?Sized)) -> PersistenceResult<usize> {
        let snapshot = SceneSnapshot::new(self.schematic.components().to_vec(), self.viewport);
        persistence::save_snapshot(storage, &self.config.storage_key, &snapshot)?;

        let components = snapshot.components.len();
        info!("💾 Saved {} component(s) to '{}'", components, self.config.storage_key);
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Saved { components }));
        Ok(components)
    }

    /// Replaces the scene with the one in the configured slot.
    /// On any error, or when nothing was saved, the scene is unchanged.
    pub fn load(&mut self, storage: &(impl SlotStorage + ?Sized)) -> PersistenceResult<LoadOutcome> {
        let Some(snapshot) = persistence::load_snapshot(storage, &self.config.storage_key)? else {
            info!("No saved schematic in '{}'", self.config.storage_key);
            self.event_bus
                .emit(EditorEvent::DocumentChanged(DocumentEvent::NothingToLoad));
            return Ok(LoadOutcome::NothingSaved);
        };

        self.schematic.replace_all(snapshot.components)?;
        self.viewport = snapshot.viewport;

        self.nodes.clear();
        let ids: Vec<ComponentId> = self.schematic.iter().map(|c| c.id()).collect();
        for id in ids {
            self.track(id);
        }

        let components = self.schematic.len();
        info!("📂 Loaded {} component(s) from '{}'", components, self.config.storage_key);
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded { components }));
        Ok(LoadOutcome::Loaded { components })
    }

    /// Writes the visible canvas as a PDF into `dir`
    pub fn export_to(&self, dir: &std::path::Path) -> Result<PathBuf, ExportError> {
        let path = export::export_document(
            &self.schematic,
            &self.layers,
            &self.viewport,
            &self.assets,
            &self.export_settings(),
            dir,
            &self.config.export_file_name,
        )?;
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Exported { path: path.clone() }));
        Ok(path)
    }

    /// Writes the visible canvas as a PDF into the download directory
    pub fn export_document(&self) -> Result<PathBuf, ExportError> {
        self.export_to(&export::default_export_dir())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DropTarget for Editor {
    fn accept(&mut self, payload: ComponentKind, screen_point: Pos2) -> ComponentId {
        let scene_point = self.viewport.to_scene(screen_point);
        if !scene_point.x.is_finite() || !scene_point.y.is_finite() {
            warn!("Drop at {:?} has no scene position, using default placement", screen_point);
            return self.add_component(payload, None);
        }
        self.add_component(payload, Some(scene_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::persistence::MemoryStorage;

    fn editor() -> Editor {
        Editor::new(EditorConfig::default())
    }

    #[test]
    fn test_every_component_has_a_node() {
        let mut editor = editor();
        let a = editor.activate_palette(ComponentKind::Rig);
        let b = editor
            .execute(Command::AddComponent { kind: ComponentKind::OpenHole, position: None })
            .unwrap();
        assert!(editor.node(a).is_some());
        assert!(editor.node(b).is_some());
    }

    #[test]
    fn test_graphic_sizes_components_after_poll() {
        let mut editor = editor();
        let id = editor.activate_palette(ComponentKind::Seawater);
        assert_eq!(editor.schematic().get(id).unwrap().explicit_size(), None);

        editor.poll_assets();
        assert!(editor.schematic().get(id).unwrap().explicit_size().is_some());

        // Already loaded: sized right away
        let second = editor.activate_palette(ComponentKind::Seawater);
        assert!(editor.schematic().get(second).unwrap().explicit_size().is_some());
    }

    #[test]
    fn test_edit_commits_label() {
        let mut editor = editor();
        let id = editor.activate_palette(ComponentKind::Rig);
        editor.begin_edit(id);
        assert_eq!(editor.schematic().selected(), Some(id));

        if let Some(draft) = editor.node_mut(id).and_then(SceneNode::draft_mut) {
            *draft = "Jack-up rig".to_owned();
        }
        editor.commit_edit(id);

        assert_eq!(editor.schematic().get(id).unwrap().label(), "Jack-up rig");
        assert!(!editor.node(id).unwrap().is_editing());
    }

    #[test]
    fn test_load_restores_viewport_and_clears_selection() {
        let mut editor = editor();
        let mut storage = MemoryStorage::new();
        let id = editor.activate_palette(ComponentKind::Rig);
        editor.execute(Command::Pan(Vec2::new(30.0, -10.0)));
        editor.save(&mut storage).unwrap();

        editor.execute(Command::Pan(Vec2::new(100.0, 100.0)));
        editor.execute(Command::Select(id));
        let outcome = editor.load(&storage).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { components: 1 });
        assert_eq!(editor.viewport().offset, Vec2::new(30.0, -10.0));
        assert_eq!(editor.schematic().selected(), None);
        assert!(editor.node(id).is_some());
    }

    #[test]
    fn test_export_follows_drawn_canvas() {
        let mut editor = editor();
        assert_eq!(editor.export_settings().pixel_size(), [2400, 2400]);

        editor.set_canvas_size(Vec2::new(830.0, 850.0));
        assert_eq!(editor.export_settings().pixel_size(), [2490, 2550]);

        // Collapsed panels keep the last usable size
        editor.set_canvas_size(Vec2::ZERO);
        assert_eq!(editor.canvas_size(), Vec2::new(830.0, 850.0));
    }

    #[test]
    fn test_export_writes_pdf() {
        let mut editor = Editor::new(EditorConfig {
            canvas_size: Vec2::new(40.0, 40.0),
            export_file_name: format!("well-schematic-test-{}.pdf", ComponentId::new()),
            ..EditorConfig::default()
        });
        editor.activate_palette(ComponentKind::SolidLine);

        let dir = std::env::temp_dir();
        let path = editor.export_to(&dir).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(path);
    }
}
