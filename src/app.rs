use crate::config::EditorConfig;
use crate::event::LoggingHandler;
use crate::layer::LayerVisibility;
use crate::panels;
use crate::renderer::Renderer;
use crate::state::{Editor, LoadOutcome, MemoryStorage};

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct WellSchematicApp {
    /// Layer toggles survive restarts; the scene itself only through Save/Load
    layers: LayerVisibility,
    #[serde(skip)]
    editor: Editor,
    #[serde(skip)]
    renderer: Renderer,
    /// Slot used when eframe runs without persistent storage
    #[serde(skip)]
    fallback_storage: MemoryStorage,
    /// Message shown in the notice modal until dismissed
    #[serde(skip)]
    notice: Option<String>,
}

impl Default for WellSchematicApp {
    fn default() -> Self {
        Self {
            layers: LayerVisibility::default(),
            editor: Editor::default(),
            renderer: Renderer::new(),
            fallback_storage: MemoryStorage::new(),
            notice: None,
        }
    }
}

impl WellSchematicApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.editor = Editor::new(config);
        app.editor.restore_layers(app.layers);
        app.editor.event_bus().subscribe(Box::new(LoggingHandler));
        app
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Draws the canvas for this frame
    pub fn render_canvas(&mut self, ui: &mut egui::Ui) {
        self.renderer.render(ui, &mut self.editor);
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Toolbar "Save"
    pub fn save_schematic(&mut self, frame: &mut eframe::Frame) {
        let result = match frame.storage_mut() {
            Some(storage) => self.editor.save(storage),
            None => self.editor.save(&mut self.fallback_storage),
        };
        match result {
            Ok(_) => self.show_notice("Schematic saved successfully!"),
            Err(err) => {
                log::error!("❌ Save failed: {}", err);
                self.show_notice(format!("Failed to save schematic: {}", err));
            }
        }
    }

    /// Toolbar "Load"
    pub fn load_schematic(&mut self, frame: &mut eframe::Frame) {
        let result = match frame.storage_mut() {
            Some(storage) => self.editor.load(storage),
            None => self.editor.load(&self.fallback_storage),
        };
        match result {
            Ok(LoadOutcome::Loaded { .. }) => self.show_notice("Schematic loaded successfully!"),
            Ok(LoadOutcome::NothingSaved) => self.show_notice("No saved schematic found."),
            Err(err) => {
                log::error!("❌ Load failed: {}", err);
                self.show_notice(format!("Failed to load schematic: {}", err));
            }
        }
    }

    /// Toolbar "Export"
    pub fn export_schematic(&mut self) {
        match self.editor.export_document() {
            Ok(path) => self.show_notice(format!("Schematic exported to {}", path.display())),
            Err(err) => {
                log::error!("❌ Export failed: {}", err);
                self.show_notice(format!("Failed to export schematic: {}", err));
            }
        }
    }

    fn show_notice_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("Close").clicked() {
                    self.dismiss_notice();
                }
            });
    }
}

impl eframe::App for WellSchematicApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.layers = *self.editor.layers();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.editor.poll_assets();
        if self.editor.assets().is_loading() {
            ctx.request_repaint();
        }

        panels::toolbar(self, ctx, frame);
        panels::palette_panel(self, ctx);
        panels::layers_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.show_notice_modal(ctx);
    }
}
