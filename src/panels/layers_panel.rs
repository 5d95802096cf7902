use crate::command::Command;
use crate::WellSchematicApp;

pub fn layers_panel(app: &mut WellSchematicApp, ctx: &egui::Context) {
    egui::SidePanel::right("layers_panel")
        .resizable(false)
        .default_width(140.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            let layers = *app.editor().layers();
            for (layer, visible) in layers.iter() {
                let mut checked = visible;
                if ui.checkbox(&mut checked, layer.display_name()).changed() {
                    app.editor_mut()
                        .execute(Command::SetLayerVisible { layer, visible: checked });
                }
            }
        });
}
