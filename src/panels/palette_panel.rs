use crate::dnd::{DragSource, PaletteItem};
use crate::WellSchematicApp;

/// Component palette: click to add at the default position, or drag onto the canvas
pub fn palette_panel(app: &mut WellSchematicApp, ctx: &egui::Context) {
    egui::SidePanel::left("palette_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Components");
            ui.separator();

            for item in PaletteItem::all() {
                let response = ui
                    .add_sized([ui.available_width(), 24.0], egui::Button::new(item.label()))
                    .interact(egui::Sense::click_and_drag())
                    .on_hover_text("Click to add, or drag onto the canvas");

                response.dnd_set_drag_payload(item.payload());

                if response.clicked() {
                    log::info!("Palette item clicked: {}", item.label());
                    app.editor_mut().activate_palette(item.payload());
                }
            }
        });
}
