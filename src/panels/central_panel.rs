use crate::WellSchematicApp;

pub fn central_panel(app: &mut WellSchematicApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            app.render_canvas(ui);
        });
}
