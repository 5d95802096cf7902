use crate::command::Command;
use crate::WellSchematicApp;

pub fn toolbar(app: &mut WellSchematicApp, ctx: &egui::Context, frame: &mut eframe::Frame) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                app.save_schematic(frame);
            }
            if ui.button("Load").clicked() {
                app.load_schematic(frame);
            }
            if ui.button("Export PDF").clicked() {
                app.export_schematic();
            }

            ui.separator();

            let has_selection = app.editor().schematic().selected().is_some();
            if ui.add_enabled(has_selection, egui::Button::new("Bring Forward")).clicked() {
                app.editor_mut().execute(Command::BringForward);
            }
            if ui.add_enabled(has_selection, egui::Button::new("Send Backward")).clicked() {
                app.editor_mut().execute(Command::SendBackward);
            }

            ui.separator();
            ui.label(format!(
                "{} component(s) · zoom {:.0}%",
                app.editor().schematic().len(),
                app.editor().viewport().scale * 100.0
            ));
        });
    });
}
