use eframe::egui;
use crate::app::sensor_app::SensorCubeApp;
use crate::stream::ResetCommand;

pub fn render_readings_panel(app: &mut SensorCubeApp, ctx: &egui::Context) {
    let width = app.config.get_config().ui.side_panel_width;

    egui::SidePanel::left("readings_panel")
        .default_width(width)
        .resizable(true)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.heading("Readings");
            ui.label(format!("{} fields", app.state.display.filled()));
            ui.add_space(5.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                app.state.display.ui(ui);

                ui.separator();
                let cube = &app.state.viewport.scene.cube;
                let rotation = cube.rotation();
                let q = cube.quaternion();
                ui.collapsing("Cube", |ui| {
                    ui.monospace(format!(
                        "x {:>8.2}°  y {:>8.2}°  z {:>8.2}°",
                        rotation.x.to_degrees(),
                        rotation.y.to_degrees(),
                        rotation.z.to_degrees(),
                    ));
                    ui.monospace(format!("q ({:.3}, {:.3}, {:.3}, {:.3})", q.x, q.y, q.z, q.w));
                });

                ui.separator();
                ui.label("Device:");
                ui.horizontal_wrapped(|ui| {
                    for command in ResetCommand::ALL {
                        if ui.button(command.label()).clicked() {
                            // 响应被忽略
                            drop(app.commands.send(command));
                        }
                    }
                });
            });
        });
}
