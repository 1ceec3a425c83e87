use eframe::egui;
use crate::app::sensor_app::SensorCubeApp;
use crate::types::{QuaternionMode, ReadyState, TiltUnits};
use crate::utils::format_clock;

pub fn render_status_bar(app: &mut SensorCubeApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Events:");

                let connection = &app.state.connection;
                let status_color = match connection.ready_state {
                    ReadyState::Connecting => egui::Color32::from_rgb(255, 165, 0), // 橙色
                    ReadyState::Open => egui::Color32::from_rgb(0, 150, 0),        // 绿色
                    ReadyState::Closed => egui::Color32::from_rgb(150, 0, 0),      // 红色
                };
                ui.colored_label(status_color, connection.ready_state.label());

                ui.separator();
                ui.label(format!("Received: {}", connection.events_received));
                ui.label(format!("Readings: {}", connection.readings_applied));
                ui.label(format!("Frames: {}", app.state.viewport.renderer().frames_rendered()));
                if connection.decode_failures > 0 {
                    ui.colored_label(
                        egui::Color32::from_rgb(150, 0, 0),
                        format!("Decode errors: {}", connection.decode_failures),
                    );
                }

                if let Some(id) = &connection.last_event_id {
                    ui.label(format!("Event id: {}", id));
                }

                ui.separator();
                match &connection.last_reading_at {
                    Some(time) => ui.label(format!("Last reading: {}", format_clock(time))),
                    None => ui.label("waiting for data..."),
                };

                if connection.ready_state != ReadyState::Open {
                    if let Some(error) = &connection.last_error {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(150, 0, 0), error);
                    }
                }

                // 最右边显示解析策略
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let policy = &app.state.policy;
                    let mode = match policy.quaternion_mode {
                        QuaternionMode::Absolute => "absolute",
                        QuaternionMode::Cumulative => "cumulative",
                    };
                    ui.label(format!("Quaternion: {}", mode));
                    ui.separator();
                    let units = match policy.tilt_units {
                        TiltUnits::Radians => "rad",
                        TiltUnits::Degrees => "deg",
                    };
                    ui.label(format!("Tilt units: {}", units));
                });
            });
            ui.add_space(5.0);
        });
}
