use crate::app::sensor_app::SensorCubeApp;
use crate::viewport::{RenderedFrame, Renderer};

pub fn render_cube_panel(app: &mut SensorCubeApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let viewport = &mut app.state.viewport;
            let container_id = viewport.container_id.clone();

            ui.push_id(container_id, |ui| {
                let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                // 容器尺寸变化时 resize
                let (width, height) = viewport.renderer().size();
                if (width - rect.width()).abs() > 0.5 || (height - rect.height()).abs() > 0.5 {
                    viewport.resize(rect.width(), rect.height());
                }

                if rect.width() < 1.0 || rect.height() < 1.0 {
                    return;
                }

                paint_frame(&ui.painter_at(rect), rect, viewport.renderer().frame());
            });
        });
}

fn paint_frame(painter: &egui::Painter, rect: egui::Rect, frame: &RenderedFrame) {
    let to_pos = |point: [f32; 2]| rect.min + egui::vec2(point[0], point[1]);
    let color = |rgb: [u8; 3]| egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);

    painter.rect_filled(rect, 0.0, color(frame.background));

    // 先画坐标轴，立方体会遮住其内部部分
    for line in &frame.axes {
        painter.line_segment([to_pos(line.from), to_pos(line.to)], egui::Stroke::new(1.5, color(line.color)));
    }

    for face in &frame.faces {
        let points: Vec<egui::Pos2> = face.points.iter().map(|p| to_pos(*p)).collect();
        painter.add(egui::Shape::convex_polygon(
            points,
            color(face.color),
            egui::Stroke::new(1.0, egui::Color32::from_black_alpha(60)),
        ));
    }
}
