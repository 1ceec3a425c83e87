use glam::{DMat4, DVec3, DVec4};

use super::camera::PerspectiveCamera;
use super::scene::{Material, Scene, BOX_FACES};

/// 渲染器抽象：尺寸 + 一次绘制
pub trait Renderer {
    fn set_size(&mut self, width: f32, height: f32);
    fn size(&self) -> (f32, f32);
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}

/// 投影到屏幕像素坐标的面，原点在输出区域左上角
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    pub points: [[f32; 2]; 4],
    pub color: [u8; 3],
    /// 面中心到相机的距离
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLine {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [u8; 3],
}

/// 一帧的绘制结果，由界面层画到 egui 画布上
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedFrame {
    pub background: [u8; 3],
    /// 由远到近排列
    pub faces: Vec<ProjectedFace>,
    pub axes: Vec<ProjectedLine>,
}

/// CPU 投影渲染器
///
/// 对长方体做背面剔除和画家算法排序，结果保存在 [`RenderedFrame`] 中。
#[derive(Debug)]
pub struct PainterRenderer {
    width: f32,
    height: f32,
    frame: RenderedFrame,
    frames_rendered: u64,
}

impl Default for PainterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PainterRenderer {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            frame: RenderedFrame::default(),
            frames_rendered: 0,
        }
    }

    pub fn frame(&self) -> &RenderedFrame {
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// 裁剪空间 → 像素坐标；在相机后方时返回 None
    fn to_screen(&self, view_projection: &DMat4, point: DVec3) -> Option<[f32; 2]> {
        let clip = *view_projection * DVec4::new(point.x, point.y, point.z, 1.0);
        if clip.w.is_nan() || clip.w <= 0.0 {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some([
            ((ndc_x + 1.0) * 0.5 * self.width as f64) as f32,
            ((1.0 - ndc_y) * 0.5 * self.height as f64) as f32,
        ])
    }
}

impl Renderer for PainterRenderer {
    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let view = camera.view_matrix();
        let view_projection = camera.projection_matrix() * view;
        let model = scene.cube.model_matrix();
        let model_view = view * model;

        let world: Vec<DVec3> = scene
            .cube
            .geometry
            .corners()
            .iter()
            .map(|corner| model.transform_point3(*corner))
            .collect();

        let mut faces = Vec::with_capacity(3);
        for (face_index, (indices, normal)) in BOX_FACES.iter().enumerate() {
            let view_normal = model_view.transform_vector3(*normal).normalize();
            let center = indices.iter().map(|i| world[*i]).sum::<DVec3>() / 4.0;
            let view_center = view.transform_point3(center);

            // 背面剔除
            if view_normal.dot(-view_center) <= 0.0 {
                continue;
            }

            let mut points = [[0.0_f32; 2]; 4];
            let mut visible = true;
            for (slot, index) in indices.iter().enumerate() {
                match self.to_screen(&view_projection, world[*index]) {
                    Some(point) => points[slot] = point,
                    None => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }

            let color = match &scene.cube.material {
                Material::Normal => normal_color(view_normal),
                Material::FaceColors(colors) => colors[face_index],
            };

            faces.push(ProjectedFace {
                points,
                color,
                depth: view_center.length(),
            });
        }

        // 画家算法：先画远处
        faces.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(std::cmp::Ordering::Equal));

        let axes = scene
            .axes
            .lines()
            .iter()
            .filter_map(|(end, color)| {
                let from = self.to_screen(&view_projection, DVec3::ZERO)?;
                let to = self.to_screen(&view_projection, *end)?;
                Some(ProjectedLine { from, to, color: *color })
            })
            .collect();

        self.frame = RenderedFrame {
            background: scene.background,
            faces,
            axes,
        };
        self.frames_rendered += 1;
    }
}

/// 法线材质：相机空间法线映射到 RGB
fn normal_color(normal: DVec3) -> [u8; 3] {
    let rgb = (normal * 0.5 + DVec3::splat(0.5)).clamp(DVec3::ZERO, DVec3::ONE) * 255.0;
    [rgb.x.round() as u8, rgb.y.round() as u8, rgb.z.round() as u8]
}
