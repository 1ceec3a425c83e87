use glam::DVec3;
use log::{debug, info};

use crate::config::{MaterialKind, ViewportConfig};
use super::camera::PerspectiveCamera;
use super::renderer::Renderer;
use super::scene::{AxesHelper, BoxGeometry, Material, Mesh, Scene};

/// 承载渲染输出的容器及其当前像素尺寸
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// 视图上下文：场景、相机与渲染器归同一个对象所有，
/// 读数处理通过它修改立方体姿态并触发绘制。
pub struct ViewportContext<R: Renderer> {
    pub container_id: String,
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    renderer: R,
}

impl<R: Renderer> ViewportContext<R> {
    /// 按容器尺寸创建场景、相机和立方体，并立即绘制一帧
    pub fn initialize(container: &Container, mut renderer: R, config: &ViewportConfig) -> Self {
        let (width, height) = (container.width, container.height);

        let mut camera = PerspectiveCamera::new(
            config.fov_degrees,
            width as f64 / height as f64,
            config.near,
            config.far,
        );
        camera.position = DVec3::new(0.0, 0.0, config.camera_distance);

        renderer.set_size(width, height);

        let [box_width, box_height, box_depth] = config.box_size;
        let material = match config.material {
            MaterialKind::Normal => Material::Normal,
            MaterialKind::FaceColors => Material::FaceColors(config.face_colors),
        };

        let scene = Scene {
            background: config.background,
            cube: Mesh::new(BoxGeometry::new(box_width, box_height, box_depth), material),
            axes: AxesHelper::new(config.axes_size),
        };

        info!("Viewport '{}' initialized at {}x{}", container.id, width, height);

        let mut context = Self {
            container_id: container.id.clone(),
            scene,
            camera,
            renderer,
        };
        context.render();
        context
    }

    /// 容器尺寸变化：更新宽高比与投影矩阵，调整输出尺寸并重绘
    pub fn resize(&mut self, width: f32, height: f32) {
        debug!("Viewport '{}' resized to {}x{}", self.container_id, width, height);

        self.camera.aspect = width as f64 / height as f64;
        self.camera.update_projection_matrix();
        self.renderer.set_size(width, height);
        self.render();
    }

    pub fn render(&mut self) {
        self.renderer.render(&self.scene, &self.camera);
    }

    pub fn cube_mut(&mut self) -> &mut Mesh {
        &mut self.scene.cube
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 记录绘制次数与尺寸的测试渲染器
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub size: (f32, f32),
        pub renders: usize,
        pub last_rotation: Option<DVec3>,
    }

    impl Renderer for RecordingRenderer {
        fn set_size(&mut self, width: f32, height: f32) {
            self.size = (width, height);
        }

        fn size(&self) -> (f32, f32) {
            self.size
        }

        fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) {
            self.renders += 1;
            self.last_rotation = Some(scene.cube.rotation());
        }
    }

    pub fn recording_viewport(width: f32, height: f32) -> ViewportContext<RecordingRenderer> {
        let container = Container {
            id: "3Dcube".to_string(),
            width,
            height,
        };
        ViewportContext::initialize(&container, RecordingRenderer::default(), &ViewportConfig::default())
    }

    #[test]
    fn test_initialize_builds_scene_and_renders_once() {
        let viewport = recording_viewport(800.0, 600.0);

        assert_eq!(viewport.container_id, "3Dcube");
        assert_eq!(viewport.camera.fov, 75.0);
        assert_eq!(viewport.camera.near, 0.1);
        assert_eq!(viewport.camera.far, 1000.0);
        assert_eq!(viewport.camera.position, DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(viewport.camera.aspect, 800.0 / 600.0);
        assert_eq!(viewport.scene.cube.geometry, BoxGeometry::new(6.0, 1.0, 4.0));
        assert_eq!(viewport.scene.axes.size, 5.0);
        assert_eq!(viewport.renderer().size, (800.0, 600.0));
        assert_eq!(viewport.renderer().renders, 1);
    }

    #[test]
    fn test_face_colors_material_from_config() {
        let config = ViewportConfig {
            material: MaterialKind::FaceColors,
            ..ViewportConfig::default()
        };
        let container = Container { id: "3Dcube".into(), width: 10.0, height: 10.0 };
        let viewport = ViewportContext::initialize(&container, RecordingRenderer::default(), &config);

        assert_eq!(viewport.scene.cube.material, Material::FaceColors(config.face_colors));
    }

    #[test]
    fn test_resize_updates_aspect_and_size() {
        let mut viewport = recording_viewport(800.0, 600.0);
        let before = viewport.camera.projection_matrix();

        viewport.resize(1024.0, 512.0);

        assert_eq!(viewport.camera.aspect, 2.0);
        assert_ne!(viewport.camera.projection_matrix(), before);
        assert_eq!(viewport.renderer().size, (1024.0, 512.0));
        assert_eq!(viewport.renderer().renders, 2);
    }

    #[test]
    fn test_zero_size_container_is_degenerate_but_silent() {
        let mut viewport = recording_viewport(800.0, 600.0);
        viewport.resize(0.0, 0.0);

        assert!(viewport.camera.aspect.is_nan());
        assert_eq!(viewport.renderer().size, (0.0, 0.0));
    }
}
