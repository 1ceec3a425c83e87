use glam::{DMat4, DVec3};

/// 透视相机，沿 -Z 方向观察
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// 垂直视场角（度）
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
    projection: DMat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: DVec3::ZERO,
            projection: DMat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// 修改 fov/aspect/near/far 之后必须调用
    pub fn update_projection_matrix(&mut self) {
        self.projection = DMat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> DMat4 {
        self.projection
    }

    /// 世界坐标到相机坐标
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_translation(-self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_follows_aspect() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let square = camera.projection_matrix();

        camera.aspect = 2.0;
        camera.update_projection_matrix();
        let wide = camera.projection_matrix();

        // x 方向缩放与宽高比成反比
        assert!((square.x_axis.x / wide.x_axis.x - 2.0).abs() < 1e-9);
        assert!((square.y_axis.y - wide.y_axis.y).abs() < 1e-12);
    }

    #[test]
    fn test_projection_not_refreshed_without_update() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let before = camera.projection_matrix();
        camera.aspect = 3.0;
        assert_eq!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_view_matrix_moves_world_opposite_to_camera() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        camera.position = DVec3::new(0.0, 0.0, 5.0);

        let origin = camera.view_matrix().transform_point3(DVec3::ZERO);
        assert_eq!(origin, DVec3::new(0.0, 0.0, -5.0));
    }
}
