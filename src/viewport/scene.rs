use glam::{DMat4, DQuat, DVec3, EulerRot};

/// 长方体几何，中心位于原点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// 面的顶点下标与外法线，顺序 +x, -x, +y, -y, +z, -z
pub const BOX_FACES: [([usize; 4], DVec3); 6] = [
    ([1, 3, 7, 5], DVec3::X),
    ([0, 4, 6, 2], DVec3::NEG_X),
    ([2, 6, 7, 3], DVec3::Y),
    ([0, 1, 5, 4], DVec3::NEG_Y),
    ([4, 5, 7, 6], DVec3::Z),
    ([0, 2, 3, 1], DVec3::NEG_Z),
];

impl BoxGeometry {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }

    /// 第 i 个角点：bit0 → x，bit1 → y，bit2 → z
    pub fn corners(&self) -> [DVec3; 8] {
        let half = DVec3::new(self.width, self.height, self.depth) * 0.5;
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 != 0 { half.x } else { -half.x },
                if i & 2 != 0 { half.y } else { -half.y },
                if i & 4 != 0 { half.z } else { -half.z },
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// 按相机空间法线着色
    Normal,
    /// 每个面一种颜色，顺序同 [`BOX_FACES`]
    FaceColors([[u8; 3]; 6]),
}

/// 网格对象；欧拉角与四元数始终保持同步
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: Material,
    rotation: DVec3,
    quaternion: DQuat,
}

impl Mesh {
    pub fn new(geometry: BoxGeometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            rotation: DVec3::ZERO,
            quaternion: DQuat::IDENTITY,
        }
    }

    /// 欧拉角 (x, y, z)，XYZ 顺序，弧度
    pub fn rotation(&self) -> DVec3 {
        self.rotation
    }

    pub fn quaternion(&self) -> DQuat {
        self.quaternion
    }

    pub fn set_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.rotation = DVec3::new(x, y, z);
        self.quaternion = DQuat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// 直接替换姿态
    pub fn set_quaternion(&mut self, quaternion: DQuat) {
        self.quaternion = quaternion;
        self.sync_rotation_from_quaternion();
    }

    /// 把旋转左乘到当前姿态上（相对旋转）
    pub fn apply_quaternion(&mut self, quaternion: DQuat) {
        self.quaternion = quaternion * self.quaternion;
        self.sync_rotation_from_quaternion();
    }

    pub fn model_matrix(&self) -> DMat4 {
        let q = if self.quaternion.length_squared() > 0.0 {
            self.quaternion.normalize()
        } else {
            DQuat::IDENTITY
        };
        DMat4::from_quat(q)
    }

    fn sync_rotation_from_quaternion(&mut self) {
        let (x, y, z) = self.quaternion.to_euler(EulerRot::XYZ);
        self.rotation = DVec3::new(x, y, z);
    }
}

/// 坐标轴辅助线：X 红、Y 绿、Z 蓝
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesHelper {
    pub size: f64,
}

impl AxesHelper {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn lines(&self) -> [(DVec3, [u8; 3]); 3] {
        [
            (DVec3::X * self.size, [255, 0, 0]),
            (DVec3::Y * self.size, [0, 255, 0]),
            (DVec3::Z * self.size, [0, 0, 255]),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: [u8; 3],
    pub cube: Mesh,
    pub axes: AxesHelper,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> Mesh {
        Mesh::new(BoxGeometry::new(6.0, 1.0, 4.0), Material::Normal)
    }

    #[test]
    fn test_corners_span_dimensions() {
        let corners = BoxGeometry::new(6.0, 1.0, 4.0).corners();
        assert_eq!(corners[0], DVec3::new(-3.0, -0.5, -2.0));
        assert_eq!(corners[7], DVec3::new(3.0, 0.5, 2.0));
    }

    #[test]
    fn test_face_corners_lie_on_face_plane() {
        let geometry = BoxGeometry::new(6.0, 1.0, 4.0);
        let corners = geometry.corners();
        let half = DVec3::new(3.0, 0.5, 2.0);

        for (indices, normal) in BOX_FACES {
            let offset = (normal * half).length();
            for index in indices {
                assert!((corners[index].dot(normal) - offset).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_set_rotation_is_exact() {
        let mut cube = mesh();
        cube.set_rotation(0.3, 0.1, 0.2);

        assert_eq!(cube.rotation(), DVec3::new(0.3, 0.1, 0.2));
        let expected = DQuat::from_euler(EulerRot::XYZ, 0.3, 0.1, 0.2);
        assert!(cube.quaternion().abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_set_quaternion_replaces_orientation() {
        let mut cube = mesh();
        cube.set_rotation(1.0, 0.0, 0.0);

        let q = DQuat::from_rotation_y(0.5);
        cube.set_quaternion(q);

        assert_eq!(cube.quaternion(), q);
        assert!(cube.rotation().abs_diff_eq(DVec3::new(0.0, 0.5, 0.0), 1e-9));
    }

    #[test]
    fn test_apply_quaternion_composes() {
        let mut cube = mesh();
        cube.set_quaternion(DQuat::from_rotation_z(0.25));
        cube.apply_quaternion(DQuat::from_rotation_z(0.5));

        assert!(cube.quaternion().abs_diff_eq(DQuat::from_rotation_z(0.75), 1e-12));
    }

    #[test]
    fn test_degenerate_quaternion_renders_as_identity() {
        let mut cube = mesh();
        cube.set_quaternion(DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(cube.model_matrix(), DMat4::IDENTITY);
    }
}
