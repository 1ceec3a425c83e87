use serde::{Deserialize, Serialize};

use super::{FieldValue, Reading};
use crate::utils::radians_to_degrees_text;

/// 度数类固件使用的换算系数，保留固件端的精度
pub const DEG_TO_RAD: f64 = 0.017453293;

/// 倾角字段的单位，决定显示方式和旋转换算系数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltUnits {
    Radians,
    Degrees,
}

impl TiltUnits {
    pub fn rotation_scale(self) -> f64 {
        match self {
            TiltUnits::Radians => 1.0,
            TiltUnits::Degrees => DEG_TO_RAD,
        }
    }

    /// 角度字段的显示文本：弧度换算为两位小数的角度，度数原样显示
    pub fn format_angle(self, value: &FieldValue) -> String {
        match self {
            TiltUnits::Radians => radians_to_degrees_text(value.as_f64(), 2),
            TiltUnits::Degrees => value.to_string(),
        }
    }
}

impl std::str::FromStr for TiltUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radians" | "rad" => Ok(TiltUnits::Radians),
            "degrees" | "deg" => Ok(TiltUnits::Degrees),
            other => Err(format!("Unknown tilt units: {}", other)),
        }
    }
}

/// 四元数的应用方式
///
/// `Absolute` 直接替换立方体姿态；`Cumulative` 把四元数左乘到已有姿态上，
/// 复现早期页面的行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuaternionMode {
    Absolute,
    Cumulative,
}

/// 每个事件得到的姿态更新
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationUpdate {
    /// 已换算为弧度
    Euler { yaw: f64, pitch: f64, roll: f64 },
    Quaternion { x: f64, y: f64, z: f64, w: f64 },
}

impl OrientationUpdate {
    /// 四元数齐全时走四元数分支，否则由三个倾角构造欧拉角
    pub fn from_reading(reading: &Reading, units: TiltUnits) -> Option<Self> {
        if let Some((x, y, z, w)) = reading.quaternion() {
            return Some(OrientationUpdate::Quaternion { x, y, z, w });
        }

        let scale = units.rotation_scale();
        reading.tilt().map(|(yaw, pitch, roll)| OrientationUpdate::Euler {
            yaw: yaw * scale,
            pitch: pitch * scale,
            roll: roll * scale,
        })
    }
}
