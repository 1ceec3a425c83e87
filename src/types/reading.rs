use std::fmt;

use crate::utils::number_text;

/// 单个读数字段的原始值
///
/// 固件有时发送数字，有时发送字符串（例如 `temp` 以 `"23.4"` 形式上报），
/// 两种形式都原样保留，显示时不做改写。其他 JSON 类型也照样接收，
/// 避免一个异常字段让整条读数失效。
#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// 取数值；无法解析时返回 NaN
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Number(value) => *value,
            FieldValue::Text(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
            FieldValue::Other(_) => f64::NAN,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => f.write_str(&number_text(*value)),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Other(value) => f.write_str(&value_text(value)),
        }
    }
}

/// 非数字非字符串的字段：布尔值、null 原样输出，数组逐项以逗号拼接，对象输出占位文本
fn value_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.as_f64().map(number_text).unwrap_or_else(|| number.to_string()),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// 一次推送事件携带的传感器快照
///
/// 三代固件的字段集合并不一致，所以全部字段都是可选的，未知字段直接忽略。
#[derive(serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub temp: Option<FieldValue>,

    pub gyro_x: Option<FieldValue>,
    pub gyro_y: Option<FieldValue>,
    pub gyro_z: Option<FieldValue>,

    pub accl_x: Option<FieldValue>,
    pub accl_y: Option<FieldValue>,
    pub accl_z: Option<FieldValue>,

    pub magn_x: Option<FieldValue>,
    pub magn_y: Option<FieldValue>,
    pub magn_z: Option<FieldValue>,

    // 短字段名版本
    pub tilt_y: Option<FieldValue>,
    pub tilt_r: Option<FieldValue>,
    pub tilt_p: Option<FieldValue>,

    // 长字段名版本
    pub tilt_yaw: Option<FieldValue>,
    pub tilt_roll: Option<FieldValue>,
    pub tilt_pitch: Option<FieldValue>,

    pub quat_x: Option<FieldValue>,
    pub quat_y: Option<FieldValue>,
    pub quat_z: Option<FieldValue>,
    pub quat_w: Option<FieldValue>,
}

/// 非角度字段的显示槽位 id
pub const PLAIN_FIELD_IDS: [&str; 10] = [
    "temp", "gyroX", "gyroY", "gyroZ", "acclX", "acclY", "acclZ", "magnX", "magnY", "magnZ",
];

/// 角度字段的显示槽位 id，短字段名在前
pub const ANGLE_FIELD_IDS: [&str; 6] = ["tiltY", "tiltR", "tiltP", "tiltYaw", "tiltRoll", "tiltPitch"];

impl Reading {
    /// 该 id 是否对应一个可显示的读数字段
    pub fn is_display_field(id: &str) -> bool {
        PLAIN_FIELD_IDS.contains(&id) || ANGLE_FIELD_IDS.contains(&id)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Reading>(payload)
    }

    /// 按显示槽位 id 列出非角度字段，仅包含实际存在的字段
    pub fn plain_fields(&self) -> Vec<(&'static str, &FieldValue)> {
        let values = [
            &self.temp,
            &self.gyro_x, &self.gyro_y, &self.gyro_z,
            &self.accl_x, &self.accl_y, &self.accl_z,
            &self.magn_x, &self.magn_y, &self.magn_z,
        ];
        collect_present(&PLAIN_FIELD_IDS, &values)
    }

    /// 按显示槽位 id 列出角度字段
    pub fn angle_fields(&self) -> Vec<(&'static str, &FieldValue)> {
        let values = [
            &self.tilt_y, &self.tilt_r, &self.tilt_p,
            &self.tilt_yaw, &self.tilt_roll, &self.tilt_pitch,
        ];
        collect_present(&ANGLE_FIELD_IDS, &values)
    }

    /// 四元数的四个分量齐全时返回 (x, y, z, w)
    pub fn quaternion(&self) -> Option<(f64, f64, f64, f64)> {
        match (&self.quat_x, &self.quat_y, &self.quat_z, &self.quat_w) {
            (Some(x), Some(y), Some(z), Some(w)) => Some((x.as_f64(), y.as_f64(), z.as_f64(), w.as_f64())),
            _ => None,
        }
    }

    /// 三个倾角齐全时返回 (yaw, pitch, roll)，优先短字段名
    pub fn tilt(&self) -> Option<(f64, f64, f64)> {
        let short = (&self.tilt_y, &self.tilt_p, &self.tilt_r);
        let long = (&self.tilt_yaw, &self.tilt_pitch, &self.tilt_roll);

        for (yaw, pitch, roll) in [short, long] {
            if let (Some(yaw), Some(pitch), Some(roll)) = (yaw, pitch, roll) {
                return Some((yaw.as_f64(), pitch.as_f64(), roll.as_f64()));
            }
        }
        None
    }
}

fn collect_present<'a>(ids: &[&'static str], values: &[&'a Option<FieldValue>]) -> Vec<(&'static str, &'a FieldValue)> {
    ids.iter()
        .zip(values)
        .filter_map(|(id, value)| Option::as_ref(*value).map(|v| (*id, v)))
        .collect()
}
