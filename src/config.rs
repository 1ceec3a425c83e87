use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use dotenv::dotenv;
use log::{info, warn};

use crate::types::{QuaternionMode, Reading, TiltUnits};
use crate::types::reading::{ANGLE_FIELD_IDS, PLAIN_FIELD_IDS};

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "sensorcube.toml";

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub stream: StreamConfig,
    pub viewport: ViewportConfig,
    pub readings: ReadingsConfig,
    pub ui: UiConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
}

/// 推送流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub base_url: String,
    pub events_path: String,
    pub event_name: String,
    pub connect_timeout_ms: u64,
    pub reconnect_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub channel_capacity: usize,
}

/// 立方体材质
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Normal,
    FaceColors,
}

/// 三维视图配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub container_id: String,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    pub camera_distance: f64,
    /// 宽 × 高 × 深
    pub box_size: [f64; 3],
    pub material: MaterialKind,
    /// 顺序：+x, -x, +y, -y, +z, -z
    pub face_colors: [[u8; 3]; 6],
    pub background: [u8; 3],
    pub axes_size: f64,
    pub antialias: bool,
}

/// 读数解析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingsConfig {
    pub tilt_units: TiltUnits,
    pub quaternion_mode: QuaternionMode,
    pub display_slots: Vec<String>,
}

/// 界面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub repaint_interval_ms: u64,
    pub side_panel_width: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 640.0,
            title: "SensorCube - Orientation Viewer".to_string(),
            resizable: true,
            vsync: true,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            events_path: "/events".to_string(),
            event_name: "readings".to_string(),
            connect_timeout_ms: 5000,
            reconnect_delay_ms: 3000,
            poll_interval_ms: 200,
            channel_capacity: 1000,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            container_id: "3Dcube".to_string(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,
            box_size: [6.0, 1.0, 4.0],
            material: MaterialKind::Normal,
            face_colors: [
                [0x03, 0xa9, 0xf4], // 浅蓝
                [0x03, 0xa9, 0xf4],
                [0xff, 0xeb, 0x3b], // 黄
                [0xff, 0xeb, 0x3b],
                [0x4c, 0xaf, 0x50], // 绿
                [0x4c, 0xaf, 0x50],
            ],
            background: [0xff, 0xff, 0xff],
            axes_size: 5.0,
            antialias: true,
        }
    }
}

impl Default for ReadingsConfig {
    fn default() -> Self {
        Self {
            tilt_units: TiltUnits::Radians,
            quaternion_mode: QuaternionMode::Absolute,
            display_slots: default_display_slots(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            repaint_interval_ms: 100,
            side_panel_width: 260.0,
        }
    }
}

/// 页面上全部文本槽位
pub fn default_display_slots() -> Vec<String> {
    PLAIN_FIELD_IDS
        .iter()
        .chain(ANGLE_FIELD_IDS.iter())
        .map(|id| id.to_string())
        .collect()
}

impl StreamConfig {
    pub fn events_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.events_path.trim_start_matches('/'))
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::IoError)?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content)
            .map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.stream.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("Stream base URL must not be empty".to_string()));
        }

        if self.stream.events_path.trim().is_empty() || self.stream.event_name.trim().is_empty() {
            return Err(ConfigError::ValidationError("Events path and event name must not be empty".to_string()));
        }

        if self.stream.channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Event channel capacity must be positive".to_string()));
        }

        if self.stream.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Poll interval must be positive".to_string()));
        }

        let viewport = &self.viewport;
        if viewport.fov_degrees <= 0.0 || viewport.fov_degrees >= 180.0 {
            return Err(ConfigError::ValidationError("Field of view must be within (0, 180) degrees".to_string()));
        }

        if viewport.near <= 0.0 || viewport.near >= viewport.far {
            return Err(ConfigError::ValidationError("Camera planes must satisfy 0 < near < far".to_string()));
        }

        if viewport.box_size.iter().any(|d| *d <= 0.0) {
            return Err(ConfigError::ValidationError("Box dimensions must be positive".to_string()));
        }

        // 只允许读数里存在的字段作为槽位
        if let Some(id) = self.readings.display_slots.iter().find(|id| !Reading::is_display_field(id)) {
            return Err(ConfigError::ValidationError(format!("Unknown display slot: {}", id)));
        }

        Ok(())
    }

    /// 用环境变量（含 .env 文件）覆盖部分配置
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        dotenv().ok(); // 加载 .env 文件

        if let Ok(url) = env::var("SENSOR_URL") {
            info!("Using stream base URL from environment: {}", url);
            self.stream.base_url = url;
        }

        if let Ok(units) = env::var("SENSOR_TILT_UNITS") {
            self.readings.tilt_units = units
                .parse::<TiltUnits>()
                .map_err(ConfigError::ValidationError)?;
        }

        self.validate()
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 启动时加载：文件存在则读取，否则使用默认值，最后叠加环境变量
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = if path.as_ref().exists() {
            info!("Loading configuration from {}", path.as_ref().display());
            Self::load_from_file(&path)?
        } else {
            warn!("{} not found, using default configuration", path.as_ref().display());
            let manager = Self {
                config: AppConfig::default(),
                config_path: Some(path.as_ref().to_path_buf()),
            };
            // 写出一份默认配置作为模板，失败不影响启动
            if let Err(e) = manager.save() {
                warn!("Failed to write default configuration: {}", e);
            }
            manager
        };

        manager.config.apply_env_overrides()?;
        Ok(manager)
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 保存配置
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
        }
        Ok(())
    }
}
