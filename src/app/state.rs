use chrono::{DateTime, Local};
use crossbeam_channel::Receiver;

use crate::config::ReadingsConfig;
use crate::display::DisplayBoard;
use crate::types::{QuaternionMode, ReadyState, StreamEvent, TiltUnits};
use crate::viewport::{PainterRenderer, Renderer, ViewportContext};

/// 应用状态管理模块
/// 推送连接、文本槽位与三维视图都只在 UI 线程上修改

/// 推送连接状态
#[derive(Debug, Clone)]
pub struct ConnectionState {
    pub ready_state: ReadyState,
    pub events_received: u64,
    pub readings_applied: u64,
    pub decode_failures: u64,
    pub last_reading_at: Option<DateTime<Local>>,
    pub last_event_id: Option<String>,
    pub last_error: Option<String>,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            ready_state: ReadyState::Connecting,
            events_received: 0,
            readings_applied: 0,
            decode_failures: 0,
            last_reading_at: None,
            last_event_id: None,
            last_error: None,
        }
    }
}

/// 读数解析策略
#[derive(Debug, Clone)]
pub struct ReadingPolicy {
    pub event_name: String,
    pub tilt_units: TiltUnits,
    pub quaternion_mode: QuaternionMode,
}

impl ReadingPolicy {
    pub fn new(event_name: impl Into<String>, config: &ReadingsConfig) -> Self {
        Self {
            event_name: event_name.into(),
            tilt_units: config.tilt_units,
            quaternion_mode: config.quaternion_mode,
        }
    }
}

/// 统一的应用状态管理
pub struct AppState<R: Renderer = PainterRenderer> {
    pub connection: ConnectionState,
    pub policy: ReadingPolicy,
    pub display: DisplayBoard,
    pub viewport: ViewportContext<R>,
    pub event_receiver: Receiver<StreamEvent>,
}

impl<R: Renderer> AppState<R> {
    /// 创建新的应用状态
    pub fn new(
        event_receiver: Receiver<StreamEvent>,
        viewport: ViewportContext<R>,
        display: DisplayBoard,
        policy: ReadingPolicy,
    ) -> Self {
        Self {
            connection: ConnectionState::default(),
            policy,
            display,
            viewport,
            event_receiver,
        }
    }
}
