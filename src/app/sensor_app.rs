use std::time::Duration;
use crossbeam_channel::Receiver;
use eframe::{egui, Frame};
use log::info;

use crate::config::ConfigManager;
use crate::display::DisplayBoard;
use crate::stream::CommandSender;
use crate::types::StreamEvent;
use crate::viewport::{Container, PainterRenderer, ViewportContext};
use super::handlers::StreamEventHandler;
use super::state::{AppState, ReadingPolicy};

/// 顶部状态栏的大致高度，用于在第一帧布局前估算容器尺寸
const STATUS_BAR_HEIGHT: f32 = 40.0;

pub struct SensorCubeApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,

    // 复位命令
    pub commands: CommandSender,
}

impl SensorCubeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ConfigManager,
        event_receiver: Receiver<StreamEvent>,
    ) -> Self {
        let app_config = config.get_config().clone();

        cc.egui_ctx.tessellation_options_mut(|options| {
            options.feathering = app_config.viewport.antialias;
        });

        // 第一帧布局后 cube_panel 会按实际尺寸 resize
        let container = Container {
            id: app_config.viewport.container_id.clone(),
            width: (app_config.window.width - app_config.ui.side_panel_width).max(1.0),
            height: (app_config.window.height - STATUS_BAR_HEIGHT).max(1.0),
        };
        let viewport = ViewportContext::initialize(
            &container,
            PainterRenderer::new(),
            &app_config.viewport,
        );

        let state = AppState::new(
            event_receiver,
            viewport,
            DisplayBoard::new(&app_config.readings.display_slots),
            ReadingPolicy::new(app_config.stream.event_name.clone(), &app_config.readings),
        );

        let commands = CommandSender::new(
            app_config.stream.base_url.clone(),
            Duration::from_millis(app_config.stream.connect_timeout_ms),
        );

        info!("应用启动，等待推送数据...");

        Self {
            state,
            config,
            commands,
        }
    }
}

impl eframe::App for SensorCubeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 设置明亮模式主题
        ctx.set_visuals(egui::Visuals::light());

        // 先处理推送事件，再绘制界面
        StreamEventHandler::handle_stream_events(&mut self.state);

        // 渲染UI组件
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_readings_panel(self, ctx);
        crate::app::ui::render_cube_panel(self, ctx);

        let repaint_ms = self.config.get_config().ui.repaint_interval_ms;
        ctx.request_repaint_after(Duration::from_millis(repaint_ms));
    }
}
