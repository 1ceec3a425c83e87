mod app;
mod config;
mod display;
mod logger;
mod stream;
mod types;
mod utils;
mod viewport;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use crossbeam_channel::bounded;
use eframe::egui;
use log::{error, info};

use app::SensorCubeApp;
use config::{ConfigManager, DEFAULT_CONFIG_FILE};
use stream::run_event_stream;

fn main() {
    logger::init_logger();
    info!("Application starting");

    let config = match ConfigManager::load_or_default(DEFAULT_CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_config = config.get_config().clone();

    let (event_sender, event_receiver) = bounded(app_config.stream.channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let stream_config = app_config.stream.clone();
    let stream_shutdown = Arc::clone(&shutdown_signal);
    let stream_handle = thread::spawn(move || {
        if let Err(e) = run_event_stream(stream_config, event_sender, stream_shutdown) {
            error!("Stream thread failed: {}", e);
        }
    });

    let options = eframe::NativeOptions {
        vsync: app_config.window.vsync,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([app_config.window.width, app_config.window.height])
            .with_resizable(app_config.window.resizable),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        &app_config.window.title,
        options,
        Box::new(move |cc| Ok(Box::new(SensorCubeApp::new(cc, config, event_receiver)))),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    // GUI 关闭后，通知推送线程退出
    info!("GUI closed, signaling stream thread to shutdown");
    shutdown_signal.store(true, Ordering::Relaxed);

    match stream_handle.join() {
        Ok(()) => info!("Stream thread shut down gracefully"),
        Err(e) => error!("Stream thread panicked: {:?}", e),
    }
}
