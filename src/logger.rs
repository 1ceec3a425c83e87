use chrono::Local;
use env_logger::Builder;
use log::Level;
use std::io::Write;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m", // 红色
        Level::Warn => "\x1b[33m\x1b[1m",  // 黄色
        Level::Info => "\x1b[32m\x1b[1m",  // 绿色
        Level::Debug => "\x1b[36m\x1b[1m", // 青色
        Level::Trace => "\x1b[90m\x1b[1m", // 灰色
    }
}

/// 初始化日志，默认 info，可用 RUST_LOG 覆盖
pub fn init_logger() {
    Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(
                buf,
                "{} {}{:<5}\x1b[0m [{}] {}",
                time,
                level_color(record.level()),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args(),
            )
        })
        .init();
}
