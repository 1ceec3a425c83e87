use std::thread;
use std::time::Duration;
use log::{info, warn};

/// 设备端的复位命令，id 即请求路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCommand {
    All,
    Yaw,
    Roll,
    Pitch,
}

impl ResetCommand {
    pub const ALL: [ResetCommand; 4] = [ResetCommand::All, ResetCommand::Yaw, ResetCommand::Roll, ResetCommand::Pitch];

    pub fn id(self) -> &'static str {
        match self {
            ResetCommand::All => "reset",
            ResetCommand::Yaw => "reset-yaw",
            ResetCommand::Roll => "reset-roll",
            ResetCommand::Pitch => "reset-pitch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResetCommand::All => "Reset",
            ResetCommand::Yaw => "Reset Yaw",
            ResetCommand::Roll => "Reset Roll",
            ResetCommand::Pitch => "Reset Pitch",
        }
    }
}

/// 发送即忘的 GET 请求，响应被忽略
#[derive(Debug, Clone)]
pub struct CommandSender {
    base_url: String,
    timeout: Duration,
}

impl CommandSender {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn url_for(&self, command: ResetCommand) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), command.id())
    }

    /// 在独立线程上发送，不阻塞界面
    pub fn send(&self, command: ResetCommand) -> thread::JoinHandle<()> {
        let url = self.url_for(command);
        let timeout = self.timeout;

        info!("Sending {} command", command.id());
        thread::spawn(move || {
            let result = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .and_then(|client| client.get(&url).send());

            if let Err(e) = result {
                warn!("Command request {} failed: {}", url, e);
            }
        })
    }
}
