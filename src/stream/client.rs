use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::Sender;
use log::{debug, error, info, warn};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::StreamConfig;
use crate::types::{ReadyState, StreamEvent};
use super::sse::SseDecoder;

/// 推送流错误
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    BadStatus(u16),
    #[error("Unexpected content type: {0:?}")]
    ContentType(String),
    #[error("Event channel disconnected")]
    ChannelClosed,
    #[error("Failed to build runtime: {0}")]
    Runtime(std::io::Error),
}

impl StreamError {
    /// 状态码或内容类型错误后不再重连，与浏览器的处理一致
    pub fn is_fatal(&self) -> bool {
        matches!(self, StreamError::BadStatus(_) | StreamError::ContentType(_))
    }
}

enum SessionEnd {
    Eof,
    Shutdown,
}

/// 推送线程入口：在当前线程上运行单线程 tokio 运行时
pub fn run_event_stream(
    config: StreamConfig,
    event_sender: Sender<StreamEvent>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), StreamError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StreamError::Runtime)?;

    runtime.block_on(EventStreamClient::new(config, event_sender, shutdown_signal).run())
}

struct EventStreamClient {
    config: StreamConfig,
    event_sender: Sender<StreamEvent>,
    shutdown_signal: Arc<AtomicBool>,
    // 跨连接保留事件 id 与 retry 间隔
    decoder: SseDecoder,
}

impl EventStreamClient {
    fn new(config: StreamConfig, event_sender: Sender<StreamEvent>, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            event_sender,
            shutdown_signal,
            decoder: SseDecoder::new(),
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_signal.load(Ordering::Relaxed)
    }

    fn emit(&self, event: StreamEvent) -> Result<(), StreamError> {
        self.event_sender.send(event).map_err(|_| StreamError::ChannelClosed)
    }

    async fn run(mut self) -> Result<(), StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(self.config.connect_timeout_ms))
            .build()?;
        let url = self.config.events_url();

        info!("Subscribing to {}", url);

        loop {
            if self.is_shutdown() {
                info!("Stream thread received shutdown signal, exiting gracefully");
                return Ok(());
            }

            match self.read_session(&client, &url).await {
                Ok(SessionEnd::Shutdown) => {
                    info!("Stream thread received shutdown signal, exiting gracefully");
                    return Ok(());
                }
                Ok(SessionEnd::Eof) => {
                    warn!("Event stream closed by server");
                    if !self.emit_error(ReadyState::Connecting, "stream ended".to_string()) {
                        return Ok(());
                    }
                }
                Err(StreamError::ChannelClosed) => {
                    // 通道断开表示GUI已关闭，优雅退出
                    info!("Event channel disconnected, stream thread exiting");
                    return Ok(());
                }
                Err(e) if e.is_fatal() => {
                    error!("Event stream failed permanently: {}", e);
                    self.emit_error(ReadyState::Closed, e.to_string());
                    return Err(e);
                }
                Err(e) => {
                    warn!("Event stream error: {}", e);
                    if !self.emit_error(ReadyState::Connecting, e.to_string()) {
                        return Ok(());
                    }
                }
            }

            if !self.wait_reconnect_delay().await {
                return Ok(());
            }
        }
    }

    /// 通道已断开时返回 false
    fn emit_error(&self, ready_state: ReadyState, message: String) -> bool {
        match self.emit(StreamEvent::Error { ready_state, message }) {
            Ok(()) => true,
            Err(_) => {
                info!("Event channel disconnected, stream thread exiting");
                false
            }
        }
    }

    /// 分段等待重连间隔，期间收到关闭信号返回 false
    async fn wait_reconnect_delay(&self) -> bool {
        let step = Duration::from_millis(self.config.poll_interval_ms);
        let mut remaining = Duration::from_millis(
            self.decoder.retry_ms().unwrap_or(self.config.reconnect_delay_ms),
        );

        debug!("Reconnecting in {} ms", remaining.as_millis());

        while !remaining.is_zero() {
            if self.is_shutdown() {
                return false;
            }
            let slice = remaining.min(step);
            tokio::time::sleep(slice).await;
            remaining -= slice;
        }
        !self.is_shutdown()
    }

    async fn read_session(&mut self, client: &reqwest::Client, url: &str) -> Result<SessionEnd, StreamError> {
        let mut request = client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");

        if let Some(id) = self.decoder.last_event_id() {
            request = request.header("Last-Event-ID", id);
        }

        let mut response = request.send().await?;

        if response.status() != StatusCode::OK {
            return Err(StreamError::BadStatus(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_event_stream(&content_type) {
            return Err(StreamError::ContentType(content_type));
        }

        self.emit(StreamEvent::Open)?;

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        self.decoder.reset();

        loop {
            if self.is_shutdown() {
                return Ok(SessionEnd::Shutdown);
            }

            // 限时读取，保证能及时响应关闭信号
            let chunk = match tokio::time::timeout(poll_interval, response.chunk()).await {
                Err(_elapsed) => continue,
                Ok(result) => result?,
            };

            let Some(chunk) = chunk else {
                return Ok(SessionEnd::Eof);
            };

            for message in self.decoder.feed(&chunk) {
                self.emit(StreamEvent::Message(message))?;
            }
        }
    }
}

fn is_event_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case("text/event-stream"))
        .unwrap_or(false)
}
