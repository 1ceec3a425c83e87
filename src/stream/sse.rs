use crate::types::SseMessage;

/// `text/event-stream` 增量解码器
///
/// 按字节接收网络分块，行尾支持 CR、LF、CRLF（允许 CR 与 LF 落在不同分块），
/// 空行触发派发。多行 `data:` 以 `\n` 拼接，未指定 `event:` 时事件类型为 `message`。
/// 最近的事件 id 与 `retry:` 间隔跨连接保留，见 [`SseDecoder::reset`]。
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    skip_lf: bool,
    event_type: String,
    data: String,
    last_event_id: String,
    retry_ms: Option<u64>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送入一个分块，返回其中完整派发的消息
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        let mut messages = Vec::new();

        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\r' => {
                    self.skip_lf = true;
                    self.finish_line(&mut messages);
                }
                b'\n' => self.finish_line(&mut messages),
                _ => self.line.push(byte),
            }
        }

        messages
    }

    /// 新连接开始前丢弃未完成的行和事件，保留事件 id 与重连间隔
    pub fn reset(&mut self) {
        self.line.clear();
        self.skip_lf = false;
        self.event_type.clear();
        self.data.clear();
    }

    /// 服务端通过 `retry:` 指定的重连间隔
    pub fn retry_ms(&self) -> Option<u64> {
        self.retry_ms
    }

    /// 重连时随 `Last-Event-ID` 发送的 id；空 `id:` 会清除它
    pub fn last_event_id(&self) -> Option<&str> {
        if self.last_event_id.is_empty() {
            None
        } else {
            Some(&self.last_event_id)
        }
    }

    fn finish_line(&mut self, messages: &mut Vec<SseMessage>) {
        let line = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();

        if line.is_empty() {
            if let Some(message) = self.dispatch() {
                messages.push(message);
            }
            return;
        }

        // 注释行
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.find(':') {
            Some(index) => {
                let value = &line[index + 1..];
                (&line[..index], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line.as_str(), ""),
        };

        match field {
            "event" => self.event_type = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = value.to_string();
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    self.retry_ms = value.parse::<u64>().ok();
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let event_type = std::mem::take(&mut self.event_type);

        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        Some(SseMessage {
            event: if event_type.is_empty() { "message".to_string() } else { event_type },
            data,
            last_event_id: self.last_event_id().map(str::to_string),
        })
    }
}
