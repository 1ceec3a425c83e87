/// 推送连接的就绪状态，与浏览器 EventSource 的三个状态对应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closed,
}

impl ReadyState {
    pub fn label(self) -> &'static str {
        match self {
            ReadyState::Connecting => "Connecting",
            ReadyState::Open => "Open",
            ReadyState::Closed => "Closed",
        }
    }
}

/// 一条解码完成的 SSE 消息
#[derive(Debug, Clone, PartialEq)]
pub struct SseMessage {
    pub event: String,
    pub data: String,
    pub last_event_id: Option<String>,
}

/// 推送线程发往 UI 线程的事件
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Open,
    Error {
        ready_state: ReadyState,
        message: String,
    },
    Message(SseMessage),
}
