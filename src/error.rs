// src/error.rs

use thiserror::Error;

/// 适配器统一的 Result 类型
pub type Result<T> = std::result::Result<T, AdapterError>;

/// 适配器错误类型
///
/// 竞价流程本身不会把错误抛给宿主：响应解析失败、传输失败都会降级为空出价。
/// 这里的错误只出现在传输层、配置加载以及会话误用上。
#[derive(Error, Debug)]
pub enum AdapterError {
    /// HTTP 请求失败
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 请求超时（毫秒）
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// 服务端返回非 2xx 状态码
    #[error("unexpected http status: {0}")]
    HttpStatus(u16),

    /// JSON 序列化 / 反序列化失败
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 上一轮竞价尚未收到响应
    #[error("an auction round is already awaiting its response")]
    RoundInProgress,
}

impl AdapterError {
    pub fn config(msg: impl Into<String>) -> Self {
        AdapterError::Config(msg.into())
    }
}
