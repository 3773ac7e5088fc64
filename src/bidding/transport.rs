// src/bidding/transport.rs

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::error::{AdapterError, Result};

/// 发送 JSON、接收 JSON 的传输层
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST 请求体到 endpoint，返回响应体原文
    async fn post_json(&self, endpoint: &str, body: String) -> Result<String>;
}

/// 基于 reqwest 的 HTTP 传输，开启 cookie（携带凭证）
pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client, timeout_ms })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<String> {
        let start = Instant::now();
        // 超时覆盖发送与读取响应体的全过程
        let exchange = async {
            let response = self
                .client
                .post(endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;

            let status = response.status();
            debug!(endpoint, status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, "serverbid responded");
            if !status.is_success() {
                return Err(AdapterError::HttpStatus(status.as_u16()));
            }
            Ok::<String, AdapterError>(response.text().await?)
        };

        timeout(Duration::from_millis(self.timeout_ms), exchange)
            .await
            .map_err(|_| AdapterError::Timeout(self.timeout_ms))?
    }
}
