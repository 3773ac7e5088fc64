// src/config/config_manager.rs

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::info;

/// 默认的 ServerBid 竞价地址
pub const DEFAULT_ENDPOINT: &str = "https://e.serverbid.com/api/v2";
/// 适配器代码，同时作为默认 bidder code
pub const ADAPTER_CODE: &str = "serverbidS2S";
/// 适配器类型：服务端对服务端
pub const ADAPTER_TYPE: &str = "s2s";

const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// 适配器配置（宿主可随时通过 set_config 替换）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// 覆盖默认竞价地址，空串等同于未设置
    pub endpoint: Option<String>,
    /// 传输层超时（毫秒）
    pub timeout_ms: Option<u64>,
    /// 宿主找不到 bidder 名称时使用的代码
    pub bidder_code: Option<String>,
}

impl AdapterConfig {
    pub fn endpoint(&self) -> &str {
        match self.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => DEFAULT_ENDPOINT,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    pub fn bidder_code(&self) -> &str {
        match self.bidder_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => ADAPTER_CODE,
        }
    }
}

/// 配置管理器，多个会话共享同一份配置
#[derive(Clone, Debug, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<AdapterConfig>>,
}

impl ConfigManager {
    pub fn new(config: AdapterConfig) -> Self {
        ConfigManager { config: Arc::new(RwLock::new(config)) }
    }

    pub fn set_config(&self, config: AdapterConfig) {
        info!(endpoint = config.endpoint(), "serverbid config updated");
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    /// 当前配置快照
    pub fn current(&self) -> AdapterConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_falls_back_to_default() {
        assert_eq!(AdapterConfig::default().endpoint(), DEFAULT_ENDPOINT);
        let config = AdapterConfig { endpoint: Some("  ".to_string()), ..Default::default() };
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        let config = AdapterConfig { endpoint: Some("http://localhost:9001/api/v2".to_string()), ..Default::default() };
        assert_eq!(config.endpoint(), "http://localhost:9001/api/v2");
    }

    #[test]
    fn timeout_defaults_and_is_taken_as_given() {
        assert_eq!(AdapterConfig::default().timeout_ms(), 1000);
        let config = AdapterConfig { timeout_ms: Some(20), ..Default::default() };
        assert_eq!(config.timeout_ms(), 20);
    }

    #[test]
    fn set_config_replaces_snapshot() {
        let manager = ConfigManager::default();
        assert_eq!(manager.current().endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(manager.current().bidder_code(), ADAPTER_CODE);

        manager.set_config(AdapterConfig {
            endpoint: Some("http://other/api".to_string()),
            bidder_code: Some("sbAlias".to_string()),
            ..Default::default()
        });
        assert_eq!(manager.current().endpoint(), "http://other/api");
        assert_eq!(manager.current().bidder_code(), "sbAlias");
    }

    #[test]
    fn parses_camel_case_json() {
        let config: AdapterConfig =
            serde_json::from_str(r#"{"endpoint": "http://e/api", "timeoutMs": 500}"#).unwrap();
        assert_eq!(config.endpoint(), "http://e/api");
        assert_eq!(config.timeout_ms(), 500);
    }
}
