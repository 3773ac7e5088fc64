// src/model/adapters.rs

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::config::config_manager::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::model::placements::BidderRequest;

/// 配置来源：适配器配置 + 一轮竞价的广告位
pub trait ConfigAdapter: Send + Sync {
    fn get_adapter_config(&self) -> Result<AdapterConfig>;
    fn get_bidder_request(&self) -> Result<BidderRequest>;
}

/// 从 JSON 文件读取配置；配置文件不存在时使用默认配置
pub struct FileConfigAdapter {
    pub config_file: Option<String>,
    pub placements_file: String,
}

impl FileConfigAdapter {
    pub fn new(config_file: Option<&str>, placements_file: &str) -> Self {
        Self {
            config_file: config_file.map(str::to_string),
            placements_file: placements_file.to_string(),
        }
    }

    fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
        let content = fs::read_to_string(path)
            .map_err(|e| AdapterError::config(format!("unable to read {}: {}", path, e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn get_adapter_config(&self) -> Result<AdapterConfig> {
        match &self.config_file {
            Some(path) if Path::new(path).exists() => Self::read_json(path),
            _ => Ok(AdapterConfig::default()),
        }
    }

    fn get_bidder_request(&self) -> Result<BidderRequest> {
        Self::read_json(&self.placements_file)
    }
}
