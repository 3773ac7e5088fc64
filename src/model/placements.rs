// src/model/placements.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 广告位尺寸，序列化为 `[width, height]`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size(pub u32, pub u32);

impl Size {
    pub fn width(&self) -> u32 {
        self.0
    }

    pub fn height(&self) -> u32 {
        self.1
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.1)
    }
}

/// 网络 ID / 站点 ID：宿主可能传数字，也可能传字符串，原样透传给 ServerBid
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ParamId {
    Num(u64),
    Str(String),
}

impl ParamId {
    /// 0 与空白字符串都视为未填写
    pub fn is_blank(&self) -> bool {
        match self {
            ParamId::Num(n) => *n == 0,
            ParamId::Str(s) => s.trim().is_empty(),
        }
    }
}

impl From<u64> for ParamId {
    fn from(value: u64) -> Self {
        ParamId::Num(value)
    }
}

impl From<&str> for ParamId {
    fn from(value: &str) -> Self {
        ParamId::Str(value.to_string())
    }
}

/// ServerBid 广告位参数（宿主配置在 `params` 下）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerBidParams {
    pub network_id: Option<ParamId>,
    pub site_id: Option<ParamId>,
    pub zone_ids: Option<Vec<u64>>,
    pub campaign_id: Option<u64>,
    pub flight_id: Option<u64>,
    pub ad_id: Option<u64>,
    /// 显式指定的广告类型编码；存在时（即使为空）不再根据尺寸推导
    pub ad_types: Option<Vec<u32>>,
    pub bidders: Option<Vec<String>>,
}

impl ServerBidParams {
    /// 返回 (network_id, site_id)，两者都填写时广告位才会被发送
    pub fn required_ids(&self) -> Option<(&ParamId, &ParamId)> {
        match (&self.network_id, &self.site_id) {
            (Some(network), Some(site)) if !network.is_blank() && !site.is_blank() => {
                Some((network, site))
            }
            _ => None,
        }
    }
}

/// 宿主传入的单个广告位竞价请求
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub bid_id: String,             // 宿主分配的唯一出价 ID
    pub bidder: String,             // 出价方名称
    pub placement_code: String,     // 宿主页面上的广告位代码
    #[serde(default)]
    pub sizes: Vec<Size>,           // 允许的尺寸列表
    #[serde(default)]
    pub params: ServerBidParams,
}

/// 宿主一次竞价调用的参数
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BidderRequest {
    #[serde(default)]
    pub bids: Vec<PlacementRequest>,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub referrer: String,
}
