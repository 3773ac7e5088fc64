// src/serverbid/request.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::placements::ParamId;

/// ServerBid 批量竞价请求，每轮竞价构造一次，发送后即丢弃
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRequest {
    pub placements: Vec<PlacementEntry>,
    /// 构造时间（毫秒时间戳）
    pub time: i64,
    /// 目前始终为空对象
    pub user: Map<String, Value>,
    pub url: String,
    pub referrer: String,
    pub enable_bot_filtering: bool,
    pub include_pricing_data: bool,
}

/// 请求中的单个广告位。network_id 与 site_id 不可缺省，
/// 只有通过校验的广告位才能构造出该结构
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementEntry {
    pub network_id: ParamId,
    pub site_id: ParamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<u64>,
    /// 复用宿主的出价 ID，响应中的 `bids` 以它为 key
    pub div_name: String,
    pub ad_types: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidders: Option<Vec<String>>,
}
