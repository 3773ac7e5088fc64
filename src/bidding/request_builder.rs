// src/bidding/request_builder.rs

use chrono::Utc;
use serde_json::Map;
use tracing::debug;

use crate::bidding::size_map::ad_types_for;
use crate::model::placements::PlacementRequest;
use crate::serverbid::request::{AuctionRequest, PlacementEntry};

impl PlacementEntry {
    /// 将宿主广告位转换为请求条目；缺少 network_id 或 site_id 时返回 None
    pub fn from_placement(placement: &PlacementRequest) -> Option<Self> {
        let params = &placement.params;
        let (network_id, site_id) = params.required_ids()?;

        // 显式 adTypes 优先，否则根据尺寸推导
        let ad_types = params
            .ad_types
            .clone()
            .unwrap_or_else(|| ad_types_for(&placement.sizes));

        Some(Self {
            network_id: network_id.clone(),
            site_id: site_id.clone(),
            zone_ids: params.zone_ids.clone(),
            campaign_id: params.campaign_id,
            flight_id: params.flight_id,
            ad_id: params.ad_id,
            div_name: placement.bid_id.clone(),
            ad_types,
            bidders: params.bidders.clone(),
        })
    }
}

/// 构造一轮竞价的批量请求
///
/// 不合格的广告位被静默丢弃；即使没有任何广告位通过，也返回请求，
/// 由调用方决定是否发送。
pub fn build(placements: &[PlacementRequest], page_url: &str, referrer: &str) -> AuctionRequest {
    let mut request = AuctionRequest {
        placements: Vec::with_capacity(placements.len()),
        time: Utc::now().timestamp_millis(),
        user: Map::new(),
        url: page_url.to_string(),
        referrer: referrer.to_string(),
        enable_bot_filtering: true,
        include_pricing_data: true,
    };

    for placement in placements {
        match PlacementEntry::from_placement(placement) {
            Some(entry) => request.placements.push(entry),
            None => debug!(bid_id = %placement.bid_id, "placement missing networkId/siteId, skipped"),
        }
    }

    request
}
