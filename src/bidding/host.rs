// src/bidding/host.rs

use std::collections::HashMap;

use crate::model::bid::NormalizedBid;
use crate::model::placements::{BidderRequest, PlacementRequest};

/// 宿主竞价编排器：按出价 ID 查回原始请求，并登记出价结果
pub trait BidHost {
    fn bid_request(&self, bid_id: &str) -> Option<&PlacementRequest>;
    fn add_bid_response(&mut self, placement_code: &str, bid: NormalizedBid);
}

/// 简单的宿主实现：记录本轮请求，收集返回的出价
#[derive(Debug, Default)]
pub struct BidCollector {
    requests: HashMap<String, PlacementRequest>,
    pub responses: Vec<(String, NormalizedBid)>,
}

impl BidCollector {
    pub fn new(request: &BidderRequest) -> Self {
        let requests = request
            .bids
            .iter()
            .map(|bid| (bid.bid_id.clone(), bid.clone()))
            .collect();
        Self { requests, responses: Vec::new() }
    }

    /// 某个广告位代码下登记的全部出价
    pub fn bids_for(&self, placement_code: &str) -> Vec<&NormalizedBid> {
        self.responses
            .iter()
            .filter(|(code, _)| code == placement_code)
            .map(|(_, bid)| bid)
            .collect()
    }
}

impl BidHost for BidCollector {
    fn bid_request(&self, bid_id: &str) -> Option<&PlacementRequest> {
        self.requests.get(bid_id)
    }

    fn add_bid_response(&mut self, placement_code: &str, bid: NormalizedBid) {
        self.responses.push((placement_code.to_string(), bid));
    }
}
