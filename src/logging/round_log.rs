// src/logging/round_log.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::model::bid::NormalizedBid;

/// **一轮 ServerBid 竞价的汇总日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoundLog {
    pub timestamp: String,          // 记录时间
    pub log_type: String,           // 固定为 "serverbid_round"
    pub round_id: String,           // 本轮竞价 ID
    pub endpoint: String,           // 请求地址
    pub placements_requested: usize,// 宿主传入的广告位数
    pub placements_sent: usize,     // 通过校验、实际发送的广告位数
    pub status: String,             // "success" / "no_fill" / "response_error"
    pub bid_log: Vec<BidLog>,
}

/// **单个出价日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BidLog {
    pub bid_id: String,
    pub bidder_code: String,
    pub cpm: Option<f64>,
    pub status_code: u8,
}

impl RoundLog {
    pub fn new(endpoint: &str, placements_requested: usize, placements_sent: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "serverbid_round".to_string(),
            round_id: Uuid::new_v4().to_string(),
            endpoint: endpoint.to_string(),
            placements_requested,
            placements_sent,
            status: "no_fill".to_string(),
            bid_log: Vec::new(),
        }
    }

    /// **记录一个出价**，出现有效出价即视为成功
    pub fn add_bid_log(&mut self, bid: &NormalizedBid) {
        if !bid.is_empty() && self.status == "no_fill" {
            self.status = "success".to_string();
        }
        self.bid_log.push(BidLog {
            bid_id: bid.bid_id.clone(),
            bidder_code: bid.bidder_code.clone(),
            cpm: bid.cpm(),
            status_code: bid.kind.status_code(),
        });
    }

    pub fn mark_response_error(&mut self) {
        self.status = "response_error".to_string();
    }

    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!(round_id = %self.round_id, status = %self.status, "{}", line),
            Err(e) => info!(round_id = %self.round_id, "round log serialization failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bid::BidKind;

    #[test]
    fn status_follows_bids() {
        let mut log = RoundLog::new("http://e", 2, 1);
        log.add_bid_log(&NormalizedBid::empty("a", "sb"));
        assert_eq!(log.status, "no_fill");
        log.add_bid_log(&NormalizedBid {
            bid_id: "b".to_string(),
            bidder_code: "sb".to_string(),
            kind: BidKind::Priced { cpm: 1.2, width: 300, height: 250, ad: None },
        });
        assert_eq!(log.status, "success");
        assert_eq!(log.bid_log.len(), 2);
        assert_eq!(log.bid_log[1].cpm, Some(1.2));
        assert_eq!(log.bid_log[0].status_code, 2);
    }

    #[test]
    fn response_error_sticks() {
        let mut log = RoundLog::new("http://e", 1, 1);
        log.mark_response_error();
        log.add_bid_log(&NormalizedBid::empty("a", "sb"));
        assert_eq!(log.status, "response_error");
    }
}
