// src/model/bid.rs

use serde::{Deserialize, Serialize};

/// 出价结果：有价出价或空出价
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BidKind {
    Priced {
        cpm: f64,
        width: u32,
        height: u32,
        /// 渲染用的广告 HTML；决策没有 contents 时为 None
        ad: Option<String>,
    },
    Empty,
}

impl BidKind {
    /// 宿主侧的出价状态码：1 = 有效出价，2 = 空出价
    pub fn status_code(&self) -> u8 {
        match self {
            BidKind::Priced { .. } => 1,
            BidKind::Empty => 2,
        }
    }
}

/// 归一化后交给宿主的出价
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBid {
    pub bid_id: String,
    pub bidder_code: String,
    #[serde(flatten)]
    pub kind: BidKind,
}

impl NormalizedBid {
    pub fn empty(bid_id: &str, bidder_code: &str) -> Self {
        Self {
            bid_id: bid_id.to_string(),
            bidder_code: bidder_code.to_string(),
            kind: BidKind::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, BidKind::Empty)
    }

    pub fn cpm(&self) -> Option<f64> {
        match self.kind {
            BidKind::Priced { cpm, .. } => Some(cpm),
            BidKind::Empty => None,
        }
    }
}
