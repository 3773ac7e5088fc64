// src/bidding/classifier.rs

use crate::model::bid::{BidKind, NormalizedBid};
use crate::serverbid::response::{AuctionResponse, Decision};

/// 与 encodeURI 相同：保留 URL 结构字符，其余按 UTF-8 百分号编码
fn encode_uri(url: &str) -> String {
    const KEEP: &[u8] = b";,/?:@&=+$-_.!~*'()#";
    let mut out = String::with_capacity(url.len());
    for byte in url.bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// 生成隐藏的曝光监测像素，URL 为空时返回空串
pub fn tracking_pixel_html(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    format!(
        "<div style=\"position:absolute;left:0px;top:0px;visibility:hidden;\"><img src=\"{}\"></div>",
        encode_uri(url)
    )
}

/// 第一个 content 的 body 拼接监测像素；没有 contents 时为 None
fn markup_for(decision: &Decision) -> Option<String> {
    let content = decision.contents.first()?;
    let pixel = tracking_pixel_html(decision.tracking_url().unwrap_or_default());
    Some(format!("{}{}", content.body, pixel))
}

/// 将单个广告位的响应归类为有价出价或空出价
///
/// - 没有响应、没有该广告位的 key、或决策列表为空：返回一个空出价
/// - 否则每个决策一个出价，顺序与响应一致；缺少 decision 或价格不可用时降级为空出价
pub fn classify(bid_id: &str, bidder_code: &str, response: Option<&AuctionResponse>) -> Vec<NormalizedBid> {
    let vendor_bids = response.map(|r| r.bids_for(bid_id)).unwrap_or_default();

    if vendor_bids.is_empty() {
        return vec![NormalizedBid::empty(bid_id, bidder_code)];
    }

    vendor_bids
        .iter()
        .map(|vendor_bid| {
            let priced = vendor_bid.decision.as_ref().and_then(|decision| {
                decision.usable_price().map(|cpm| BidKind::Priced {
                    cpm,
                    width: decision.width,
                    height: decision.height,
                    ad: markup_for(decision),
                })
            });
            match priced {
                Some(kind) => NormalizedBid {
                    bid_id: bid_id.to_string(),
                    bidder_code: bidder_code.to_string(),
                    kind,
                },
                None => NormalizedBid::empty(bid_id, bidder_code),
            }
        })
        .collect()
}
