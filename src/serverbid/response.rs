// src/serverbid/response.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// null 与缺省字段都按默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 价格可能是数字、数字字符串或 null；无法识别时视为没有价格
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// 宽高同样容忍 null 和字符串，无法识别时为 0
fn lenient_dimension<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0))
}

/// 逐个广告位、逐个决策解码：某个条目形状不对只影响它自己，
/// 条目解码失败按没有 decision 处理，广告位的值不是数组时视为没有决策
fn lenient_bids<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<VendorBid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(bid_id, entries)| {
            let decoded = match entries {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| {
                        serde_json::from_value(item).unwrap_or_else(|e| {
                            debug!(bid_id = %bid_id, error = %e, "unreadable serverbid decision entry");
                            VendorBid::default()
                        })
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (bid_id, decoded)
        })
        .collect())
}

/// ServerBid 响应：出价 ID → 决策列表
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuctionResponse {
    #[serde(default, deserialize_with = "lenient_bids")]
    pub bids: HashMap<String, Vec<VendorBid>>,
}

impl AuctionResponse {
    /// 取某个广告位的全部决策，缺失 key 时返回空切片
    pub fn bids_for(&self, bid_id: &str) -> &[VendorBid] {
        self.bids.get(bid_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VendorBid {
    #[serde(default)]
    pub decision: Option<Decision>,
}

/// 单个竞价决策
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: u32,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: Vec<Content>,
    /// 决策级别的曝光监测地址
    #[serde(default)]
    pub impression_url: Option<String>,
}

impl Decision {
    /// 可用的成交价：必须是有限正数
    pub fn usable_price(&self) -> Option<f64> {
        self.pricing
            .as_ref()
            .and_then(|p| p.clear_price)
            .filter(|price| price.is_finite() && *price > 0.0)
    }

    /// 曝光监测地址：优先取决策级别，其次取第一个 content 的
    pub fn tracking_url(&self) -> Option<&str> {
        self.impression_url
            .as_deref()
            .or_else(|| self.contents.first().and_then(|c| c.impression_url.as_deref()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default, deserialize_with = "lenient_price")]
    pub clear_price: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default)]
    pub impression_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vendor_shape() {
        let raw = r#"{"bids": {"id1": [{"decision": {"pricing": {"clearPrice": 1.5}, "width": 300, "height": 250,
            "contents": [{"body": "<div/>", "impressionUrl": "http://x/px"}]}}]}}"#;
        let resp: AuctionResponse = serde_json::from_str(raw).unwrap();
        let decision = resp.bids_for("id1")[0].decision.as_ref().unwrap();
        assert_eq!(decision.usable_price(), Some(1.5));
        assert_eq!((decision.width, decision.height), (300, 250));
        assert_eq!(decision.tracking_url(), Some("http://x/px"));
        assert!(resp.bids_for("missing").is_empty());
    }

    #[test]
    fn null_and_zero_prices_are_unusable() {
        for raw in [
            r#"{"pricing": {"clearPrice": null}}"#,
            r#"{"pricing": {"clearPrice": 0}}"#,
            r#"{"pricing": {"clearPrice": -2.0}}"#,
            r#"{"pricing": {}}"#,
            r#"{}"#,
        ] {
            let decision: Decision = serde_json::from_str(raw).unwrap();
            assert_eq!(decision.usable_price(), None, "{raw}");
        }
    }

    #[test]
    fn decision_level_impression_url_wins() {
        let decision: Decision = serde_json::from_str(
            r#"{"impressionUrl": "http://d/imp", "contents": [{"body": "x", "impressionUrl": "http://c/imp"}]}"#,
        )
        .unwrap();
        assert_eq!(decision.tracking_url(), Some("http://d/imp"));
    }

    #[test]
    fn missing_bids_field_defaults_to_empty() {
        let resp: AuctionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.bids.is_empty());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let decision: Decision = serde_json::from_str(
            r#"{"pricing": {"clearPrice": 1.0}, "width": null, "height": "250", "contents": null}"#,
        )
        .unwrap();
        assert_eq!(decision.usable_price(), Some(1.0));
        assert_eq!((decision.width, decision.height), (0, 250));
        assert!(decision.contents.is_empty());
    }

    #[test]
    fn string_clear_price_is_read_as_number() {
        let decision: Decision = serde_json::from_str(r#"{"pricing": {"clearPrice": "2.25"}}"#).unwrap();
        assert_eq!(decision.usable_price(), Some(2.25));
        let decision: Decision = serde_json::from_str(r#"{"pricing": {"clearPrice": "abc"}}"#).unwrap();
        assert_eq!(decision.usable_price(), None);
    }

    #[test]
    fn odd_placement_does_not_poison_others() {
        let raw = r#"{"bids": {
            "id1": [{"decision": {"pricing": {"clearPrice": 1.5}}}],
            "id2": null,
            "id3": [{"decision": "oops"}, {"decision": {"pricing": {"clearPrice": 0.7}}}],
            "id4": {"decision": {}}
        }}"#;
        let resp: AuctionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.bids_for("id1")[0].decision.as_ref().unwrap().usable_price(), Some(1.5));
        assert!(resp.bids_for("id2").is_empty());
        let id3 = resp.bids_for("id3");
        assert_eq!(id3.len(), 2);
        assert!(id3[0].decision.is_none());
        assert_eq!(id3[1].decision.as_ref().unwrap().usable_price(), Some(0.7));
        assert!(resp.bids_for("id4").is_empty());
    }

    #[test]
    fn null_bids_field_is_empty() {
        let resp: AuctionResponse = serde_json::from_str(r#"{"bids": null}"#).unwrap();
        assert!(resp.bids.is_empty());
    }
}
