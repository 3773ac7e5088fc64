use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use tokio::net::TcpListener;

use serverbid_s2s::mock_vendor::{serve_mock_vendor, MockVendor};
use serverbid_s2s::model::placements::ParamId;
use serverbid_s2s::{
    AdapterConfig, AdapterError, AuctionSession, BidCollector, BidKind, BidderRequest, ConfigManager,
    HttpTransport, PlacementRequest, Result, ServerBidParams, Size, Transport,
};

/// 内存传输：记录请求，返回固定响应
struct CannedTransport {
    reply: std::result::Result<String, u16>,
    sent: Mutex<Vec<(String, String)>>,
}

impl CannedTransport {
    fn ok(body: &str) -> Self {
        Self { reply: Ok(body.to_string()), sent: Mutex::new(Vec::new()) }
    }

    fn failing(status: u16) -> Self {
        Self { reply: Err(status), sent: Mutex::new(Vec::new()) }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<String> {
        self.sent.lock().unwrap().push((endpoint.to_string(), body));
        self.reply.clone().map_err(AdapterError::HttpStatus)
    }
}

fn placement(bid_id: &str, network: Option<u64>, site: Option<u64>, sizes: Vec<Size>) -> PlacementRequest {
    PlacementRequest {
        bid_id: bid_id.to_string(),
        bidder: "serverbid".to_string(),
        placement_code: format!("div-{}", bid_id),
        sizes,
        params: ServerBidParams {
            network_id: network.map(ParamId::Num),
            site_id: site.map(ParamId::Num),
            ..Default::default()
        },
    }
}

fn request(bids: Vec<PlacementRequest>) -> BidderRequest {
    BidderRequest { bids, page_url: "http://page".to_string(), referrer: "http://ref".to_string() }
}

#[tokio::test]
async fn only_eligible_placement_is_sent() {
    let request = request(vec![
        placement("id1", Some(1), Some(2), vec![Size(300, 250)]),
        placement("id2", Some(5), None, vec![Size(300, 250)]),
    ]);
    let transport = CannedTransport::ok(r#"{"bids": {}}"#);
    let mut host = BidCollector::new(&request);
    let mut session = AuctionSession::new(ConfigManager::default());

    let emitted = session.call_bids(&transport, &mut host, &request).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let body: Value = serde_json::from_str(&sent[0].1).unwrap();
    let placements = body["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0]["divName"], "id1");
    assert_eq!(placements[0]["adTypes"], serde_json::json!([5]));
    assert_eq!(body["url"], "http://page");
    assert_eq!(body["referrer"], "http://ref");
    assert_eq!(body["user"], serde_json::json!({}));

    assert_eq!(emitted, 2);
    assert!(host.responses.iter().all(|(_, bid)| bid.is_empty()));
}

#[tokio::test]
async fn nothing_sent_without_eligible_placements() {
    let request = request(vec![placement("id1", None, None, vec![Size(300, 250)])]);
    let transport = CannedTransport::ok(r#"{"bids": {}}"#);
    let mut host = BidCollector::new(&request);
    let mut session = AuctionSession::new(ConfigManager::default());

    assert_eq!(session.call_bids(&transport, &mut host, &request).await.unwrap(), 0);
    assert!(transport.sent().is_empty());
    assert!(host.responses.is_empty());
}

#[tokio::test]
async fn priced_bid_reaches_host_with_markup() {
    let request = request(vec![placement("id1", Some(1), Some(2), vec![Size(300, 250)])]);
    let transport = CannedTransport::ok(
        r#"{"bids": {"id1": [{"decision": {"pricing": {"clearPrice": 1.5}, "width": 300, "height": 250,
            "contents": [{"body": "<div/>", "impressionUrl": "http://x/px"}]}}]}}"#,
    );
    let mut host = BidCollector::new(&request);
    let mut session = AuctionSession::new(ConfigManager::default());
    session.call_bids(&transport, &mut host, &request).await.unwrap();

    let bids = host.bids_for("div-id1");
    assert_eq!(bids.len(), 1);
    match &bids[0].kind {
        BidKind::Priced { cpm, width, height, ad } => {
            assert_eq!(*cpm, 1.5);
            assert_eq!((*width, *height), (300, 250));
            let ad = ad.as_deref().unwrap();
            assert!(ad.starts_with("<div/>"));
            assert!(ad.contains("http://x/px"));
        }
        BidKind::Empty => panic!("expected a priced bid"),
    }
    assert_eq!(bids[0].bidder_code, "serverbid");
}

#[tokio::test]
async fn transport_failure_yields_empty_bids() {
    let request = request(vec![
        placement("id1", Some(1), Some(2), vec![Size(300, 250)]),
        placement("id2", Some(1), Some(2), vec![Size(728, 90)]),
    ]);
    let transport = CannedTransport::failing(503);
    let mut host = BidCollector::new(&request);
    let mut session = AuctionSession::new(ConfigManager::default());

    assert_eq!(session.call_bids(&transport, &mut host, &request).await.unwrap(), 2);
    assert!(host.responses.iter().all(|(_, bid)| bid.is_empty()));
    assert!(!session.is_awaiting_response());
}

#[tokio::test]
async fn round_trip_against_mock_vendor() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_mock_vendor(listener, MockVendor { fill_rate: 1.0 }));

    let config = ConfigManager::new(AdapterConfig {
        endpoint: Some(format!("http://{}/api/v2", addr)),
        timeout_ms: Some(2000),
        ..Default::default()
    });
    let request = request(vec![
        placement("id1", Some(1), Some(2), vec![Size(728, 90)]),
        placement("id2", Some(1), None, vec![Size(300, 250)]),
    ]);
    let transport = HttpTransport::new(config.current().timeout_ms()).unwrap();
    let mut host = BidCollector::new(&request);
    let mut session = AuctionSession::new(config);

    session.call_bids(&transport, &mut host, &request).await.unwrap();

    let priced = host.bids_for("div-id1");
    assert_eq!(priced.len(), 1);
    match &priced[0].kind {
        BidKind::Priced { width, height, ad, .. } => {
            assert_eq!((*width, *height), (728, 90));
            assert!(ad.as_deref().unwrap().contains("mock-serverbid.local"));
        }
        BidKind::Empty => panic!("mock vendor with full fill should price id1"),
    }
    assert!(host.bids_for("div-id2")[0].is_empty());
}
