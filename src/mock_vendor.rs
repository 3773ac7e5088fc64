// src/mock_vendor.rs

use axum::{extract::State, routing::post, Json, Router};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::bidding::size_map::size_for;
use crate::error::Result;
use crate::serverbid::request::{AuctionRequest, PlacementEntry};
use crate::serverbid::response::{AuctionResponse, Content, Decision, Pricing, VendorBid};

/// 模拟 ServerBid 的填充率配置
#[derive(Debug, Clone, Copy)]
pub struct MockVendor {
    /// 每个广告位返回决策的概率
    pub fill_rate: f64,
}

impl MockVendor {
    /// 为单个广告位生成决策：按第一个可识别的 adType 决定尺寸，随机出价
    fn decide(&self, entry: &PlacementEntry) -> Vec<VendorBid> {
        let mut rng = rand::thread_rng();
        if !rng.gen_bool(self.fill_rate.clamp(0.0, 1.0)) {
            return Vec::new();
        }
        let size = entry.ad_types.iter().find_map(|code| size_for(*code));
        let (width, height) = size.map(|s| (s.width(), s.height())).unwrap_or((0, 0));
        let price: f64 = rng.gen_range(0.5..3.0);
        let price = (price * 100.0).round() / 100.0;

        vec![VendorBid {
            decision: Some(Decision {
                pricing: Some(Pricing { clear_price: Some(price) }),
                width,
                height,
                contents: vec![Content {
                    body: format!(
                        "<div class=\"serverbid-mock\" data-div=\"{}\">Mock ServerBid Ad {}x{}</div>",
                        entry.div_name, width, height
                    ),
                    impression_url: None,
                }],
                impression_url: Some(format!("http://mock-serverbid.local/i?div={}", entry.div_name)),
            }),
        }]
    }

    pub fn respond(&self, request: &AuctionRequest) -> AuctionResponse {
        let bids: HashMap<String, Vec<VendorBid>> = request
            .placements
            .iter()
            .map(|entry| (entry.div_name.clone(), self.decide(entry)))
            .collect();
        AuctionResponse { bids }
    }
}

async fn handle_decisions(
    State(vendor): State<Arc<MockVendor>>,
    Json(request): Json<AuctionRequest>,
) -> Json<AuctionResponse> {
    info!(placements = request.placements.len(), url = %request.url, "Mock ServerBid received request");
    Json(vendor.respond(&request))
}

/// 模拟服务路由，路径与真实接口一致：`/api/v2`
pub fn router(vendor: MockVendor) -> Router {
    Router::new()
        .route("/api/v2", post(handle_decisions))
        .with_state(Arc::new(vendor))
}

/// 在已绑定的 listener 上运行模拟服务
pub async fn serve_mock_vendor(listener: TcpListener, vendor: MockVendor) -> Result<()> {
    info!("Mock ServerBid running at http://{}", listener.local_addr()?);
    axum::serve(listener, router(vendor)).await?;
    Ok(())
}
