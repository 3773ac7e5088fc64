// src/bidding/session.rs

use tracing::{debug, error, info, warn};

use crate::bidding::classifier::classify;
use crate::bidding::host::BidHost;
use crate::bidding::request_builder;
use crate::bidding::transport::Transport;
use crate::config::config_manager::{ConfigManager, ADAPTER_CODE, ADAPTER_TYPE};
use crate::error::{AdapterError, Result};
use crate::logging::round_log::RoundLog;
use crate::model::placements::BidderRequest;
use crate::serverbid::response::AuctionResponse;

/// 待发送的 HTTP 请求：POST + JSON，携带凭证
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub endpoint: String,
    pub body: String,
}

/// 会话状态。待响应的出价 ID 只属于当前这一轮
#[derive(Debug)]
enum SessionState {
    Idle,
    AwaitingResponse {
        outstanding: Vec<String>,
        round_log: RoundLog,
    },
}

/// 一次请求 / 响应的竞价会话
pub struct AuctionSession {
    config: ConfigManager,
    state: SessionState,
}

impl AuctionSession {
    pub fn new(config: ConfigManager) -> Self {
        Self { config, state: SessionState::Idle }
    }

    pub fn is_awaiting_response(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { .. })
    }

    /// 当前轮次仍在等待响应的出价 ID
    pub fn outstanding(&self) -> &[String] {
        match &self.state {
            SessionState::AwaitingResponse { outstanding, .. } => outstanding,
            SessionState::Idle => &[],
        }
    }

    /// 放弃正在等待的轮次（传输层永远不回调时使用），不会产生任何出价
    pub fn reset(&mut self) {
        if let SessionState::AwaitingResponse { outstanding, .. } = &self.state {
            warn!(outstanding = outstanding.len(), "abandoning serverbid round");
        }
        self.state = SessionState::Idle;
    }

    /// 开始一轮竞价
    ///
    /// 没有任何广告位通过校验时直接结束本轮，不发请求，也不产生出价。
    pub fn start(&mut self, request: &BidderRequest) -> Result<Option<OutboundRequest>> {
        if self.is_awaiting_response() {
            return Err(AdapterError::RoundInProgress);
        }
        if request.bids.is_empty() {
            return Ok(None);
        }

        let auction_request = request_builder::build(&request.bids, &request.page_url, &request.referrer);
        if auction_request.placements.is_empty() {
            debug!(requested = request.bids.len(), "no eligible serverbid placements, round skipped");
            return Ok(None);
        }

        let config = self.config.current();
        let endpoint = config.endpoint().to_string();
        let body = serde_json::to_string(&auction_request)?;

        // 所有原始出价 ID 都要等待响应，包括被过滤掉的广告位
        let outstanding: Vec<String> = request.bids.iter().map(|bid| bid.bid_id.clone()).collect();
        let round_log = RoundLog::new(&endpoint, outstanding.len(), auction_request.placements.len());
        info!(
            adapter = ADAPTER_CODE,
            adapter_type = ADAPTER_TYPE,
            round_id = %round_log.round_id,
            placements = auction_request.placements.len(),
            "serverbid round started"
        );

        self.state = SessionState::AwaitingResponse { outstanding, round_log };
        Ok(Some(OutboundRequest { endpoint, body }))
    }

    /// 处理本轮响应，返回登记给宿主的出价数量
    ///
    /// `raw` 为 None 表示传输失败；解析失败只记录日志，所有广告位按空出价处理。
    pub fn on_response<H: BidHost>(&mut self, raw: Option<&str>, host: &mut H) -> usize {
        let (outstanding, mut round_log) = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::AwaitingResponse { outstanding, round_log } => (outstanding, round_log),
            SessionState::Idle => {
                warn!("serverbid response received with no round in flight, ignored");
                return 0;
            }
        };

        let response = match raw.map(serde_json::from_str::<AuctionResponse>) {
            Some(Ok(response)) => Some(response),
            Some(Err(e)) => {
                error!(round_id = %round_log.round_id, error = %e, "malformed serverbid response");
                round_log.mark_response_error();
                None
            }
            None => {
                round_log.mark_response_error();
                None
            }
        };

        let fallback_code = self.config.current().bidder_code().to_string();
        let mut emitted = 0;
        for bid_id in &outstanding {
            let (bidder, placement_code) = match host.bid_request(bid_id) {
                Some(req) if !req.bidder.is_empty() => (req.bidder.clone(), req.placement_code.clone()),
                Some(req) => (fallback_code.clone(), req.placement_code.clone()),
                None => {
                    warn!(bid_id = %bid_id, "host has no bid request for outstanding id");
                    continue;
                }
            };

            for bid in classify(bid_id, &bidder, response.as_ref()) {
                round_log.add_bid_log(&bid);
                host.add_bid_response(&placement_code, bid);
                emitted += 1;
            }
        }

        round_log.emit();
        emitted
    }

    /// 完整的一轮：构造请求 → 发送 → 处理响应。只发送一次，不重试
    pub async fn call_bids<T, H>(&mut self, transport: &T, host: &mut H, request: &BidderRequest) -> Result<usize>
    where
        T: Transport + ?Sized,
        H: BidHost,
    {
        let Some(outbound) = self.start(request)? else {
            return Ok(0);
        };

        let raw = match transport.post_json(&outbound.endpoint, outbound.body).await {
            Ok(body) => Some(body),
            Err(e) => {
                error!(endpoint = %outbound.endpoint, error = %e, "serverbid request failed");
                None
            }
        };
        Ok(self.on_response(raw.as_deref(), host))
    }
}
