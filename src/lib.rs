//! ServerBid server-to-server bid adapter.
//!
//! 将宿主的广告位请求批量转换为 ServerBid 竞价请求，发送后把响应中的决策
//! 归一化为有价出价或空出价，交还给宿主登记。

pub mod bidding;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock_vendor;
pub mod model;
pub mod serverbid;

pub use bidding::host::{BidCollector, BidHost};
pub use bidding::session::{AuctionSession, OutboundRequest};
pub use bidding::transport::{HttpTransport, Transport};
pub use config::config_manager::{AdapterConfig, ConfigManager};
pub use error::{AdapterError, Result};
pub use model::bid::{BidKind, NormalizedBid};
pub use model::placements::{BidderRequest, PlacementRequest, ServerBidParams, Size};
