// src/main.rs

use clap::Parser;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{error, info};

use serverbid_s2s::logging::logger::init_tracing;
use serverbid_s2s::mock_vendor::{serve_mock_vendor, MockVendor};
use serverbid_s2s::model::adapters::{ConfigAdapter, FileConfigAdapter};
use serverbid_s2s::{AdapterConfig, AuctionSession, BidCollector, ConfigManager, HttpTransport};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "ServerBid S2S adapter: run one auction round")]
struct CliArgs {
    /// 适配器配置文件（JSON），不存在时使用默认配置
    #[arg(long, default_value = "static/serverbid_config.json")]
    config: String,
    /// 本轮广告位（JSON，BidderRequest 结构）
    #[arg(long, default_value = "static/placements.json")]
    placements: String,
    /// 覆盖配置中的 endpoint
    #[arg(long)]
    endpoint: Option<String>,
    /// 覆盖页面地址
    #[arg(long)]
    page_url: Option<String>,
    #[arg(long)]
    referrer: Option<String>,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// 启动本地模拟 ServerBid 并把请求发给它
    #[arg(long)]
    mock_port: Option<u16>,
    /// 模拟服务的填充率
    #[arg(long, default_value_t = 0.8)]
    mock_fill_rate: f64,
}

async fn run(args: CliArgs) -> serverbid_s2s::Result<()> {
    let adapter = FileConfigAdapter::new(Some(&args.config), &args.placements);
    let mut config: AdapterConfig = adapter.get_adapter_config()?;
    let mut request = adapter.get_bidder_request()?;
    if let Some(page_url) = args.page_url {
        request.page_url = page_url;
    }
    if let Some(referrer) = args.referrer {
        request.referrer = referrer;
    }

    if let Some(port) = args.mock_port {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;
        let vendor = MockVendor { fill_rate: args.mock_fill_rate };
        tokio::spawn(async move {
            if let Err(e) = serve_mock_vendor(listener, vendor).await {
                error!("mock serverbid stopped: {}", e);
            }
        });
        config.endpoint = Some(format!("http://{}/api/v2", addr));
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }

    let transport = HttpTransport::new(config.timeout_ms())?;
    let manager = ConfigManager::new(config);
    let mut session = AuctionSession::new(manager);
    let mut host = BidCollector::new(&request);

    let emitted = session.call_bids(&transport, &mut host, &request).await?;
    info!(emitted, "serverbid round finished");

    for (placement_code, bid) in &host.responses {
        let line = serde_json::json!({ "placementCode": placement_code, "bid": bid });
        println!("{}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let _guard = match init_tracing(&args.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Unable to set global tracing subscriber: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("serverbid round failed: {}", e);
            eprintln!("serverbid round failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
