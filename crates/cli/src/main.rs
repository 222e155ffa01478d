use clap::Parser;
use geodoh_api::AppState;
use geodoh_domain::CliOverrides;
use std::net::SocketAddr;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "geodoh")]
#[command(version)]
#[command(about = "Region-steering DNS-over-HTTPS forwarding proxy")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Comma-separated list of upstream DoH URLs
    #[arg(short = 'u', long)]
    upstreams: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        http_port: cli.port,
        bind_address: cli.bind.clone(),
        upstream_servers: cli.upstreams.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting geodoh v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config)?;

    let state = AppState {
        pipeline: services.pipeline,
        regions: services.regions,
        cache_stats: services.cache_stats,
    };

    let bind_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.http_port).parse()?;

    server::start_http_server(bind_addr, state).await?;

    info!("Server shutdown complete");
    Ok(())
}
