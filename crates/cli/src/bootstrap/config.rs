use geodoh_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        bind = %config.server.bind_address,
        http_port = config.server.http_port,
        upstreams = config.upstream.servers.len(),
        "Configuration loaded"
    );

    Ok(config)
}
