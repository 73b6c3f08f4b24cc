use clap::Parser;
use drum_relay::RelayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = RelayConfig::parse();
    log::info!("drum-relay starting: {:?}", config);
    drum_relay::run(config).await
}
