//! klvgen - MISB ST 601.2 KLV metadata generator.
//!
//! Validates the session configuration from CLI options, opens a UDP
//! sink, and streams the fixed 78-byte Local Data Set packet at the
//! requested rate until interrupted.

use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use klvgen::config::SessionConfig;
use klvgen::sink::UdpSink;
use klvgen::stream::StreamLoop;

/// KLV metadata generator streaming MISB ST 601.2 packets over UDP.
#[derive(Parser, Debug)]
#[command(name = "klvgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Destination address in dotted quad notation (e.g. 127.0.0.1)
    #[arg(short, long, default_value = "127.0.0.1")]
    address: Ipv4Addr,

    /// The port to send packets to
    #[arg(short, long, default_value_t = 9000)]
    port: u16,

    /// Packets per second (e.g. rate = 30, 30 packets sent per second)
    #[arg(short, long, default_value_t = 1.0)]
    rate: f64,

    /// Mission ID, limited to 12 ASCII characters
    #[arg(short, long, default_value = "Mission 01")]
    mission_id: String,

    /// The platform name, limited to 12 ASCII characters
    #[arg(short = 'n', long, default_value = "Demo")]
    platform: String,

    /// Sensor latitude in degrees (e.g. for 35.7S, enter -35.7)
    #[arg(short = 't', long, default_value_t = 44.64423, allow_negative_numbers = true)]
    latitude: f64,

    /// Sensor longitude in degrees (e.g. for 93.2W, enter -93.2)
    #[arg(short = 'g', long, default_value_t = -93.24013, allow_negative_numbers = true)]
    longitude: f64,

    /// Sensor altitude in meters
    #[arg(short = 'e', long, default_value_t = 333.0, allow_negative_numbers = true)]
    altitude: f64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("klvgen=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SessionConfig {
        address: cli.address,
        port: cli.port,
        rate: cli.rate,
        mission_id: cli.mission_id,
        platform: cli.platform,
        latitude: cli.latitude,
        longitude: cli.longitude,
        altitude: cli.altitude,
    }
    .normalized();

    // Reject before any transport setup; no packet leaves on bad input.
    config.validate()?;

    tracing::info!(
        destination = %config.destination(),
        rate = config.rate,
        mission_id = %config.mission_id,
        platform = %config.platform,
        latitude = config.latitude,
        longitude = config.longitude,
        altitude = config.altitude,
        "session configured"
    );

    let sink = UdpSink::connect(config.destination()).await?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let mut stream = StreamLoop::new(config, sink);
    stream.run(cancel).await?;
    Ok(())
}
