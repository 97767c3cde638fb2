use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use airfog_domain::adv;
use airfog_domain::profile::TrackerProfile;
use airfog_domain::record::Location;
use airfog_domain::snapshot::AdvertisementSnapshot;
use airfog_relay::coordinator::SENT_CONFIRMATION;
use airfog_relay::{RelayClient, RelayConfig, RelayCoordinator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// relay backend endpoint
    #[arg(long, env = "AIRFOG_ENDPOINT")]
    endpoint: String,

    /// static API key sent with every request
    #[arg(long, env = "AIRFOG_API_KEY")]
    api_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// relay a captured advertisement together with a location fix
    Send {
        /// path to a captured advertisement snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// 16-bit service id the tracker family advertises under, hex
        #[arg(long, value_parser = parse_service_id)]
        service: Option<u16>,

        #[arg(long)]
        latitude: f64,

        #[arg(long)]
        longitude: f64,
    },
    /// fetch the most recent record held by the backend
    Fetch,
}

fn parse_service_id(arg: &str) -> Result<u16, String> {
    let hex = arg.trim_start_matches("0x");
    u16::from_str_radix(hex, 16).map_err(|e| format!("{e}: {arg}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = RelayConfig::new(&args.endpoint, args.api_key)?;
    let client = Arc::new(RelayClient::new(config));

    match args.command {
        Command::Send {
            snapshot,
            service,
            latitude,
            longitude,
        } => {
            let raw = std::fs::read_to_string(&snapshot)
                .with_context(|| format!("reading snapshot {}", snapshot.display()))?;
            let snapshot: AdvertisementSnapshot =
                serde_json::from_str(&raw).context("parsing snapshot JSON")?;
            let profile = TrackerProfile::new(service);
            let location = Location {
                latitude,
                longitude,
            };

            let coordinator = RelayCoordinator::new(client);
            match coordinator.submit(location, &profile, &snapshot).await {
                Ok(()) => println!("{SENT_CONFIRMATION}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Fetch => {
            use airfog_relay::RelayTransport;

            let record = client.fetch_latest().await?;
            println!("device_id:          {}", record.device_id);
            println!(
                "mac_address:        {}",
                record.mac_address.as_deref().unwrap_or("-")
            );
            println!(
                "location:           {}, {}",
                record.location.latitude, record.location.longitude
            );
            println!(
                "advertisement_data: {}",
                adv::hex_string(&record.advertisement_data)
            );
            for s in adv::structures(&record.advertisement_data)
                .context("walking relayed AD structures")?
            {
                println!("  type 0x{:02x}  {}", s.ad_type, adv::hex_string(s.value));
            }
        }
    }
    Ok(())
}
