use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use cuaca_live::config::{Config, DeviceFix};
use cuaca_live::dashboard::{Phase, RefreshController};
use cuaca_live::location::Coordinates;
use cuaca_live::render;
use cuaca_live::server;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Cuaca.Live: single-screen weather dashboard
///
/// Finds where you are (device fix, IP geolocation, or a fixed fallback),
/// fetches Open-Meteo weather and keeps it fresh in the background.
///
/// Examples:
///   cuaca serve
///   cuaca serve --port 3000 --lat -6.2088 --lon 106.8456
///   cuaca serve --no-geolocation --refresh-secs 60
///   cuaca once --lat -7.7956 --lon 110.3695
#[derive(Parser)]
#[command(name = "cuaca", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dashboard web server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', default_value_t = 8080)]
        port: u16,

        /// Seconds between silent background refreshes.
        #[arg(long)]
        refresh_secs: Option<u64>,

        #[command(flatten)]
        location: LocationArgs,
    },
    /// Load once, print a summary to stderr and JSON state to stdout.
    Once {
        #[command(flatten)]
        location: LocationArgs,
    },
}

#[derive(Args)]
struct LocationArgs {
    /// Device latitude (-90 to 90). Treated as an accurate GPS fix.
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Device longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Pretend the platform has no positioning at all.
    #[arg(long)]
    no_geolocation: bool,

    /// Config file (default: ~/.cuaca/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl LocationArgs {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("Cannot load configuration")?;

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            if !Coordinates::new(lat, lon).is_valid() {
                bail!("Invalid coordinates. Lat: -90..90, Lon: -180..180");
            }
            config.device_position = Some(DeviceFix {
                latitude: lat,
                longitude: lon,
                accuracy_m: None,
            });
        }
        if self.no_geolocation {
            config.geolocation = false;
        }
        Ok(config)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cuaca_live=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, refresh_secs, location } => {
            let mut config = location.load_config()?;
            if let Some(secs) = refresh_secs {
                config.refresh_secs = secs;
            }
            serve(&host, port, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Once { location } => once(&location.load_config()?).await,
    }
}

async fn serve(host: &str, port: u16, config: &Config) -> anyhow::Result<()> {
    let controller = Arc::new(RefreshController::from_config(config));
    controller.start();

    eprintln!("  Press Ctrl+C to stop.");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
        }
    };

    server::start(host, port, controller.clone(), shutdown)
        .await
        .with_context(|| format!("Server error on {}:{}", host, port))?;

    controller.stop();
    tracing::info!("stopped");
    Ok(())
}

async fn once(config: &Config) -> anyhow::Result<ExitCode> {
    let controller = RefreshController::from_config(config);
    let phase = controller.first_load().await;

    let state = controller.snapshot();
    eprint!("{}", render::text::summary(&state));
    println!("{}", serde_json::to_string_pretty(&controller.view())?);

    Ok(match phase {
        Phase::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
