use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use lightlink_bridge::configs::Settings;
use lightlink_bridge::run;

/// Switches Govee lights from trigger lines received over a serial port.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Serial device, overrides SERIAL_PORT
    #[arg(long)]
    port: Option<String>,

    /// Baud rate, overrides BAUDRATE
    #[arg(long)]
    baud: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[ERR] Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = args.port {
        settings.serial.port = Some(port);
    }
    if let Some(baud) = args.baud {
        settings.serial.baud_rate = baud;
    }

    let settings = Arc::new(settings);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level},lightlink_api={level}").into()
        }))
        .init();

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
