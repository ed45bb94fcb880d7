use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lightlink_bridge::configs::Settings;
use lightlink_bridge::tools::{self, EXIT_CLIENT};

/// Dumps the device listing of the Govee account, handy for filling in
/// GOVEE_DEVICES and ALLOWED_MODEL.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// File the raw response is written to
    #[arg(long, default_value = "devices.json")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[ERR] {e}");
            return ExitCode::from(EXIT_CLIENT);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = settings.logger.level.as_str();

            format!("fetch_devices={level},lightlink_bridge={level},lightlink_api={level}").into()
        }))
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(tools::fetch_devices(&settings.govee, &args.out).await)
}
