use clap::Parser;
use nursedesk_server::settings;
use std::path::PathBuf;

/// Nurse record manager REST API.
#[derive(Debug, Parser)]
#[command(name = "nursedesk-server", version)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:3000.
    #[arg(long, env = "NURSEDESK_BIND")]
    bind: Option<String>,

    /// SQLite database file; created if missing.
    #[arg(long, env = "NURSEDESK_DATABASE")]
    database: Option<PathBuf>,

    /// Persist the effective settings to the settings file and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = settings::load_settings().with_overrides(args.bind, args.database);

    if args.write_config {
        settings::save_settings(&settings).map_err(anyhow::Error::msg)?;
        log::info!("wrote {}", settings::settings_file_path().display());
        return Ok(());
    }

    log::debug!("effective settings: {settings:?}");
    nursedesk_server::run(&settings).await
}
