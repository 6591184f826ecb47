mod command;
mod render;
mod session;

use anyhow::Context;
use clap::Parser;
use nursedesk_core::ApiClient;
use session::Session;
use std::io;

/// Interactive nurse table backed by a nursedesk server.
#[derive(Debug, Parser)]
#[command(name = "nursedesk", version)]
struct Args {
    /// Base URL of the nursedesk API.
    #[arg(long, env = "NURSEDESK_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut session = Session::new(ApiClient::new(args.server.clone()));

    session
        .load()
        .with_context(|| format!("Failed to load nurses from {}", args.server))?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    session.run(&mut input, &mut out)?;
    Ok(())
}
