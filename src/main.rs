//! nicshift: batch-migrate VM network adapters onto NSX logical
//! switches, driven by a CSV of `vm_name,logical_switch` rows.

mod input;

use anyhow::Context;
use clap::Parser;
use nicshift_vsphere::batch::run_batch;
use nicshift_vsphere::client::VsphereClient;
use nicshift_vsphere::types::VsphereConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nicshift", version, about = "Batch VM network migration to NSX logical switches")]
struct Args {
    /// vCenter host to connect to
    #[arg(short = 's', long)]
    host: String,

    /// Port to connect on
    #[arg(short = 'o', long, default_value_t = 443)]
    port: u16,

    /// User name to use when connecting
    #[arg(short = 'u', long)]
    user: String,

    /// Password (prompted interactively when omitted)
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// CSV file containing vm_name,LogicalSwitch per line
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Skip TLS certificate verification (self-signed labs)
    #[arg(long)]
    insecure: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password(format!(
            "Enter password for host {} and user {}: ",
            args.host, args.user
        ))
        .context("failed to read password")?,
    };

    let rows = input::read_rows(&args.file)?;
    if rows.is_empty() {
        log::warn!("{} contains no rows; nothing to do", args.file.display());
        return Ok(());
    }

    let config = VsphereConfig {
        host: args.host,
        port: args.port,
        username: args.user,
        password,
        insecure: args.insecure,
        ..Default::default()
    };

    let mut client = VsphereClient::new(&config)?;
    client
        .login()
        .await
        .with_context(|| format!("login to {}:{} failed", config.host, config.port))?;

    let result = run_batch(&client, &rows).await;
    let _ = client.logout().await;

    let outcomes = result?;
    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed > 0 {
        log::warn!("{failed} of {} row(s) failed", outcomes.len());
        std::process::exit(1);
    }
    Ok(())
}
