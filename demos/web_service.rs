//! Validate a web service environment before "serving traffic"
//!
//! ```text
//! NODE_ENV=production PORT=8080 ALLOWED_IPS=1.1.1.1,2.2.2.2 \
//! DATABASE='{"host":"db.internal","port":"5432"}' \
//!     cargo run --example web_service
//! ```

use clap::Parser;
use envshape::{Environment, EnvironmentConfig, EnvironmentModule, resolve_environment};
use serde::Deserialize;
use std::net::IpAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use validator::Validate;

/// Check the environment of the demo web service
#[derive(Parser, Debug)]
#[command(name = "web_service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WEB_SERVICE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeEnv {
    Development,
    Production,
    Test,
}

#[derive(Debug, Deserialize, Validate)]
struct DatabaseEnv {
    #[validate(length(min = 1))]
    host: String,
    #[validate(range(min = 1))]
    port: u16,
}

#[derive(Debug, Deserialize, Validate, Environment)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct WebEnv {
    node_env: NodeEnv,

    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    port: u16,

    #[env(transform)]
    allowed_ips: Vec<IpAddr>,

    #[env(transform(to_class))]
    #[validate(nested)]
    database: DatabaseEnv,
}

fn default_port() -> u16 {
    3000
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let container = fibre_ioc::Container::new();

    EnvironmentModule::for_root(EnvironmentConfig::<WebEnv>::structured())
        .init(&container)
        .inspect_err(|e| error!(error = %e, "Environment validation failed"))?;

    // Consumers resolve the service from the container
    let env = resolve_environment::<WebEnv>(&container)?;
    let database = env.get(WebEnv::DATABASE);

    info!(
        node_env = ?env.get(WebEnv::NODE_ENV),
        port = env.get(WebEnv::PORT),
        allowed_ips = env.get(WebEnv::ALLOWED_IPS).len(),
        database = %format!("{}:{}", database.host, database.port),
        "Ready to serve"
    );

    if *env.get(WebEnv::NODE_ENV) != NodeEnv::Production {
        info!("Running outside production");
    }

    Ok(())
}
