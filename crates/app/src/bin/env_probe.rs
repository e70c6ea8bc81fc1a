//! Prints where the `.env` file is loaded from and the database URL it
//! yields.
//!
//! Usage: `kpi-env-probe [PATH]` (defaults to `./.env`).

use std::path::PathBuf;

use kpi_check_infrastructure::{EnvFileStatus, EnvProbe, PROBE_VAR};

fn main() {
    kpi_check::init_tracing();

    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(".env"), PathBuf::from);
    let probe = EnvProbe::inspect(&path, PROBE_VAR);

    tracing::info!("Loading from: {}", probe.path.display());
    match &probe.status {
        EnvFileStatus::Loaded => {}
        EnvFileStatus::Missing => tracing::warn!("no .env file at {}", probe.path.display()),
        EnvFileStatus::Invalid(e) => tracing::warn!("could not parse {}: {e}", probe.path.display()),
    }
    println!("{}", probe.value_line(PROBE_VAR));
}
