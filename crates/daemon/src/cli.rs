// SPDX-License-Identifier: MIT

//! Command-line surface (spec §6.3): parsed and merged into `Config`
//! strictly before any subsystem's `check_ready` runs.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "hydrogend", version, about = "Hydrogen device daemon")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "hydrogen.toml")]
    pub config: PathBuf,

    /// Overrides `Config::state_dir` (log/state file location).
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Overrides the `RUST_LOG`-style filter the `Logging` subsystem installs.
    #[arg(long)]
    pub log_level: Option<String>,
}
