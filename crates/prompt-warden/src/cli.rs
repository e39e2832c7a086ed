use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "prompt-warden",
    version,
    about = "Safety gate in front of a generative completion service"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "warden.yaml")]
    pub config: PathBuf,

    /// Listen address (overrides config file setting)
    #[arg(long)]
    pub listen: Option<String>,

    /// Audit log path (overrides config file setting)
    #[arg(long)]
    pub audit_log: Option<PathBuf>,

    /// Answer generation calls from the local stub instead of the network
    #[arg(long)]
    pub stub: bool,
}
