use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "remine-scout")]
#[command(about = "Scrape a property's public records from Remine into a CSV file")]
pub struct CliArgs {
    /// Path to the JSON config with portal credentials
    #[arg(short, long, default_value = super::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Property address; prompted for when omitted
    #[arg(short, long)]
    pub address: Option<String>,

    /// Output CSV path (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip sending the record to the CRM
    #[arg(long)]
    pub no_forward: bool,

    /// Run Chrome without a visible window
    #[arg(long)]
    pub headless: bool,

    #[arg(short, long)]
    pub verbose: bool,
}
