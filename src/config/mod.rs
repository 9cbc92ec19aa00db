pub mod toml_config;

pub use toml_config::EtlConfig;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "sales-dw-etl")]
#[command(about = "Batch ETL from the sales database into the analytics warehouse")]
pub struct CliConfig {
    #[arg(long, default_value = "etl.toml")]
    pub config: String,

    #[arg(long, help = "Create the source tables before running")]
    pub init_schema: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
