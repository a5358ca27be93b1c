//! Verity daemon: entry point for running the article verification service.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use verity_node::{init_logging, NodeConfig, VerityNode};

#[derive(Parser)]
#[command(name = "verity-daemon", about = "Article voting and verification service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VERITY_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "VERITY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP API binds to.
    #[arg(long, env = "VERITY_RPC_HOST")]
    rpc_host: Option<String>,

    /// HTTP API port.
    #[arg(long, env = "VERITY_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Votes that count as 100% when measuring a majority.
    #[arg(long, env = "VERITY_QUORUM")]
    quorum: Option<u64>,

    /// Majority threshold in basis points (5100 = 51%).
    #[arg(long, env = "VERITY_MAJORITY_BPS")]
    majority_bps: Option<u32>,

    /// Maximum LMDB map size in bytes.
    #[arg(long, env = "VERITY_LMDB_MAP_SIZE")]
    lmdb_map_size: Option<usize>,

    /// Enable Prometheus metrics endpoint.
    #[arg(long, env = "VERITY_ENABLE_METRICS")]
    metrics: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "VERITY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VERITY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the service.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// Layer CLI flags and env vars over the file (or default) config.
    fn merge_into(self, base: NodeConfig) -> (NodeConfig, Command) {
        let config = NodeConfig {
            data_dir: self.data_dir.unwrap_or(base.data_dir),
            rpc_host: self.rpc_host.unwrap_or(base.rpc_host),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            quorum: self.quorum.unwrap_or(base.quorum),
            majority_bps: self.majority_bps.unwrap_or(base.majority_bps),
            lmdb_map_size: self.lmdb_map_size.unwrap_or(base.lmdb_map_size),
            enable_metrics: self.metrics || base.enable_metrics,
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
        };
        (config, self.command)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    let (config, command) = cli.merge_into(base);
    config.validate().context("invalid configuration")?;

    match command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            init_logging(config.log_format()?, &config.log_level)?;
            tracing::info!(
                data_dir = %config.data_dir.display(),
                rpc = %format!("{}:{}", config.rpc_host, config.rpc_port),
                metrics = config.enable_metrics,
                "starting Verity node"
            );

            let node = VerityNode::open(config).context("failed to open node")?;
            node.run().await?;

            tracing::info!("Verity daemon exited cleanly");
        }
    }

    Ok(())
}
