//! The Verity node: opens storage, builds the engine and serves the HTTP API.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use verity_rpc::{AppState, RpcMetrics, RpcServer};
use verity_store::{ArticleStore, UserStore};
use verity_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, LmdbStore, Migrator};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::shutdown::ShutdownController;

/// Application state backed by LMDB.
pub type LmdbAppState = AppState<LmdbStore>;

pub struct VerityNode {
    config: NodeConfig,
    env: LmdbEnvironment,
    state: Arc<LmdbAppState>,
    shutdown: ShutdownController,
}

impl VerityNode {
    /// Open the data directory, migrate and check it, and build the
    /// application state.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let params = config.voting_params()?;

        if let Err(reason) = check_data_dir(&config.data_dir) {
            warn!(%reason, "data directory looks unusual, continuing");
        }
        let env = LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)?;
        Migrator::run(&env.meta_store())?;

        let report = check_integrity(env.env())?;
        if report.is_healthy() {
            info!(
                databases = report.databases_checked,
                entries = report.total_entries,
                "integrity check passed"
            );
        } else {
            for error in &report.errors {
                warn!(%error, "integrity check finding");
            }
        }

        let store = Arc::new(env.store());
        info!(
            articles = store.article_count()?,
            users = store.user_count()?,
            quorum = params.quorum,
            majority_bps = params.majority_bps,
            "store opened"
        );

        let mut state = AppState::new(store, params);
        if config.enable_metrics {
            state = state.with_metrics(RpcMetrics::new()?);
        }

        Ok(Self {
            config,
            env,
            state: Arc::new(state),
            shutdown: ShutdownController::new(),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<LmdbAppState> {
        &self.state
    }

    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Serve on the configured address until SIGINT/SIGTERM, then flush
    /// storage.
    pub async fn run(self) -> Result<(), NodeError> {
        let addr = format!("{}:{}", self.config.rpc_host, self.config.rpc_port);
        let listener = TcpListener::bind(&addr).await?;

        let signals = self.shutdown.clone();
        tokio::spawn(async move { signals.wait_for_signal().await });

        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown is triggered, then
    /// flush storage.
    pub async fn serve(self, listener: TcpListener) -> Result<(), NodeError> {
        let server = RpcServer::new(
            self.config.rpc_host.clone(),
            self.config.rpc_port,
            self.state.clone(),
        );
        server.serve(listener, self.shutdown.signal()).await?;
        self.stop()
    }

    /// Flush the LMDB environment to disk.
    pub fn stop(self) -> Result<(), NodeError> {
        self.env
            .env()
            .force_sync()
            .map_err(verity_store_lmdb::LmdbError::from)?;
        info!("Verity node stopped");
        Ok(())
    }
}
